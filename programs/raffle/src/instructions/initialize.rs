use anchor_lang::prelude::*;

use crate::constants::RAFFLE_SEED;
use crate::state::{InitializeParams, Raffle};

/// Accounts required to create the raffle.
#[derive(Accounts)]
pub struct Initialize<'info> {
    /// The account paying for account creation and fees.
    #[account(mut)]
    pub payer: Signer<'info>,

    /// The raffle state account, created with an empty ledger.
    #[account(
        init,
        payer = payer,
        space = Raffle::space_for(0),
        seeds = [RAFFLE_SEED],
        bump
    )]
    pub raffle: Account<'info, Raffle>,

    /// System program to create accounts.
    pub system_program: Program<'info, System>,
}

/// Creates the raffle with its entrance fee, interval and coordinator
/// settings. The first round starts now.
///
/// # Arguments
/// * `ctx` - Context holding the Initialize accounts
/// * `params` - Entrance fee (lamports), interval (seconds) and VRF settings
pub fn process_initialize(ctx: Context<Initialize>, params: InitializeParams) -> Result<()> {
    let clock = Clock::get()?;
    let raffle = Raffle::new(ctx.bumps.raffle, &params, clock.unix_timestamp)?;

    msg!(
        "Raffle initialized: fee {}, interval {}s, coordinator {}",
        raffle.entrance_fee,
        raffle.interval,
        raffle.vrf.coordinator
    );
    ctx.accounts.raffle.set_inner(raffle);

    Ok(())
}
