use anchor_lang::prelude::*;

use crate::constants::RAFFLE_SEED;
use crate::state::Raffle;

#[derive(Accounts)]
pub struct GetPlayer<'info> {
    #[account(
        seeds = [RAFFLE_SEED],
        bump = raffle.bump
    )]
    pub raffle: Account<'info, Raffle>,
}

/// Entrant at ledger slot `index`, as return data.
pub fn process_get_player(ctx: Context<GetPlayer>, index: u64) -> Result<Pubkey> {
    ctx.accounts.raffle.player(index)
}
