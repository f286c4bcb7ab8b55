use anchor_lang::prelude::*;
use anchor_lang::system_program;

use crate::constants::RAFFLE_SEED;
use crate::state::Raffle;

/// Accounts required to enter the raffle.
#[derive(Accounts)]
pub struct EnterRaffle<'info> {
    /// The entrant, paying the entry and any extra rent for the new ledger slot.
    #[account(mut)]
    pub player: Signer<'info>,

    #[account(
        mut,
        seeds = [RAFFLE_SEED],
        bump = raffle.bump
    )]
    pub raffle: Account<'info, Raffle>,

    pub system_program: Program<'info, System>,
}

/// Buys one ledger slot for the signer.
///
/// Steps performed:
/// 1. Check the raffle is open and `payment` covers the entrance fee.
/// 2. Grow the raffle account by one slot if needed.
/// 3. Transfer `payment` from the player into the pot.
pub fn process_enter_raffle(ctx: Context<EnterRaffle>, payment: u64) -> Result<()> {
    let player = ctx.accounts.player.key();
    let event = ctx.accounts.raffle.enter(player, payment)?;

    grow_ledger(
        &ctx.accounts.raffle.to_account_info(),
        &ctx.accounts.player.to_account_info(),
        &ctx.accounts.system_program.to_account_info(),
        ctx.accounts.raffle.players.len(),
    )?;

    system_program::transfer(
        CpiContext::new(
            ctx.accounts.system_program.to_account_info(),
            system_program::Transfer {
                from: ctx.accounts.player.to_account_info(),
                to: ctx.accounts.raffle.to_account_info(),
            },
        ),
        payment,
    )?;

    emit!(event);
    Ok(())
}

/// Makes room for `players` ledger slots. Never shrinks the account: a shrink
/// would have to hand back lamports that belong to the pot.
fn grow_ledger<'info>(
    raffle: &AccountInfo<'info>,
    payer: &AccountInfo<'info>,
    system_program: &AccountInfo<'info>,
    players: usize,
) -> Result<()> {
    let old_size = raffle.data_len();
    let Some((new_size, top_up)) = ledger_growth(&Rent::get()?, old_size, players) else {
        return Ok(());
    };

    if top_up > 0 {
        system_program::transfer(
            CpiContext::new(
                system_program.clone(),
                system_program::Transfer {
                    from: payer.clone(),
                    to: raffle.clone(),
                },
            ),
            top_up,
        )?;
    }

    raffle.realloc(new_size, false)?;
    msg!("Raffle account grown: {} -> {} bytes", old_size, new_size);
    Ok(())
}

/// New account size and the rent the payer adds to keep it exempt, or `None`
/// when `current_size` already fits `players` slots.
fn ledger_growth(rent: &Rent, current_size: usize, players: usize) -> Option<(usize, u64)> {
    let new_size = Raffle::space_for(players);
    if new_size <= current_size {
        return None;
    }
    let top_up = rent
        .minimum_balance(new_size)
        .saturating_sub(rent.minimum_balance(current_size));
    Some((new_size, top_up))
}
