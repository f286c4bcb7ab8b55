use anchor_lang::prelude::*;

use crate::constants::RAFFLE_SEED;
use crate::error::RaffleError;
use crate::state::Raffle;

/// Accounts for the coordinator's randomness callback.
///
/// Ensures:
/// 1. Only the configured coordinator can deliver random words.
/// 2. The winner account receives the pot only if it is the selected entrant.
#[derive(Accounts)]
pub struct FulfillRandomWords<'info> {
    /// The main raffle state account.
    #[account(
        mut,
        seeds = [RAFFLE_SEED],
        bump = raffle.bump,
    )]
    pub raffle: Account<'info, Raffle>,

    #[account(
        address = raffle.vrf.coordinator @ RaffleError::OnlyCoordinatorCanFulfill
    )]
    pub coordinator: Signer<'info>,

    /// Ledger entry selected by the random word.
    /// CHECK: compared against the selected entrant before any lamports move.
    #[account(mut)]
    pub winner: UncheckedAccount<'info>,
}

/// Resolves the pending request.
///
/// Steps:
/// 1. Match `request_id` against the outstanding request.
/// 2. Select `players[random_words[0] % players.len()]`.
/// 3. Move the whole pot from the raffle account to the winner.
/// 4. Clear the ledger, restart the round clock and reopen entries.
pub fn process_fulfill_random_words(
    ctx: Context<FulfillRandomWords>,
    request_id: u64,
    random_words: Vec<u64>,
) -> Result<()> {
    let clock = Clock::get()?;
    let rent = Rent::get()?;
    let vault = ctx.accounts.raffle.to_account_info();
    let recipient = ctx.accounts.winner.to_account_info();

    let event = ctx.accounts.raffle.fulfill_random_words(
        request_id,
        &random_words,
        clock.unix_timestamp,
        |winner, prize| pay_winner(&vault, &recipient, winner, prize, &rent),
    )?;

    emit!(event);
    Ok(())
}

fn pay_winner(
    vault: &AccountInfo,
    recipient: &AccountInfo,
    winner: &Pubkey,
    prize: u64,
    rent: &Rent,
) -> Result<()> {
    if recipient.key != winner {
        msg!("Winner account {} is not the selected entrant {}", recipient.key, winner);
        return err!(RaffleError::PayoutTransferFailed);
    }
    if recipient.executable {
        msg!("Winner account {} is executable", winner);
        return err!(RaffleError::PayoutTransferFailed);
    }

    let credited = recipient
        .lamports()
        .checked_add(prize)
        .ok_or(RaffleError::PayoutTransferFailed)?;
    if !rent.is_exempt(credited, recipient.data_len()) {
        msg!("Prize {} leaves {} below rent exemption", prize, winner);
        return err!(RaffleError::PayoutTransferFailed);
    }
    let debited = vault
        .lamports()
        .checked_sub(prize)
        .ok_or(RaffleError::PayoutTransferFailed)?;

    **vault.try_borrow_mut_lamports()? = debited;
    **recipient.try_borrow_mut_lamports()? = credited;
    Ok(())
}
