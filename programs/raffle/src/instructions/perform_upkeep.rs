use anchor_lang::prelude::*;

use crate::constants::RAFFLE_SEED;
use crate::oracle::LoggedCoordinator;
use crate::state::Raffle;

/// Accounts required to close the round and request randomness.
///
/// Anyone may call this. The eligibility check is the only gate.
#[derive(Accounts)]
pub struct PerformUpkeep<'info> {
    /// The upkeep caller paying transaction fees.
    pub caller: Signer<'info>,

    /// The main raffle state account.
    #[account(
        mut,
        seeds = [RAFFLE_SEED],
        bump = raffle.bump,
    )]
    pub raffle: Account<'info, Raffle>,
}

/// Re-checks eligibility, moves the raffle to calculating and requests one
/// random word. The request id is returned and emitted in
/// `RequestedRaffleWinner`.
pub fn process_perform_upkeep(ctx: Context<PerformUpkeep>, _perform_data: Vec<u8>) -> Result<u64> {
    let clock = Clock::get()?;
    let consumer = ctx.accounts.raffle.key();
    let mut coordinator = LoggedCoordinator::new();

    msg!("Upkeep performed by {}", ctx.accounts.caller.key());
    let event = ctx
        .accounts
        .raffle
        .perform_upkeep(consumer, clock.unix_timestamp, &mut coordinator)?;
    let request_id = event.request_id;
    if let Some(request) = coordinator.last_request() {
        msg!(
            "Request {} waits for {} confirmations, {} word(s), {} compute units",
            request.request_id,
            request.request_confirmations,
            request.num_words,
            request.callback_compute_limit
        );
    }

    emit!(event);
    Ok(request_id)
}
