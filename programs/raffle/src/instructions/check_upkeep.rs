use anchor_lang::prelude::*;

use crate::constants::RAFFLE_SEED;
use crate::state::{Raffle, UpkeepStatus};

#[derive(Accounts)]
pub struct CheckUpkeep<'info> {
    #[account(
        seeds = [RAFFLE_SEED],
        bump = raffle.bump
    )]
    pub raffle: Account<'info, Raffle>,
}

/// Read-only eligibility check for the upkeep caller, meant to be simulated.
/// The status comes back as return data.
pub fn process_check_upkeep(ctx: Context<CheckUpkeep>, check_data: Vec<u8>) -> Result<UpkeepStatus> {
    let clock = Clock::get()?;
    let status = ctx
        .accounts
        .raffle
        .check_upkeep(clock.unix_timestamp, &check_data);

    msg!(
        "Upkeep needed: {} (open {}, time passed {}, balance {}, players {})",
        status.upkeep_needed,
        status.is_open,
        status.time_passed,
        status.balance,
        status.num_players
    );
    Ok(status)
}
