#![allow(unexpected_cfgs)]

use anchor_lang::prelude::*;
use instructions::*;

pub mod constants;
pub mod error;
pub mod events;
pub mod instructions;
pub mod oracle;
pub mod state;

use state::{InitializeParams, UpkeepStatus};

declare_id!("F9Zcc3WtrYrBfNLH8FebpT8MhPDXUPvpQ4rRLetGdbsM");

#[program]
pub mod raffle {
    use super::*;

    pub fn initialize(ctx: Context<Initialize>, params: InitializeParams) -> Result<()> {
        process_initialize(ctx, params)
    }

    pub fn enter_raffle(ctx: Context<EnterRaffle>, payment: u64) -> Result<()> {
        process_enter_raffle(ctx, payment)
    }

    pub fn check_upkeep(ctx: Context<CheckUpkeep>, check_data: Vec<u8>) -> Result<UpkeepStatus> {
        process_check_upkeep(ctx, check_data)
    }

    pub fn perform_upkeep(ctx: Context<PerformUpkeep>, perform_data: Vec<u8>) -> Result<u64> {
        process_perform_upkeep(ctx, perform_data)
    }

    pub fn fulfill_random_words(
        ctx: Context<FulfillRandomWords>,
        request_id: u64,
        random_words: Vec<u64>,
    ) -> Result<()> {
        process_fulfill_random_words(ctx, request_id, random_words)
    }

    pub fn get_player(ctx: Context<GetPlayer>, index: u64) -> Result<Pubkey> {
        process_get_player(ctx, index)
    }
}
