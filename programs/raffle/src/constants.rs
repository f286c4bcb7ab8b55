use anchor_lang::prelude::*;

/// Seed of the singleton raffle PDA.
#[constant]
pub const RAFFLE_SEED: &[u8] = b"raffle";

/// Block confirmations the coordinator waits for before answering.
#[constant]
pub const REQUEST_CONFIRMATIONS: u16 = 3;

/// Random words requested per round. Only the first one picks the winner.
#[constant]
pub const NUM_WORDS: u32 = 1;

/// Bytes added to the raffle account for every ledger slot.
pub const PLAYER_SLOT_SPACE: usize = 32;

/// Anchor account discriminator length.
pub const DISCRIMINATOR_SPACE: usize = 8;

/// Ledger slots per round. The whole ledger is deserialized onto the
/// program heap on every instruction, so it must stay well below 32 KiB.
#[constant]
pub const MAX_PLAYERS: u32 = 100;
