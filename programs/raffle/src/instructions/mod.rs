/// Creates the raffle account and fixes its configuration.
pub mod initialize;

/// Pays the entrance fee and takes a ledger slot.
pub mod enter_raffle;

/// Read-only eligibility check for the upkeep caller.
pub mod check_upkeep;

/// Closes the round and requests randomness from the coordinator.
pub mod perform_upkeep;

/// Coordinator callback: picks the winner and pays out the pot.
pub mod fulfill_random_words;

/// Ledger accessor.
pub mod get_player;

pub use check_upkeep::*;
pub use enter_raffle::*;
pub use fulfill_random_words::*;
pub use get_player::*;
pub use initialize::*;
pub use perform_upkeep::*;
