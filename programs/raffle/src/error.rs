use anchor_lang::prelude::*;

#[error_code]
pub enum RaffleError {
    #[msg("Raffle is not open")]
    RoundNotOpen,
    #[msg("Payment is below the entrance fee")]
    InsufficientPayment,
    #[msg("Upkeep not needed")]
    UpkeepNotNeeded,
    #[msg("Unknown randomness request")]
    UnknownRequest,
    #[msg("Prize transfer to the winner failed")]
    PayoutTransferFailed,
    #[msg("Invalid raffle configuration")]
    InvalidConfig,
    #[msg("Only the configured coordinator can fulfill randomness")]
    OnlyCoordinatorCanFulfill,
    #[msg("Player index out of bounds")]
    PlayerIndexOutOfBounds,
    #[msg("Arithmetic overflow")]
    MathOverflow,
    #[msg("Raffle is full for this round")]
    RaffleFull,
}
