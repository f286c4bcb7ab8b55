use anchor_lang::prelude::*;

#[event]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntrantJoined {
    pub player: Pubkey,
    pub payment: u64,
    /// Ledger slot taken by this entry.
    pub entrant_index: u64,
}

/// Emitted by the coordinator side when a request is accepted. The off-chain
/// oracle answers every `RandomWordsRequested` addressed to a known consumer.
#[event]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RandomWordsRequested {
    pub request_id: u64,
    pub consumer: Pubkey,
    pub key_hash: [u8; 32],
    pub subscription_id: u64,
    pub request_confirmations: u16,
    pub callback_compute_limit: u32,
    pub num_words: u32,
}

#[event]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestedRaffleWinner {
    pub request_id: u64,
}

#[event]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WinnerPicked {
    pub winner: Pubkey,
    pub request_id: u64,
    pub winner_index: u64,
    /// Lamports paid out to `winner`.
    pub prize: u64,
}
