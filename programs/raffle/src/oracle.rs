use anchor_lang::prelude::*;

use crate::constants::{NUM_WORDS, REQUEST_CONFIRMATIONS};
use crate::error::RaffleError;
use crate::events::RandomWordsRequested;

/// Connection parameters for the randomness coordinator, fixed at initialization.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub struct VrfConfig {
    /// Key of the oracle that signs `fulfill_random_words`.
    pub coordinator: Pubkey,
    /// Gas lane of the proving key the oracle should use.
    pub key_hash: [u8; 32],
    /// Subscription paying for the requests.
    pub subscription_id: u64,
    /// Compute units reserved for the fulfillment callback.
    pub callback_compute_limit: u32,
}

impl VrfConfig {
    pub fn validate(&self) -> Result<()> {
        require_keys_neq!(
            self.coordinator,
            Pubkey::default(),
            RaffleError::InvalidConfig
        );
        require!(
            self.key_hash != [0u8; 32],
            RaffleError::InvalidConfig
        );
        require!(self.subscription_id > 0, RaffleError::InvalidConfig);
        require!(self.callback_compute_limit > 0, RaffleError::InvalidConfig);
        Ok(())
    }
}

/// One request for random words, as handed to a [`RandomnessCoordinator`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RandomWordsRequest {
    pub consumer: Pubkey,
    pub key_hash: [u8; 32],
    pub subscription_id: u64,
    pub request_confirmations: u16,
    pub callback_compute_limit: u32,
    pub num_words: u32,
    /// Per-consumer request counter, strictly increasing and starting at 1.
    pub nonce: u64,
}

impl RandomWordsRequest {
    pub fn new(consumer: Pubkey, config: &VrfConfig, nonce: u64) -> Self {
        Self {
            consumer,
            key_hash: config.key_hash,
            subscription_id: config.subscription_id,
            request_confirmations: REQUEST_CONFIRMATIONS,
            callback_compute_limit: config.callback_compute_limit,
            num_words: NUM_WORDS,
            nonce,
        }
    }
}

/// Accepts randomness requests and acknowledges them with a request id.
///
/// The answer arrives later and separately, as a `fulfill_random_words`
/// instruction signed by the coordinator key.
pub trait RandomnessCoordinator {
    fn request_random_words(&mut self, request: &RandomWordsRequest) -> Result<u64>;
}

/// Coordinator reached through the program log.
///
/// The request id is the consumer nonce. The oracle picks requests up from
/// the emitted [`RandomWordsRequested`] event.
#[derive(Default)]
pub struct LoggedCoordinator {
    last_request: Option<RandomWordsRequested>,
}

impl LoggedCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The request acknowledged by the last `request_random_words` call.
    pub fn last_request(&self) -> Option<&RandomWordsRequested> {
        self.last_request.as_ref()
    }
}

impl RandomnessCoordinator for LoggedCoordinator {
    fn request_random_words(&mut self, request: &RandomWordsRequest) -> Result<u64> {
        require!(request.nonce > 0, RaffleError::UnknownRequest);

        let event = RandomWordsRequested {
            request_id: request.nonce,
            consumer: request.consumer,
            key_hash: request.key_hash,
            subscription_id: request.subscription_id,
            request_confirmations: request.request_confirmations,
            callback_compute_limit: request.callback_compute_limit,
            num_words: request.num_words,
        };
        msg!(
            "Randomness requested: id {}, subscription {}",
            event.request_id,
            event.subscription_id
        );
        emit!(event.clone());
        self.last_request = Some(event);

        Ok(request.nonce)
    }
}
