use std::fmt;

use anchor_lang::prelude::*;

use crate::constants::{
    DISCRIMINATOR_SPACE, MAX_PLAYERS, NUM_WORDS, PLAYER_SLOT_SPACE, REQUEST_CONFIRMATIONS,
};
use crate::error::RaffleError;
use crate::events::{EntrantJoined, RequestedRaffleWinner, WinnerPicked};
use crate::oracle::{RandomWordsRequest, RandomnessCoordinator, VrfConfig};

/// Round lifecycle. A randomness request can only be outstanding while
/// calculating, and there is never more than one.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub enum RaffleState {
    Open,
    /// Waiting for the coordinator to answer `request_id`.
    Calculating { request_id: u64 },
}

impl fmt::Display for RaffleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RaffleState::Open => write!(f, "open"),
            RaffleState::Calculating { request_id } => {
                write!(f, "calculating (request {})", request_id)
            }
        }
    }
}

/// Arguments of the `initialize` instruction.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct InitializeParams {
    /// Minimum payment, in lamports, for one ledger slot.
    pub entrance_fee: u64,
    /// Seconds that must pass between rounds.
    pub interval: i64,
    pub vrf: VrfConfig,
}

/// Result of the eligibility check, with every condition spelled out so the
/// upkeep caller can tell which one is missing.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct UpkeepStatus {
    pub upkeep_needed: bool,
    /// Echo of the caller's check data. Not interpreted by the raffle.
    pub perform_data: Vec<u8>,
    pub is_open: bool,
    pub time_passed: bool,
    pub has_balance: bool,
    pub has_players: bool,
    pub balance: u64,
    pub num_players: u64,
    pub raffle_state: RaffleState,
}

#[account]
#[derive(InitSpace, Debug, PartialEq, Eq)]
pub struct Raffle {
    /// The bump seed used for deriving the PDA address of this account.
    pub bump: u8,

    /// Minimum lamports per entry.
    pub entrance_fee: u64,

    /// Seconds between the start of a round and the earliest draw.
    pub interval: i64,

    /// Unix timestamp of the start of the current round. Moves only when a
    /// winner is paid.
    pub last_timestamp: i64,

    /// Lamports collected this round. Held by this account on top of its
    /// rent-exempt reserve.
    pub pot: u64,

    /// Winner of the last resolved round, `Pubkey::default()` before the first.
    pub recent_winner: Pubkey,

    pub raffle_state: RaffleState,

    /// Number of randomness requests issued so far. The next request uses
    /// `request_nonce + 1`.
    pub request_nonce: u64,

    pub vrf: VrfConfig,

    /// Entrants of the current round in order of entry. The same key may
    /// appear several times. The account is reallocated as this grows.
    #[max_len(0)]
    pub players: Vec<Pubkey>,
}

impl Raffle {
    /// Account size needed to hold `players` ledger slots.
    pub fn space_for(players: usize) -> usize {
        DISCRIMINATOR_SPACE + Raffle::INIT_SPACE + players * PLAYER_SLOT_SPACE
    }

    pub fn new(bump: u8, params: &InitializeParams, now: i64) -> Result<Self> {
        require_gt!(params.entrance_fee, 0, RaffleError::InvalidConfig);
        require_gt!(params.interval, 0, RaffleError::InvalidConfig);
        params.vrf.validate()?;

        Ok(Self {
            bump,
            entrance_fee: params.entrance_fee,
            interval: params.interval,
            last_timestamp: now,
            pot: 0,
            recent_winner: Pubkey::default(),
            raffle_state: RaffleState::Open,
            request_nonce: 0,
            vrf: params.vrf,
            players: Vec::new(),
        })
    }

    pub fn is_open(&self) -> bool {
        self.raffle_state == RaffleState::Open
    }

    pub fn pending_request(&self) -> Option<u64> {
        match self.raffle_state {
            RaffleState::Open => None,
            RaffleState::Calculating { request_id } => Some(request_id),
        }
    }

    pub fn number_of_players(&self) -> u64 {
        self.players.len() as u64
    }

    pub fn player(&self, index: u64) -> Result<Pubkey> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.players.get(i))
            .copied()
            .ok_or_else(|| error!(RaffleError::PlayerIndexOutOfBounds))
    }

    pub fn request_confirmations(&self) -> u16 {
        REQUEST_CONFIRMATIONS
    }

    pub fn num_words(&self) -> u32 {
        NUM_WORDS
    }

    /// Records one paid entry. The whole payment goes to the pot.
    pub fn enter(&mut self, player: Pubkey, payment: u64) -> Result<EntrantJoined> {
        if !self.is_open() {
            msg!("Entry refused, raffle is {}", self.raffle_state);
            return err!(RaffleError::RoundNotOpen);
        }
        if payment < self.entrance_fee {
            msg!(
                "Payment {} is below the entrance fee {}",
                payment,
                self.entrance_fee
            );
            return err!(RaffleError::InsufficientPayment);
        }
        if self.players.len() >= MAX_PLAYERS as usize {
            msg!("Entry refused, all {} slots taken", MAX_PLAYERS);
            return err!(RaffleError::RaffleFull);
        }

        let pot = self
            .pot
            .checked_add(payment)
            .ok_or(RaffleError::MathOverflow)?;
        let entrant_index = self.number_of_players();
        self.players.push(player);
        self.pot = pot;

        msg!("Player {} took slot {}", player, entrant_index);
        Ok(EntrantJoined {
            player,
            payment,
            entrant_index,
        })
    }

    /// Eligibility predicate. Never mutates, safe to call in any state.
    pub fn check_upkeep(&self, now: i64, check_data: &[u8]) -> UpkeepStatus {
        let is_open = self.is_open();
        let time_passed = now.saturating_sub(self.last_timestamp) >= self.interval;
        let has_balance = self.pot > 0;
        let has_players = !self.players.is_empty();

        UpkeepStatus {
            upkeep_needed: is_open && time_passed && has_balance && has_players,
            perform_data: check_data.to_vec(),
            is_open,
            time_passed,
            has_balance,
            has_players,
            balance: self.pot,
            num_players: self.number_of_players(),
            raffle_state: self.raffle_state,
        }
    }

    /// Closes entries and asks `coordinator` for a random word.
    ///
    /// Nothing changes if the raffle is not eligible or the coordinator
    /// refuses the request.
    pub fn perform_upkeep<C: RandomnessCoordinator>(
        &mut self,
        consumer: Pubkey,
        now: i64,
        coordinator: &mut C,
    ) -> Result<RequestedRaffleWinner> {
        let status = self.check_upkeep(now, &[]);
        if !status.upkeep_needed {
            msg!(
                "Upkeep not needed: balance {}, players {}, state {}",
                status.balance,
                status.num_players,
                status.raffle_state
            );
            return err!(RaffleError::UpkeepNotNeeded);
        }

        let nonce = self
            .request_nonce
            .checked_add(1)
            .ok_or(RaffleError::MathOverflow)?;
        let request = RandomWordsRequest::new(consumer, &self.vrf, nonce);
        let request_id = coordinator.request_random_words(&request)?;
        // Zero is what a callback for a never-issued request looks like.
        require_neq!(request_id, 0, RaffleError::UnknownRequest);

        self.request_nonce = nonce;
        self.raffle_state = RaffleState::Calculating { request_id };

        msg!(
            "Requested raffle winner: request {}, {} players, pot {}",
            request_id,
            self.players.len(),
            self.pot
        );
        Ok(RequestedRaffleWinner { request_id })
    }

    /// Resolves the pending request: picks `players[random_words[0] % len]`,
    /// hands the pot to `payout` and starts a new round.
    ///
    /// The raffle is only modified after `payout` succeeds.
    pub fn fulfill_random_words<F>(
        &mut self,
        request_id: u64,
        random_words: &[u64],
        now: i64,
        payout: F,
    ) -> Result<WinnerPicked>
    where
        F: FnOnce(&Pubkey, u64) -> Result<()>,
    {
        if self.pending_request() != Some(request_id) {
            msg!(
                "No pending request {}, raffle is {}",
                request_id,
                self.raffle_state
            );
            return err!(RaffleError::UnknownRequest);
        }
        let Some(&random_word) = random_words.first() else {
            msg!("Request {} delivered no random words", request_id);
            return err!(RaffleError::UnknownRequest);
        };
        let index = winner_index(random_word, self.players.len())
            .ok_or(RaffleError::UnknownRequest)?;
        let winner = self.players[index];
        let prize = self.pot;

        if let Err(e) = payout(&winner, prize) {
            msg!("Payout of {} lamports to {} failed: {}", prize, winner, e);
            return err!(RaffleError::PayoutTransferFailed);
        }

        self.recent_winner = winner;
        self.players.clear();
        self.pot = 0;
        self.last_timestamp = now;
        self.raffle_state = RaffleState::Open;

        msg!("Winner picked: {} (slot {}), prize {}", winner, index, prize);
        Ok(WinnerPicked {
            winner,
            request_id,
            winner_index: index as u64,
            prize,
        })
    }
}

/// Ledger slot selected by `random_word`. `None` for an empty ledger.
pub fn winner_index(random_word: u64, num_players: usize) -> Option<usize> {
    if num_players == 0 {
        return None;
    }
    Some((random_word % num_players as u64) as usize)
}
