use std::collections::HashMap;

use anchor_lang::prelude::*;
use raffle::error::RaffleError;
use raffle::oracle::{RandomWordsRequest, RandomnessCoordinator, VrfConfig};
use raffle::state::{InitializeParams, Raffle, RaffleState};

const ONE_SOL: u64 = 1_000_000_000;
const INTERVAL: i64 = 30;
const DEPLOYED_AT: i64 = 1_700_000_000;

/// In-memory coordinator: numbers requests from 1 and remembers which ones
/// are still waiting for an answer.
#[derive(Default)]
struct MockCoordinator {
    counter: u64,
    pending: HashMap<u64, RandomWordsRequest>,
}

impl RandomnessCoordinator for MockCoordinator {
    fn request_random_words(&mut self, request: &RandomWordsRequest) -> Result<u64> {
        self.counter += 1;
        self.pending.insert(self.counter, request.clone());
        Ok(self.counter)
    }
}

/// Lamport balances outside the raffle.
#[derive(Default)]
struct Wallets {
    balances: HashMap<Pubkey, u64>,
    rejects: Vec<Pubkey>,
}

impl Wallets {
    fn balance(&self, key: &Pubkey) -> u64 {
        self.balances.get(key).copied().unwrap_or_default()
    }

    fn credit(&mut self, key: &Pubkey, amount: u64) -> Result<()> {
        if self.rejects.contains(key) {
            return err!(RaffleError::PayoutTransferFailed);
        }
        *self.balances.entry(*key).or_default() += amount;
        Ok(())
    }
}

fn deploy(entrance_fee: u64) -> Raffle {
    let params = InitializeParams {
        entrance_fee,
        interval: INTERVAL,
        vrf: VrfConfig {
            coordinator: Pubkey::new_unique(),
            key_hash: [0xd8; 32],
            subscription_id: 1,
            callback_compute_limit: 500_000,
        },
    };
    Raffle::new(255, &params, DEPLOYED_AT).unwrap()
}

fn trigger(raffle: &mut Raffle, coordinator: &mut MockCoordinator, now: i64) -> u64 {
    raffle
        .perform_upkeep(Pubkey::new_unique(), now, coordinator)
        .unwrap()
        .request_id
}

#[test]
fn single_entrant_wins_whole_pot() {
    let mut raffle = deploy(ONE_SOL);
    let mut coordinator = MockCoordinator::default();
    let mut wallets = Wallets::default();
    let a = Pubkey::new_unique();

    raffle.enter(a, ONE_SOL).unwrap();
    let now = DEPLOYED_AT + INTERVAL + 1;
    assert!(raffle.check_upkeep(now, &[]).upkeep_needed);

    let request_id = trigger(&mut raffle, &mut coordinator, now);
    assert!(request_id > 0);
    assert_eq!(raffle.raffle_state, RaffleState::Calculating { request_id });

    let resolved_at = now + 5;
    let event = raffle
        .fulfill_random_words(request_id, &[7], resolved_at, |winner, prize| {
            wallets.credit(winner, prize)
        })
        .unwrap();

    assert_eq!(event.winner, a);
    assert_eq!(wallets.balance(&a), ONE_SOL);
    assert_eq!(raffle.recent_winner, a);
    assert_eq!(raffle.pot, 0);
    assert_eq!(raffle.number_of_players(), 0);
    assert_eq!(raffle.raffle_state, RaffleState::Open);
    assert!(raffle.last_timestamp > DEPLOYED_AT);
    assert_eq!(raffle.last_timestamp, resolved_at);
    assert!(raffle.player(0).is_err());
}

#[test]
fn repeat_entrant_weighted_by_slots() {
    let mut raffle = deploy(ONE_SOL);
    let mut coordinator = MockCoordinator::default();
    let mut wallets = Wallets::default();
    let (a, b, c) = (
        Pubkey::new_unique(),
        Pubkey::new_unique(),
        Pubkey::new_unique(),
    );

    for player in [a, b, b, c] {
        raffle.enter(player, ONE_SOL).unwrap();
    }
    let now = DEPLOYED_AT + INTERVAL;
    let request_id = trigger(&mut raffle, &mut coordinator, now);

    let event = raffle
        .fulfill_random_words(request_id, &[5], now, |winner, prize| {
            wallets.credit(winner, prize)
        })
        .unwrap();

    assert_eq!(event.winner_index, 1);
    assert_eq!(event.winner, b);
    assert_eq!(event.prize, 4 * ONE_SOL);
    assert_eq!(wallets.balance(&b), 4 * ONE_SOL);
    assert_eq!(wallets.balance(&a), 0);
    assert_eq!(wallets.balance(&c), 0);
}

#[test]
fn entries_after_trigger_are_refused() {
    let mut raffle = deploy(ONE_SOL);
    let mut coordinator = MockCoordinator::default();
    raffle.enter(Pubkey::new_unique(), ONE_SOL).unwrap();
    trigger(&mut raffle, &mut coordinator, DEPLOYED_AT + INTERVAL + 1);

    let err = raffle.enter(Pubkey::new_unique(), ONE_SOL).unwrap_err();
    assert_eq!(err, Error::from(RaffleError::RoundNotOpen));
    assert_eq!(raffle.number_of_players(), 1);
}

#[test]
fn trigger_again_while_calculating_fails() {
    let mut raffle = deploy(ONE_SOL);
    let mut coordinator = MockCoordinator::default();
    raffle.enter(Pubkey::new_unique(), ONE_SOL).unwrap();
    let now = DEPLOYED_AT + INTERVAL + 1;
    trigger(&mut raffle, &mut coordinator, now);

    let err = raffle
        .perform_upkeep(Pubkey::new_unique(), now, &mut coordinator)
        .unwrap_err();
    assert_eq!(err, Error::from(RaffleError::UpkeepNotNeeded));
    assert_eq!(coordinator.pending.len(), 1);
}

#[test]
fn callback_before_any_request_is_rejected() {
    let mut raffle = deploy(ONE_SOL);
    raffle.enter(Pubkey::new_unique(), ONE_SOL).unwrap();
    let before = raffle.clone();

    for id in [0, 1] {
        let err = raffle
            .fulfill_random_words(id, &[1], DEPLOYED_AT + INTERVAL, |_, _| Ok(()))
            .unwrap_err();
        assert_eq!(err, Error::from(RaffleError::UnknownRequest));
    }
    assert_eq!(raffle, before);
}

#[test]
fn request_from_previous_round_is_rejected() {
    let mut raffle = deploy(ONE_SOL);
    let mut coordinator = MockCoordinator::default();
    let mut wallets = Wallets::default();

    raffle.enter(Pubkey::new_unique(), ONE_SOL).unwrap();
    let first_round = DEPLOYED_AT + INTERVAL;
    let first = trigger(&mut raffle, &mut coordinator, first_round);
    raffle
        .fulfill_random_words(first, &[0], first_round, |w, p| wallets.credit(w, p))
        .unwrap();

    raffle.enter(Pubkey::new_unique(), ONE_SOL).unwrap();
    let second_round = first_round + INTERVAL;
    let second = trigger(&mut raffle, &mut coordinator, second_round);
    assert!(second > first);
    let before = raffle.clone();

    let err = raffle
        .fulfill_random_words(first, &[0], second_round, |w, p| wallets.credit(w, p))
        .unwrap_err();
    assert_eq!(err, Error::from(RaffleError::UnknownRequest));
    assert_eq!(raffle, before);

    raffle
        .fulfill_random_words(second, &[0], second_round, |w, p| wallets.credit(w, p))
        .unwrap();
    assert_eq!(raffle.raffle_state, RaffleState::Open);
}

#[test]
fn rejected_payout_keeps_round_pending() {
    let mut raffle = deploy(ONE_SOL);
    let mut coordinator = MockCoordinator::default();
    let a = Pubkey::new_unique();
    let mut wallets = Wallets {
        rejects: vec![a],
        ..Wallets::default()
    };

    raffle.enter(a, ONE_SOL).unwrap();
    let now = DEPLOYED_AT + INTERVAL;
    let request_id = trigger(&mut raffle, &mut coordinator, now);
    let before = raffle.clone();

    let err = raffle
        .fulfill_random_words(request_id, &[3], now + 1, |w, p| wallets.credit(w, p))
        .unwrap_err();

    assert_eq!(err, Error::from(RaffleError::PayoutTransferFailed));
    assert_eq!(raffle, before);
    assert_eq!(raffle.pot, ONE_SOL);
    assert_eq!(raffle.recent_winner, Pubkey::default());
    assert_eq!(wallets.balance(&a), 0);
}

#[test]
fn rounds_cycle_and_clock_restarts() {
    let mut raffle = deploy(ONE_SOL);
    let mut coordinator = MockCoordinator::default();
    let mut wallets = Wallets::default();
    let mut now = DEPLOYED_AT;

    for round in 0..3u64 {
        let player = Pubkey::new_unique();
        raffle.enter(player, ONE_SOL + round).unwrap();
        assert!(!raffle.check_upkeep(now + INTERVAL - 1, &[]).upkeep_needed);

        now += INTERVAL;
        let request_id = trigger(&mut raffle, &mut coordinator, now);
        assert_eq!(request_id, round + 1);
        raffle
            .fulfill_random_words(request_id, &[u64::MAX], now, |w, p| wallets.credit(w, p))
            .unwrap();

        assert_eq!(wallets.balance(&player), ONE_SOL + round);
        assert_eq!(raffle.last_timestamp, now);
    }
    assert_eq!(raffle.request_nonce, 3);
}

#[test]
fn eligibility_check_is_pure() {
    let mut raffle = deploy(ONE_SOL);
    raffle.enter(Pubkey::new_unique(), ONE_SOL).unwrap();
    let snapshot = raffle.clone();
    let now = DEPLOYED_AT + INTERVAL;

    let results: Vec<bool> = (0..5)
        .map(|_| raffle.check_upkeep(now, &[]).upkeep_needed)
        .collect();

    assert!(results.iter().all(|needed| *needed));
    assert_eq!(raffle, snapshot);
}

#[test]
fn requests_carry_vrf_settings() {
    let mut raffle = deploy(ONE_SOL);
    let mut coordinator = MockCoordinator::default();
    raffle.enter(Pubkey::new_unique(), ONE_SOL).unwrap();
    let consumer = Pubkey::new_unique();

    let id = raffle
        .perform_upkeep(consumer, DEPLOYED_AT + INTERVAL, &mut coordinator)
        .unwrap()
        .request_id;

    let request = &coordinator.pending[&id];
    assert_eq!(request.consumer, consumer);
    assert_eq!(request.key_hash, raffle.vrf.key_hash);
    assert_eq!(request.request_confirmations, raffle.request_confirmations());
    assert_eq!(request.num_words, raffle.num_words());
    assert_eq!(request.callback_compute_limit, 500_000);
}
