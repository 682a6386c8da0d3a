//! Randomized epoch-transition scenarios.
//!
//! Drives the pool through three consecutive epochs with random epoch
//! lengths, start ticks, and per-tick transaction loads, and checks that
//! everything the pool accepted stays readable with the right content and
//! digest until it is legitimately evicted.

mod common;

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use tickpool::{Blake3Hasher, DigestHasher, SubmitError, Tick, TxPool};

/// Submit a random number of random transactions for `tick`; returns the
/// accepted records in submit order.
fn add_tick_transactions(
    pool: &TxPool,
    rng: &mut StdRng,
    tick: Tick,
    max_transactions: usize,
) -> Vec<Vec<u8>> {
    let mut accepted = Vec::new();
    let tx_num = rng.gen_range(0..=max_transactions);
    for _ in 0..tx_num {
        let input_size = rng.gen_range(0..pool.config().max_input_size as usize);
        let bytes = common::random_tx(rng, tick, input_size);
        match pool.submit(&bytes) {
            Ok(slot) => {
                assert_eq!(slot as usize, accepted.len());
                accepted.push(bytes);
            }
            // the arena can run out of bytes before the slot table does
            Err(SubmitError::PoolFull { .. }) => {}
            Err(e) => panic!("unexpected rejection for tick {tick}: {e}"),
        }
    }
    pool.verify().unwrap();
    accepted
}

/// Every accepted record of a current-epoch tick must be stored verbatim.
fn check_current_tick(pool: &TxPool, tick: Tick, accepted: &[Vec<u8>]) {
    assert_eq!(pool.tick_tx_count(tick) as usize, accepted.len());
    for (i, bytes) in accepted.iter().enumerate() {
        let tx = pool.get(tick, i as u32).unwrap();
        assert_eq!(tx.as_bytes(), &bytes[..], "tick {tick} slot {i}");
        assert_eq!(tx.tick(), tick);
        assert_eq!(
            pool.digest(tick, i as u32).unwrap(),
            Blake3Hasher.digest(bytes)
        );
    }
    assert!(pool.get(tick, accepted.len() as u32).is_none());
}

/// A retained previous-epoch tick may have lost its oldest records to the
/// previous-region byte budget; whatever survives is the newest suffix,
/// compacted to the front.
fn check_previous_tick(pool: &TxPool, tick: Tick, accepted: &[Vec<u8>]) {
    if !pool.window().in_previous(tick) {
        assert_eq!(pool.tick_tx_count(tick), 0);
        assert!(pool.get(tick, 0).is_none());
        return;
    }
    let stored = pool.tick_tx_count(tick) as usize;
    assert!(stored <= accepted.len(), "tick {tick} grew records");
    let survivors = &accepted[accepted.len() - stored..];
    for (i, bytes) in survivors.iter().enumerate() {
        let tx = pool.get(tick, i as u32).unwrap();
        assert_eq!(tx.as_bytes(), &bytes[..], "retained tick {tick} slot {i}");
        assert_eq!(
            pool.digest(tick, i as u32).unwrap(),
            Blake3Hasher.digest(bytes)
        );
    }
    assert!(pool.get(tick, stored as u32).is_none());
}

#[test]
fn test_epoch_transitions_with_random_load() {
    common::init_tracing();
    let mut rng = StdRng::seed_from_u64(42);
    let config = common::test_config();
    let max_ticks = config.max_ticks_per_epoch;

    for test_idx in 0..6 {
        // first iteration exercises the empty-pool transitions
        let max_transactions = if test_idx == 0 {
            0
        } else {
            config.max_txs_per_tick
        };

        let mut pool = TxPool::new(config.clone()).unwrap();
        pool.verify().unwrap();

        let epoch_ticks: [u32; 3] = [
            rng.gen_range(0..=max_ticks),
            rng.gen_range(0..=max_ticks),
            rng.gen_range(0..=max_ticks),
        ];
        let first_tick0 = rng.gen_range(1..10_000_000u32);
        let epoch_start = [
            first_tick0,
            first_tick0 + epoch_ticks[0],
            first_tick0 + epoch_ticks[0] + epoch_ticks[1],
        ];

        let mut recorded: HashMap<Tick, Vec<Vec<u8>>> = HashMap::new();

        for epoch in 0..3 {
            pool.begin_epoch(epoch_start[epoch]);
            pool.verify().unwrap();

            for i in 0..epoch_ticks[epoch] {
                let tick = epoch_start[epoch] + i;
                let accepted = add_tick_transactions(&pool, &mut rng, tick, max_transactions);
                recorded.insert(tick, accepted);
            }

            for i in 0..epoch_ticks[epoch] {
                let tick = epoch_start[epoch] + i;
                check_current_tick(&pool, tick, &recorded[&tick]);
            }
            if epoch > 0 {
                for i in 0..epoch_ticks[epoch - 1] {
                    let tick = epoch_start[epoch - 1] + i;
                    check_previous_tick(&pool, tick, &recorded[&tick]);
                }
            }
            pool.verify().unwrap();
        }
    }
}

#[test]
fn test_zero_length_epoch_forces_cold_start() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut pool = TxPool::new(common::test_config()).unwrap();

    pool.begin_epoch(5000);
    let bytes = common::random_tx(&mut rng, 5001, 16);
    pool.submit(&bytes).unwrap();

    // an epoch that produced no ticks restarts at the same first tick,
    // which cannot be a seamless transition
    pool.begin_epoch(5000);
    assert_eq!(pool.tick_tx_count(5001), 0);
    assert_eq!(pool.window().old_tick_end(), 0);
    pool.verify().unwrap();
}
