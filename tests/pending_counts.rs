//! Pending and per-tick count accounting under random load.

mod common;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use tickpool::{SubmitError, Tick, TxPool};

/// Submit a random load for `tick`, returning how many records were
/// accepted.
fn add_tick_transactions(
    pool: &TxPool,
    rng: &mut StdRng,
    tick: Tick,
    max_transactions: usize,
) -> u32 {
    let mut added = 0u32;
    let tx_num = rng.gen_range(0..=max_transactions);
    for _ in 0..tx_num {
        let input_size = rng.gen_range(0..pool.config().max_input_size as usize);
        let bytes = common::random_tx(rng, tick, input_size);
        match pool.submit(&bytes) {
            Ok(_) => added += 1,
            Err(SubmitError::PoolFull { .. }) => {}
            Err(e) => panic!("unexpected rejection: {e}"),
        }
    }
    pool.verify().unwrap();
    added
}

#[test]
fn test_pending_tx_counts() {
    let mut rng = StdRng::seed_from_u64(1337);
    let config = common::test_config();

    for test_idx in 0..6 {
        let max_transactions = if test_idx == 0 {
            0
        } else {
            config.max_txs_per_tick
        };

        let mut pool = TxPool::new(config.clone()).unwrap();
        let epoch_ticks = rng.gen_range(0..=config.max_ticks_per_epoch) as usize;
        let tick0 = rng.gen_range(1..10_000_000u32);
        pool.begin_epoch(tick0);

        // fill from the last tick backwards so pending counts accumulate
        // while earlier ticks are still being added
        let mut added = vec![0u32; epoch_ticks];
        let mut pending = vec![0u32; epoch_ticks];
        for i in (0..epoch_ticks).rev() {
            added[i] = add_tick_transactions(&pool, &mut rng, tick0 + i as u32, max_transactions);
            if i > 0 {
                pending[i - 1] = pending[i] + added[i];
            }
        }

        let total: u32 = added.iter().sum();
        // a tick before the epoch sees everything as pending
        assert_eq!(pool.pending_tx_count(tick0 - 1), total);
        for i in 0..epoch_ticks {
            assert_eq!(
                pool.pending_tx_count(tick0 + i as u32),
                pending[i],
                "pending after tick {i}"
            );
        }
    }
}

#[test]
fn test_tick_tx_counts() {
    let mut rng = StdRng::seed_from_u64(67534);
    let config = common::test_config();

    for test_idx in 0..6 {
        let max_transactions = if test_idx == 0 {
            0
        } else {
            config.max_txs_per_tick
        };

        let mut pool = TxPool::new(config.clone()).unwrap();
        let epoch_ticks = rng.gen_range(0..=config.max_ticks_per_epoch) as usize;
        let tick0 = rng.gen_range(1..10_000_000u32);
        pool.begin_epoch(tick0);

        let mut added = vec![0u32; epoch_ticks];
        for i in (0..epoch_ticks).rev() {
            added[i] = add_tick_transactions(&pool, &mut rng, tick0 + i as u32, max_transactions);
        }

        assert_eq!(pool.tick_tx_count(tick0 - 1), 0);
        for i in 0..epoch_ticks {
            assert_eq!(pool.tick_tx_count(tick0 + i as u32), added[i]);
        }
    }
}

#[test]
fn test_pending_counts_span_both_windows() {
    let mut rng = StdRng::seed_from_u64(9);
    let mut pool = TxPool::new(common::test_config()).unwrap();
    pool.begin_epoch(100);

    // two records in what will become the retained tail, one outside it
    pool.submit(&common::random_tx(&mut rng, 120, 4)).unwrap();
    pool.submit(&common::random_tx(&mut rng, 128, 4)).unwrap();
    pool.submit(&common::random_tx(&mut rng, 129, 4)).unwrap();
    pool.begin_epoch(130);
    pool.submit(&common::random_tx(&mut rng, 131, 4)).unwrap();

    // retained window is [125, 130): the tick-120 record is gone
    assert_eq!(pool.pending_tx_count(0), 3);
    assert_eq!(pool.pending_tx_count(124), 3);
    assert_eq!(pool.pending_tx_count(128), 2);
    assert_eq!(pool.pending_tx_count(129), 1);
    assert_eq!(pool.pending_tx_count(130), 1);
    assert_eq!(pool.pending_tx_count(131), 0);
    pool.verify().unwrap();
}
