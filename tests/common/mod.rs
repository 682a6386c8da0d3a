//! Shared helpers for pool integration tests.

use rand::Rng;
use tickpool_core::transaction::{Transaction, TxHeader, SIGNATURE_LEN};
use tickpool_core::{PoolConfig, Tick};

/// Route pool logs to the test output when `RUST_LOG` asks for them.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// The small-limits sizing used throughout the integration tests.
#[allow(dead_code)]
pub fn test_config() -> PoolConfig {
    PoolConfig::with_small_limits()
}

/// A valid wire record for `tick` with random keys and the given payload
/// size.
pub fn random_tx<R: Rng>(rng: &mut R, tick: Tick, input_size: usize) -> Vec<u8> {
    let mut payload = vec![0u8; input_size];
    rng.fill(&mut payload[..]);
    let mut signature = [0u8; SIGNATURE_LEN];
    rng.fill(&mut signature[..]);
    Transaction::assemble(
        TxHeader {
            source: rng.gen(),
            destination: rng.gen(),
            amount: 10,
            tick,
            input_type: 0,
            input_size: 0,
        },
        &payload,
        signature,
    )
    .as_bytes()
    .to_vec()
}

/// A minimal (no-payload) valid record for `tick`.
#[allow(dead_code)]
pub fn minimal_tx(tick: Tick) -> Vec<u8> {
    Transaction::assemble(
        TxHeader {
            source: [7u8; 32],
            destination: [8u8; 32],
            amount: 1,
            tick,
            input_type: 0,
            input_size: 0,
        },
        &[],
        [9u8; SIGNATURE_LEN],
    )
    .as_bytes()
    .to_vec()
}
