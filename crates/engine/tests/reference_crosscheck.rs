//! Cross-checks both engine backends against the RustCrypto digests.
//!
//! The tests pad messages themselves, push every block through one engine
//! run and compare the serialised state with `md-5`, `sha1` and `sha2`.

use digest::Digest;
use engine::{
    Algorithm, BLOCK_SIZE, BlockEngine, PeripheralEngine, SimulatedPeripheral, SoftwareEngine,
};
use proptest::prelude::*;
use test_support::{KNOWN_ANSWERS, to_hex};

fn pad(algorithm: Algorithm, message: &[u8]) -> Vec<u8> {
    let mut padded = message.to_vec();
    padded.push(0x80);
    while padded.len() % BLOCK_SIZE != BLOCK_SIZE - 8 {
        padded.push(0);
    }
    let bits = (message.len() as u64).wrapping_mul(8);
    padded.extend_from_slice(&algorithm.word_order().length_bytes(bits));
    padded
}

fn engine_digest(engine: &mut impl BlockEngine, algorithm: Algorithm, message: &[u8]) -> Vec<u8> {
    let mut state = algorithm.initial_state().to_vec();
    engine
        .process_blocks(algorithm, &mut state, &pad(algorithm, message))
        .expect("engine run");
    state
        .iter()
        .flat_map(|word| algorithm.word_order().word_bytes(*word))
        .take(algorithm.digest_len())
        .collect()
}

fn reference_digest(algorithm: Algorithm, message: &[u8]) -> Vec<u8> {
    match algorithm {
        Algorithm::Md5 => md5::Md5::digest(message).to_vec(),
        Algorithm::Sha1 => sha1::Sha1::digest(message).to_vec(),
        Algorithm::Sha224 => sha2::Sha224::digest(message).to_vec(),
        Algorithm::Sha256 => sha2::Sha256::digest(message).to_vec(),
    }
}

fn simulated() -> PeripheralEngine<SimulatedPeripheral> {
    let mut engine = PeripheralEngine::new(SimulatedPeripheral::new().with_latency(3))
        .with_busy_poll_limit(Some(1_000));
    engine.bring_up().expect("simulated bring-up");
    engine
}

mod known_answers {
    use super::*;

    #[test]
    fn software_engine_matches_table() {
        let mut engine = SoftwareEngine::new();
        for kat in KNOWN_ANSWERS {
            let message = kat.message.to_vec();
            for algorithm in Algorithm::ALL {
                assert_eq!(
                    to_hex(&engine_digest(&mut engine, algorithm, &message)),
                    kat.expected(algorithm.name()).unwrap(),
                    "{algorithm} {}",
                    kat.label
                );
            }
        }
    }

    #[test]
    fn simulated_peripheral_matches_table() {
        let mut engine = simulated();
        for kat in test_support::short_known_answers() {
            let message = kat.message.to_vec();
            for algorithm in Algorithm::ALL {
                assert_eq!(
                    to_hex(&engine_digest(&mut engine, algorithm, &message)),
                    kat.expected(algorithm.name()).unwrap(),
                    "{algorithm} {}",
                    kat.label
                );
            }
        }
        assert_eq!(engine.peripheral().overruns(), 0);
    }
}

mod random_inputs {
    use super::*;

    fn algorithm() -> impl Strategy<Value = Algorithm> {
        prop::sample::select(Algorithm::ALL.to_vec())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn software_matches_reference(
            algorithm in algorithm(),
            message in prop::collection::vec(any::<u8>(), 0..600),
        ) {
            let mut engine = SoftwareEngine::new();
            prop_assert_eq!(
                engine_digest(&mut engine, algorithm, &message),
                reference_digest(algorithm, &message)
            );
        }

        #[test]
        fn simulated_matches_reference(
            algorithm in algorithm(),
            message in prop::collection::vec(any::<u8>(), 0..600),
            latency in 0u32..8,
        ) {
            let mut engine = PeripheralEngine::new(SimulatedPeripheral::new().with_latency(latency));
            engine.bring_up().unwrap();
            prop_assert_eq!(
                engine_digest(&mut engine, algorithm, &message),
                reference_digest(algorithm, &message)
            );
        }
    }
}
