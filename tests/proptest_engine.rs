use libctph::{
    FuzzyHash, MIN_BLOCK_SIZE, RollingChecksum, Signature, State, StepOutcome, compare, hash,
    hash_reader, initial_block_size, max_attempts,
};
use proptest::prelude::*;
use std::io::Cursor;

proptest! {
    #[test]
    fn test_hash_deterministic(data in prop::collection::vec(any::<u8>(), 1..4000)) {
        let first = hash(&data).unwrap();
        let second = hash(&data).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_hash_reader_matches_hash(data in prop::collection::vec(any::<u8>(), 1..4000)) {
        prop_assert_eq!(hash_reader(Cursor::new(&data)).unwrap(), hash(&data).unwrap());
    }

    #[test]
    fn test_block_size_form(len in 1u64..u64::MAX) {
        let block_size = initial_block_size(len);
        prop_assert_eq!(block_size % MIN_BLOCK_SIZE, 0);
        prop_assert!((block_size / MIN_BLOCK_SIZE).is_power_of_two());
        prop_assert!(block_size.saturating_mul(64) >= len);
        if block_size > MIN_BLOCK_SIZE {
            prop_assert!((block_size / 2).saturating_mul(64) < len);
        }
    }

    #[test]
    fn test_attempts_bounded(data in prop::collection::vec(any::<u8>(), 1..6000)) {
        let mut engine = FuzzyHash::new(data.len() as u64).unwrap();
        let initial = engine.block_size();
        let mut passes = 0;

        while engine.needs_retry() {
            passes += 1;
            prop_assert!(passes <= max_attempts(data.len() as u64));
            let block_size = engine.block_size();
            for &byte in &data {
                engine.step(byte);
            }
            prop_assert!(engine.block_size() <= block_size);
        }

        prop_assert_eq!(engine.state(), State::Finalized);
        prop_assert_eq!(engine.attempt(), passes);
        prop_assert!(engine.block_size() >= MIN_BLOCK_SIZE);
        prop_assert!(engine.block_size() <= initial);
    }

    #[test]
    fn test_finalized_signature_is_well_formed(data in prop::collection::vec(any::<u8>(), 1..4000)) {
        let signature = hash(&data).unwrap();
        prop_assert!(!signature.first_half().is_empty());
        prop_assert!(!signature.second_half().is_empty());
        prop_assert!(
            signature.first_half().len() >= 32 || signature.block_size() == Some(MIN_BLOCK_SIZE)
        );

        let text = signature.to_string();
        let parsed: Signature = text.parse().unwrap();
        prop_assert_eq!(&parsed, &signature);
        prop_assert_eq!(compare(&text, &text).unwrap(), 0);
    }

    #[test]
    fn test_position_never_exceeds_declared_len(data in prop::collection::vec(any::<u8>(), 1..2000)) {
        let mut engine = FuzzyHash::new(data.len() as u64).unwrap();
        while engine.needs_retry() {
            for &byte in &data {
                let outcome = engine.step(byte);
                prop_assert!(engine.position() <= engine.declared_len());
                if outcome == StepOutcome::Retry {
                    prop_assert_eq!(engine.position(), 0);
                }
            }
        }
    }

    #[test]
    fn test_compare_symmetric(
        a in prop::collection::vec(any::<u8>(), 200..400),
        b in prop::collection::vec(any::<u8>(), 200..400)
    ) {
        let a = hash(&a).unwrap();
        let b = hash(&b).unwrap();
        prop_assume!(a.block_size() == b.block_size());
        prop_assert_eq!(a.distance(&b).unwrap(), b.distance(&a).unwrap());
    }

    #[test]
    fn test_rolling_depends_on_window_only(
        prefix_a in prop::collection::vec(any::<u8>(), 0..64),
        prefix_b in prop::collection::vec(any::<u8>(), 0..64),
        tail in prop::collection::vec(any::<u8>(), 7..32)
    ) {
        let mut a = RollingChecksum::new();
        let mut b = RollingChecksum::new();
        a.update(&prefix_a);
        b.update(&prefix_b);
        prop_assert_eq!(a.update(&tail), b.update(&tail));
    }
}
