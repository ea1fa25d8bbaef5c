//! Random string generation.

use rand::distributions::{Distribution, Uniform};
use rand::rngs::{OsRng, StdRng};
use rand::{CryptoRng, RngCore, SeedableRng};
use stackforge_types::{bug, Result, StackError};

/// Generate `length` characters drawn uniformly from `alphabet`.
///
/// The generator is seeded from the operating system's entropy source. If
/// that source is unavailable an entropy error is returned; there is no
/// fallback to a weaker generator.
pub fn generate_random_string(alphabet: &str, length: usize) -> Result<String> {
    generate_from_source(OsRng, alphabet, length)
}

/// Generate from an explicit cryptographically secure seed source.
///
/// `alphabet` must be non-empty ASCII.
pub fn generate_from_source<R>(source: R, alphabet: &str, length: usize) -> Result<String>
where
    R: RngCore + CryptoRng,
{
    if alphabet.is_empty() || !alphabet.is_ascii() {
        bug!("alphabet must be non-empty ASCII, got {:?}", alphabet);
    }

    let mut rng = StdRng::from_rng(source)
        .map_err(|e| StackError::Entropy(format!("Failed to seed secure generator: {}", e)))?;

    let symbols = alphabet.as_bytes();
    let index = Uniform::from(0..symbols.len());

    let mut buf = vec![0u8; length];
    for slot in buf.iter_mut() {
        *slot = symbols[index.sample(&mut rng)];
    }

    String::from_utf8(buf).map_err(|e| StackError::Bug(format!("non-ASCII output: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::Sequence;
    use proptest::prelude::*;
    use std::collections::{HashMap, HashSet};

    struct DeadSource;

    impl RngCore for DeadSource {
        fn next_u32(&mut self) -> u32 {
            unimplemented!("seeding only uses try_fill_bytes")
        }

        fn next_u64(&mut self) -> u64 {
            unimplemented!("seeding only uses try_fill_bytes")
        }

        fn fill_bytes(&mut self, _dest: &mut [u8]) {
            unimplemented!("seeding only uses try_fill_bytes")
        }

        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
            Err(rand::Error::new(std::io::Error::new(
                std::io::ErrorKind::Other,
                "entropy pool unavailable",
            )))
        }
    }

    impl CryptoRng for DeadSource {}

    proptest! {
        #[test]
        fn prop_length_and_membership(length in 1usize..=512, idx in 0usize..7) {
            let sequence = Sequence::ALL[idx];
            let value = generate_random_string(sequence.alphabet(), length).unwrap();

            prop_assert_eq!(value.chars().count(), length);
            prop_assert!(value.chars().all(|c| sequence.alphabet().contains(c)));
        }
    }

    #[test]
    fn test_digits_scenario() {
        let value = generate_random_string(Sequence::Digits.alphabet(), 8).unwrap();
        assert_eq!(value.len(), 8);
        assert!(value.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_hexdigits_scenario() {
        let value = generate_random_string(Sequence::HexDigits.alphabet(), 16).unwrap();
        assert_eq!(value.len(), 16);
        assert!(value.chars().all(|c| "0123456789ABCDEF".contains(c)));
    }

    #[test]
    fn test_zero_length() {
        assert_eq!(generate_random_string(Sequence::Letters.alphabet(), 0).unwrap(), "");
    }

    #[test]
    fn test_no_collisions() {
        let alphabet = Sequence::LettersDigits.alphabet();
        let values: HashSet<String> = (0..2000)
            .map(|_| generate_random_string(alphabet, 32).unwrap())
            .collect();
        assert_eq!(values.len(), 2000);
    }

    #[test]
    fn test_distribution_is_roughly_uniform() {
        let alphabet = Sequence::Digits.alphabet();
        let mut counts: HashMap<char, usize> = HashMap::new();
        for _ in 0..200 {
            for c in generate_random_string(alphabet, 500).unwrap().chars() {
                *counts.entry(c).or_default() += 1;
            }
        }

        // 100_000 draws over 10 symbols; expected 10_000 each, sigma ~95
        assert_eq!(counts.len(), 10);
        for (c, count) in counts {
            assert!((9_000..=11_000).contains(&count), "{} drawn {} times", c, count);
        }
    }

    #[test]
    fn test_entropy_failure_is_fatal() {
        let err = generate_from_source(DeadSource, Sequence::Digits.alphabet(), 8).unwrap_err();
        assert!(matches!(err, StackError::Entropy(_)));
    }

    #[test]
    fn test_empty_alphabet_is_a_bug() {
        let err = generate_random_string("", 8).unwrap_err();
        assert!(matches!(err, StackError::Bug(_)));
    }
}
