//! Win pool: the six-digit master set every generated lottery number is drawn from.
//!
//! A pool is built once per generation request: digits found in the caller's seed are
//! guaranteed a place, the remaining places are filled with random digits, and the result
//! is shuffled. Every draw (fill, shuffle, sampling, fallback) goes through a
//! `CryptoRng`; production callers pass `OsRng`.

use std::collections::BTreeSet;
use std::fmt;

use rand::seq::{index, SliceRandom};
use rand::{CryptoRng, Rng};

/// Number of unique digits held by every pool.
pub const POOL_SIZE: usize = 6;

// ────────────────────────────────────────────────────────────────────────────
// Field kinds
// ────────────────────────────────────────────────────────────────────────────

/// Output shape requested by a template slot, parsed from its `data_key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// All six digits joined with `-`, e.g. `8-5-1-2-9-0`.
    FullSet,
    /// Three distinct pool digits, e.g. `851`.
    ThreeDigit,
    /// Two distinct pool digits (upper line).
    TwoDigitTop,
    /// Two distinct pool digits (lower line), drawn independently of the upper line.
    TwoDigitBottom,
    /// One pool digit.
    SingleDigit,
    /// Any other key. Falls back to a zero-padded `00`–`99` value.
    Unrecognized(String),
}

impl FieldKind {
    /// Parses a slot `data_key`. Stored templates use the short keys; the descriptive
    /// names are accepted as aliases. Matching is exact: `" win"` is unrecognized.
    pub fn from_key(key: &str) -> Self {
        match key {
            "win" | "full_set" => FieldKind::FullSet,
            "digit_3" | "three_digit" => FieldKind::ThreeDigit,
            "digit_2_top" | "two_digit_a" => FieldKind::TwoDigitTop,
            "digit_2_bottom" | "two_digit_b" => FieldKind::TwoDigitBottom,
            "running" | "single_digit" => FieldKind::SingleDigit,
            other => FieldKind::Unrecognized(other.to_string()),
        }
    }
}

impl From<&str> for FieldKind {
    fn from(key: &str) -> Self {
        FieldKind::from_key(key)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// WinPool
// ────────────────────────────────────────────────────────────────────────────

/// Six unique decimal digits in a fixed, shuffled order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinPool {
    digits: Vec<char>,
}

impl WinPool {
    /// Builds a pool from an optional seed.
    ///
    /// Algorithm:
    /// 1. Collect the ASCII digits of `seed` in order, ignoring everything else and
    ///    duplicates, stopping once the pool is full (first six distinct digits win).
    /// 2. Fill with uniformly drawn digits until six distinct digits are held.
    /// 3. Shuffle so seed digits carry no positional bias.
    ///
    /// Never fails: empty, absent, non-numeric and overlong seeds are all valid.
    pub fn build<R>(seed: Option<&str>, rng: &mut R) -> Self
    where
        R: Rng + CryptoRng + ?Sized,
    {
        let mut pool: BTreeSet<char> = BTreeSet::new();

        for c in seed.unwrap_or_default().chars() {
            if pool.len() == POOL_SIZE {
                break;
            }
            if c.is_ascii_digit() {
                pool.insert(c);
            }
        }

        // Terminates: fewer than six held means at least four of ten digits are missing.
        while pool.len() < POOL_SIZE {
            pool.insert(random_digit(rng));
        }

        let mut digits: Vec<char> = pool.into_iter().collect();
        digits.shuffle(rng);
        WinPool { digits }
    }

    pub fn digits(&self) -> &[char] {
        &self.digits
    }

    /// Produces the string for one slot. Each call samples independently; nothing is cached.
    pub fn generate<R>(&self, kind: &FieldKind, rng: &mut R) -> String
    where
        R: Rng + CryptoRng + ?Sized,
    {
        match kind {
            FieldKind::FullSet => self.to_string(),
            FieldKind::ThreeDigit => self.sample(3, rng),
            FieldKind::TwoDigitTop | FieldKind::TwoDigitBottom => self.sample(2, rng),
            FieldKind::SingleDigit => self.sample(1, rng),
            FieldKind::Unrecognized(_) => format!("{:02}", rng.gen_range(0..100u8)),
        }
    }

    /// Draws `amount` distinct positions without replacement, concatenated in draw order.
    fn sample<R>(&self, amount: usize, rng: &mut R) -> String
    where
        R: Rng + CryptoRng + ?Sized,
    {
        index::sample(rng, self.digits.len(), amount)
            .iter()
            .map(|i| self.digits[i])
            .collect()
    }
}

impl fmt::Display for WinPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, digit) in self.digits.iter().enumerate() {
            if i > 0 {
                f.write_str("-")?;
            }
            write!(f, "{digit}")?;
        }
        Ok(())
    }
}

fn random_digit<R>(rng: &mut R) -> char
where
    R: Rng + CryptoRng + ?Sized,
{
    char::from(b'0' + rng.gen_range(0..10u8))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::{OsRng, StdRng};
    use rand::SeedableRng;
    use std::collections::HashSet;

    impl WinPool {
        fn contains(&self, digit: char) -> bool {
            self.digits.contains(&digit)
        }
    }

    fn assert_valid_pool(pool: &WinPool) {
        let digits = pool.digits();
        assert_eq!(digits.len(), POOL_SIZE, "pool {pool} must hold 6 digits");
        assert!(digits.iter().all(|c| c.is_ascii_digit()), "pool {pool} has a non-digit");
        let unique: HashSet<_> = digits.iter().collect();
        assert_eq!(unique.len(), POOL_SIZE, "pool {pool} has duplicates");
    }

    fn assert_distinct_pool_digits(pool: &WinPool, out: &str, len: usize) {
        assert_eq!(out.chars().count(), len, "unexpected length for {out}");
        assert!(out.chars().all(|c| pool.contains(c)), "{out} not drawn from {pool}");
        let unique: HashSet<_> = out.chars().collect();
        assert_eq!(unique.len(), len, "{out} reuses a pool position");
    }

    #[test]
    fn test_pool_invariants_hold_for_assorted_seeds() {
        let long = "9".repeat(10_000) + &"12345".repeat(1_000);
        let seeds = [
            None,
            Some(""),
            Some("85"),
            Some("abc"),
            Some("a1b2c3"),
            Some("1234567890"),
            Some("٣٤٥ 12"),
            Some(long.as_str()),
        ];
        for seed in seeds {
            for _ in 0..50 {
                assert_valid_pool(&WinPool::build(seed, &mut OsRng));
            }
        }
    }

    #[test]
    fn test_seed_digits_always_included() {
        for _ in 0..200 {
            let pool = WinPool::build(Some("85"), &mut OsRng);
            assert!(pool.contains('8') && pool.contains('5'), "pool {pool}");
        }
    }

    #[test]
    fn test_seed_digits_mixed_with_noise_included() {
        let pool = WinPool::build(Some("x-0-y-7-7-7"), &mut OsRng);
        assert!(pool.contains('0') && pool.contains('7'));
        assert_valid_pool(&pool);
    }

    #[test]
    fn test_overlong_seed_keeps_first_six_distinct_digits() {
        let mut rng = StdRng::seed_from_u64(7);
        let pool = WinPool::build(Some("1123456789"), &mut rng);
        let held: HashSet<char> = pool.digits().iter().copied().collect();
        let expected: HashSet<char> = "123456".chars().collect();
        assert_eq!(held, expected);
    }

    #[test]
    fn test_unicode_digits_are_ignored() {
        // Arabic-Indic digits are not ASCII digits and never enter the pool.
        let pool = WinPool::build(Some("٣٤٥"), &mut OsRng);
        assert_valid_pool(&pool);
    }

    #[test]
    fn test_pool_order_is_shuffled() {
        // With a seed of six digits the content is fixed; the order must still vary.
        let orders: HashSet<String> = (0..50)
            .map(|_| WinPool::build(Some("012345"), &mut OsRng).to_string())
            .collect();
        assert!(orders.len() > 1, "pool order never changed");
    }

    #[test]
    fn test_same_rng_seed_reproduces_pool() {
        let a = WinPool::build(Some("85"), &mut StdRng::seed_from_u64(42));
        let b = WinPool::build(Some("85"), &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_full_set_uses_pool_order_and_every_digit() {
        let pool = WinPool::build(Some("85"), &mut OsRng);
        let out = pool.generate(&FieldKind::FullSet, &mut OsRng);

        let parts: Vec<&str> = out.split('-').collect();
        assert_eq!(parts.len(), POOL_SIZE);
        assert!(parts.iter().all(|p| p.len() == 1));
        let rebuilt: Vec<char> = parts.iter().filter_map(|p| p.chars().next()).collect();
        assert_eq!(rebuilt, pool.digits());
        assert!(out.contains('8') && out.contains('5'));
    }

    #[test]
    fn test_sampling_without_replacement() {
        let mut rng = StdRng::seed_from_u64(99);
        let pool = WinPool::build(None, &mut rng);
        for _ in 0..500 {
            let three = pool.generate(&FieldKind::ThreeDigit, &mut rng);
            assert_distinct_pool_digits(&pool, &three, 3);
            let top = pool.generate(&FieldKind::TwoDigitTop, &mut rng);
            assert_distinct_pool_digits(&pool, &top, 2);
            let bottom = pool.generate(&FieldKind::TwoDigitBottom, &mut rng);
            assert_distinct_pool_digits(&pool, &bottom, 2);
        }
    }

    #[test]
    fn test_single_digit_is_pool_member() {
        let pool = WinPool::build(None, &mut OsRng);
        for _ in 0..200 {
            let out = pool.generate(&FieldKind::SingleDigit, &mut OsRng);
            assert_distinct_pool_digits(&pool, &out, 1);
        }
    }

    #[test]
    fn test_repeated_calls_are_independent() {
        let pool = WinPool::build(None, &mut OsRng);
        let draws: HashSet<String> = (0..100)
            .map(|_| pool.generate(&FieldKind::ThreeDigit, &mut OsRng))
            .collect();
        // 120 possible ordered triples; 100 draws landing on one value means caching.
        assert!(draws.len() > 1);
    }

    #[test]
    fn test_unrecognized_kind_is_two_digit_zero_padded() {
        let pool = WinPool::build(Some("85"), &mut OsRng);
        let kind = FieldKind::from_key("xyz");
        let mut seen_padded = false;
        for _ in 0..2_000 {
            let out = pool.generate(&kind, &mut OsRng);
            assert_eq!(out.len(), 2, "fallback {out} not two chars");
            let value: u8 = out.parse().expect("fallback must be numeric");
            assert!(value < 100);
            seen_padded |= out.starts_with('0');
        }
        assert!(seen_padded, "no value below 10 seen in 2000 draws");
    }

    #[test]
    fn test_field_kind_parsing() {
        assert_eq!(FieldKind::from_key("win"), FieldKind::FullSet);
        assert_eq!(FieldKind::from_key("full_set"), FieldKind::FullSet);
        assert_eq!(FieldKind::from_key("digit_3"), FieldKind::ThreeDigit);
        assert_eq!(FieldKind::from_key("digit_2_top"), FieldKind::TwoDigitTop);
        assert_eq!(FieldKind::from_key("two_digit_b"), FieldKind::TwoDigitBottom);
        assert_eq!(FieldKind::from_key("running"), FieldKind::SingleDigit);
        assert_eq!(
            FieldKind::from_key("lotto_date"),
            FieldKind::Unrecognized("lotto_date".to_string())
        );
        assert_eq!(FieldKind::from(""), FieldKind::Unrecognized(String::new()));
    }

    #[test]
    fn test_field_kind_keys_match_exactly() {
        for key in [" win", "win ", "WIN", "digit_3\n", "\trunning"] {
            assert_eq!(
                FieldKind::from_key(key),
                FieldKind::Unrecognized(key.to_string()),
                "{key:?} should not match a known kind"
            );
        }
    }
}
