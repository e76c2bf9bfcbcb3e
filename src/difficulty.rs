use rand::Rng;

/// Score needed to reach each level, ascending. Level n starts at `LEVEL_THRESHOLDS[n - 1]`.
pub const LEVEL_THRESHOLDS: [u32; 6] = [0, 5, 15, 30, 50, 75];

/// Active-duration range used before the curve speeds things up (milliseconds)
pub const BASE_ACTIVE_MIN_MS: u64 = 600;
pub const BASE_ACTIVE_MAX_MS: u64 = 1200;

const TOKEN_GLYPHS: [&str; 8] = ["😡", "😂", "🙄", "😅", "🤪", "😤", "🥴", "😎"];
const TOKEN_FACES: [&str; 8] = [">:(", ":D", "-_-", "^^;", "%P", ">:O", "@_@", "B)"];

/// Number of distinct display tokens a mole can wear
pub const TOKEN_POOL_SIZE: usize = TOKEN_GLYPHS.len();

/// Cosmetic face shown while a cell is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token(u8);

impl Token {
    /// Returns `None` for ids outside the pool
    pub fn new(id: u8) -> Option<Self> {
        ((id as usize) < TOKEN_POOL_SIZE).then_some(Self(id))
    }

    pub fn id(self) -> u8 {
        self.0
    }

    pub fn glyph(self) -> &'static str {
        TOKEN_GLYPHS[self.0 as usize]
    }

    /// Plain ASCII face for terminals that can't draw emoji
    pub fn ascii(self) -> &'static str {
        TOKEN_FACES[self.0 as usize]
    }
}

pub fn level_for(score: u32) -> u32 {
    let reached = LEVEL_THRESHOLDS
        .iter()
        .rposition(|&threshold| score >= threshold)
        .unwrap_or(0);
    reached as u32 + 1
}

pub fn max_active_for_level(level: u32) -> usize {
    match level {
        l if l >= 5 => 3,
        l if l >= 3 => 2,
        _ => 1,
    }
}

/// Inclusive `(min, max)` in milliseconds a freshly spawned mole stays up
pub fn active_duration_range_for_level(level: u32) -> (u64, u64) {
    match level {
        l if l >= 5 => (300, 600),
        l if l >= 4 => (400, 800),
        l if l >= 3 => (500, 900),
        l if l >= 2 => (500, 1000),
        _ => (BASE_ACTIVE_MIN_MS, BASE_ACTIVE_MAX_MS),
    }
}

pub fn random_token<R: Rng + ?Sized>(rng: &mut R) -> Token {
    Token(rng.gen_range(0..TOKEN_POOL_SIZE) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::HashSet;

    #[test]
    fn test_level_for_thresholds() {
        assert_eq!(level_for(0), 1);
        assert_eq!(level_for(4), 1);
        assert_eq!(level_for(5), 2);
        assert_eq!(level_for(10), 2);
        assert_eq!(level_for(15), 3);
        assert_eq!(level_for(30), 4);
        assert_eq!(level_for(50), 5);
        assert_eq!(level_for(75), 6);
        assert_eq!(level_for(100), 6);
        assert_eq!(level_for(u32::MAX), 6);
    }

    #[test]
    fn test_max_active_for_level() {
        let expected = [(1, 1), (2, 1), (3, 2), (4, 2), (5, 3), (6, 3)];
        for (level, max) in expected {
            assert_eq!(max_active_for_level(level), max, "level {}", level);
        }
    }

    #[test]
    fn test_active_duration_range_for_level() {
        assert_eq!(active_duration_range_for_level(1), (600, 1200));
        assert_eq!(active_duration_range_for_level(2), (500, 1000));
        assert_eq!(active_duration_range_for_level(3), (500, 900));
        assert_eq!(active_duration_range_for_level(4), (400, 800));
        assert_eq!(active_duration_range_for_level(5), (300, 600));
        assert_eq!(active_duration_range_for_level(6), (300, 600));
    }

    #[test]
    fn test_base_range_matches_level_one() {
        assert_eq!(
            active_duration_range_for_level(1),
            (BASE_ACTIVE_MIN_MS, BASE_ACTIVE_MAX_MS)
        );
    }

    #[test]
    fn test_token_new_rejects_out_of_pool() {
        assert!(Token::new(0).is_some());
        assert!(Token::new(7).is_some());
        assert!(Token::new(8).is_none());
    }

    #[test]
    fn test_random_token_covers_pool() {
        let mut rng = StdRng::seed_from_u64(7);
        let seen: HashSet<u8> = (0..500).map(|_| random_token(&mut rng).id()).collect();
        assert_eq!(seen.len(), TOKEN_POOL_SIZE);
    }

    #[test]
    fn test_token_glyphs_are_distinct() {
        let glyphs: HashSet<&str> = (0..TOKEN_POOL_SIZE as u8)
            .filter_map(Token::new)
            .map(Token::glyph)
            .collect();
        assert_eq!(glyphs.len(), TOKEN_POOL_SIZE);
        assert!((0..TOKEN_POOL_SIZE as u8)
            .filter_map(Token::new)
            .all(|t| t.ascii().is_ascii()));
    }

    proptest! {
        #[test]
        fn level_is_monotonic(a in 0u32..10_000, b in 0u32..10_000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(level_for(lo) <= level_for(hi));
        }

        #[test]
        fn curves_follow_level(level in 1u32..20) {
            prop_assert!(max_active_for_level(level) <= max_active_for_level(level + 1));
            let (min, max) = active_duration_range_for_level(level);
            let (next_min, next_max) = active_duration_range_for_level(level + 1);
            prop_assert!(min <= max);
            prop_assert!(next_min <= min && next_max <= max);
        }
    }
}
