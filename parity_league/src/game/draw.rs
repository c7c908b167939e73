//! Random draw sources.

use rand::Rng;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Supplies the drawn value for a match.
///
/// Implementations must return a value in the closed range `[1, max]`.
pub trait DrawSource: Send + Sync {
    fn draw(&self, max: u32) -> u32;
}

/// Production draw source backed by the thread-local CSPRNG.
///
/// `rand::rng()` is a ChaCha-based generator seeded from the operating
/// system, so prior outputs do not reveal future draws.
#[derive(Clone, Copy, Debug, Default)]
pub struct SecureDraw;

impl SecureDraw {
    pub fn new() -> Self {
        Self
    }
}

impl DrawSource for SecureDraw {
    fn draw(&self, max: u32) -> u32 {
        rand::rng().random_range(1..=max.max(1))
    }
}

/// Deterministic draw source that cycles through a fixed list of values.
///
/// Values outside `[1, max]` are clamped into range.
#[derive(Debug)]
pub struct SequenceDraw {
    values: Vec<u32>,
    next: AtomicUsize,
}

impl SequenceDraw {
    pub fn new(values: Vec<u32>) -> Self {
        Self {
            values,
            next: AtomicUsize::new(0),
        }
    }

    /// Always draws the same value.
    pub fn constant(value: u32) -> Self {
        Self::new(vec![value])
    }
}

impl DrawSource for SequenceDraw {
    fn draw(&self, max: u32) -> u32 {
        if self.values.is_empty() {
            return 1;
        }
        let idx = self.next.fetch_add(1, Ordering::Relaxed) % self.values.len();
        self.values[idx].clamp(1, max.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secure_draw_in_range() {
        let source = SecureDraw::new();
        for _ in 0..1000 {
            let value = source.draw(10);
            assert!((1..=10).contains(&value));
        }
    }

    #[test]
    fn test_secure_draw_covers_range() {
        let source = SecureDraw::new();
        let mut seen = [false; 10];
        for _ in 0..5000 {
            seen[(source.draw(10) - 1) as usize] = true;
        }
        assert!(seen.iter().all(|&s| s), "Every value should appear in 5000 draws");
    }

    #[test]
    fn test_secure_draw_degenerate_range() {
        assert_eq!(SecureDraw::new().draw(0), 1);
        assert_eq!(SecureDraw::new().draw(1), 1);
    }

    #[test]
    fn test_sequence_draw_cycles() {
        let source = SequenceDraw::new(vec![8, 3]);
        assert_eq!(source.draw(10), 8);
        assert_eq!(source.draw(10), 3);
        assert_eq!(source.draw(10), 8);
    }

    #[test]
    fn test_sequence_draw_clamps() {
        let source = SequenceDraw::new(vec![0, 42]);
        assert_eq!(source.draw(10), 1);
        assert_eq!(source.draw(10), 10);
    }

    #[test]
    fn test_sequence_draw_empty() {
        assert_eq!(SequenceDraw::new(vec![]).draw(10), 1);
    }
}
