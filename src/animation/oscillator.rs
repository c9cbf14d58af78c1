//! Reflecting linear oscillator
//!
//! A scalar that moves by a fixed step each tick and reverses once it reaches
//! either bound. The bound test uses the position after the step, and the
//! reversal applies from the next tick on, so the value can overshoot a bound
//! by up to one step before heading back.

use serde::{Deserialize, Serialize};

/// Travel direction of an [`Oscillator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    /// Increasing position
    #[default]
    Up,
    /// Decreasing position
    Down,
}

impl Direction {
    /// `+1.0` for [`Direction::Up`], `-1.0` for [`Direction::Down`].
    #[must_use]
    pub const fn sign(self) -> f32 {
        match self {
            Self::Up => 1.0,
            Self::Down => -1.0,
        }
    }

    /// The opposite direction.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }
}

/// Position, direction, step and the closed interval it bounces in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Oscillator {
    pub position: f32,
    pub direction: Direction,
    pub step: f32,
    pub min: f32,
    pub max: f32,
}

impl Oscillator {
    /// Start at `position`, heading up.
    #[must_use]
    pub const fn new(position: f32, step: f32, min: f32, max: f32) -> Self {
        Self {
            position,
            direction: Direction::Up,
            step,
            min,
            max,
        }
    }

    /// Set the starting direction.
    #[must_use]
    pub const fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// The state one tick later.
    #[must_use]
    pub fn advanced(self) -> Self {
        let position = self.position + self.step * self.direction.sign();
        let direction = if position >= self.max || position <= self.min {
            self.direction.reversed()
        } else {
            self.direction
        };

        Self {
            position,
            direction,
            ..self
        }
    }

    /// Advance one tick in place and return the new position.
    pub fn advance(&mut self) -> f32 {
        *self = self.advanced();
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn bob() -> Oscillator {
        Oscillator::new(20.0, 0.01, 20.0, 22.0)
    }

    #[test]
    fn test_moves_by_one_step() {
        let next = bob().advanced();
        assert!((next.position - 20.01).abs() < EPSILON);
        assert_eq!(next.direction, Direction::Up);
    }

    #[test]
    fn test_overshoots_upper_bound_then_reverses() {
        let at_max = Oscillator::new(22.0, 0.01, 20.0, 22.0);
        let next = at_max.advanced();

        assert!((next.position - 22.01).abs() < EPSILON);
        assert_eq!(next.direction, Direction::Down);
    }

    #[test]
    fn test_lower_bound_is_inclusive() {
        let osc = Oscillator::new(20.5, 0.5, 20.0, 22.0).with_direction(Direction::Down);
        let next = osc.advanced();

        assert_eq!(next.position, 20.0);
        assert_eq!(next.direction, Direction::Up);
    }

    #[test]
    fn test_interior_keeps_direction() {
        let osc = Oscillator::new(21.0, 0.01, 20.0, 22.0).with_direction(Direction::Down);
        let next = osc.advanced();
        assert_eq!(next.direction, Direction::Down);
        assert!((next.position - 20.99).abs() < EPSILON);
    }

    #[test]
    fn test_restartable_from_any_state() {
        let mid = Oscillator::new(21.3, 0.01, 20.0, 22.0).with_direction(Direction::Down);
        let mut a = mid;
        let mut b = mid;
        for _ in 0..500 {
            a.advance();
            b = b.advanced();
        }
        assert_eq!(a, b);
    }

    #[test]
    fn test_bounded_overshoot_and_alternating_bounds() {
        let mut osc = bob();
        let mut flips = Vec::new();

        for _ in 0..10_000 {
            let before = osc.direction;
            let position = osc.advance();

            assert!(position >= osc.min - osc.step - EPSILON, "{position}");
            assert!(position <= osc.max + osc.step + EPSILON, "{position}");

            if osc.direction != before {
                assert_eq!(osc.direction, before.reversed());
                flips.push(position >= osc.max);
            }
        }

        assert!(flips.len() > 20);
        for pair in flips.windows(2) {
            assert_ne!(pair[0], pair[1], "bounds must alternate");
        }
        assert!(flips[0], "first reversal happens at the top");
    }

    #[test]
    fn test_direction_sign() {
        assert_eq!(Direction::Up.sign(), 1.0);
        assert_eq!(Direction::Down.sign(), -1.0);
        assert_eq!(Direction::Up.reversed(), Direction::Down);
    }
}
