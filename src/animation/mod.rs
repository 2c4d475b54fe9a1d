//! Frame-paced zoom easing

/// Moves `n` toward `target` by at most `max_delta`, returning `target`
/// exactly once within range. Never overshoots, so repeated calls converge
/// in bounded time without oscillation.
pub fn move_towards(n: f64, target: f64, max_delta: f64) -> f64 {
    if (target - n).abs() <= max_delta {
        target
    } else {
        n + (target - n).signum() * max_delta
    }
}

/// Eases the effective zoom toward the desired zoom each frame tick with a
/// per-second rate cap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomAnimator {
    /// Easing rate in zoom levels per second
    pub speed: f64,
}

impl ZoomAnimator {
    pub fn new(speed: f64) -> Self {
        Self { speed }
    }

    /// Advances `actual_zoom` toward `desired_zoom` over a `dt`-second tick
    pub fn advance(&self, actual_zoom: f64, desired_zoom: f64, dt: f64) -> f64 {
        move_towards(actual_zoom, desired_zoom, self.speed * dt)
    }
}

impl Default for ZoomAnimator {
    fn default() -> Self {
        Self::new(crate::core::constants::DEFAULT_ZOOM_SPEED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_towards_never_overshoots() {
        assert_eq!(move_towards(0.0, 1.0, 0.25), 0.25);
        assert_eq!(move_towards(0.9, 1.0, 0.25), 1.0);
        assert_eq!(move_towards(2.0, 1.0, 0.25), 1.75);
        assert_eq!(move_towards(1.0, 1.0, 0.25), 1.0);
    }

    #[test]
    fn test_move_towards_converges_in_bounded_steps() {
        let target = -3.0;
        let max_delta = 0.4;
        let mut n = 0.0_f64;

        let expected_steps = ((target - n).abs() / max_delta).ceil() as usize;
        let mut steps = 0;
        while n != target {
            n = move_towards(n, target, max_delta);
            steps += 1;
            assert!(steps <= expected_steps, "did not converge in time");
        }
        assert_eq!(n, target);
    }

    #[test]
    fn test_animator_rate_cap() {
        let animator = ZoomAnimator::new(2.0);

        // Half a second at 2 levels/second moves one level
        assert_eq!(animator.advance(0.0, -5.0, 0.5), -1.0);
        // A long tick lands exactly on the target
        assert_eq!(animator.advance(0.0, -1.0, 10.0), -1.0);
    }
}
