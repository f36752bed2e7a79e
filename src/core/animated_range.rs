use std::time::Duration;

use crate::core::range::IntRange;

/// Integer range that eases toward a target over a fixed duration.
///
/// Time is supplied by the caller as a monotonic offset, so `update` is a
/// pure function of its inputs and the stored transition.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimatedRange {
    duration: Duration,
    current: Option<IntRange>,
    transition: Option<Transition>,
    animating: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Transition {
    start: IntRange,
    end: IntRange,
    started_at: Duration,
}

impl AnimatedRange {
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            current: None,
            transition: None,
            animating: false,
        }
    }

    #[must_use]
    pub fn current(&self) -> Option<IntRange> {
        self.current
    }

    #[must_use]
    pub fn animating(&self) -> bool {
        self.animating
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Forgets the current value so the next update snaps.
    pub fn reset(&mut self) {
        self.current = None;
        self.transition = None;
        self.animating = false;
    }

    /// Advances toward `target` and returns the range to draw at `now`.
    pub fn update(&mut self, target: IntRange, now: Duration) -> (IntRange, bool) {
        self.animating = false;
        let current = match self.current {
            Some(current) if current != target => current,
            _ => return self.snap(target),
        };

        let transition = match self.transition {
            Some(transition) if transition.end == target => transition,
            _ => {
                let restarted = Transition {
                    start: current,
                    end: target,
                    started_at: now,
                };
                self.transition = Some(restarted);
                restarted
            }
        };

        let elapsed = now.saturating_sub(transition.started_at);
        let progress = if self.duration.is_zero() {
            1.0
        } else {
            elapsed.as_secs_f64() / self.duration.as_secs_f64()
        };
        if progress >= 1.0 {
            return self.snap(target);
        }

        let interpolated = IntRange::new(
            interpolate(transition.start.low, target.low, progress),
            interpolate(transition.start.high, target.high, progress),
        );
        self.current = Some(interpolated);
        self.animating = true;
        (interpolated, true)
    }

    fn snap(&mut self, target: IntRange) -> (IntRange, bool) {
        self.current = Some(target);
        self.transition = None;
        (target, false)
    }
}

fn interpolate(from: i64, to: i64, progress: f64) -> i64 {
    let delta = (to as f64 - from as f64) * progress;
    from.saturating_add(delta as i64)
}
