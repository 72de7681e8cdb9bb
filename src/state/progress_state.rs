//! Progress gauge animation state

use std::time::{Duration, Instant};

/// Eases the progress gauge from one percentage to the next
#[derive(Debug, Clone)]
pub struct ProgressAnimation {
    /// When the current transition started
    pub start_time: Instant,
    from: f64,
    to: f64,
}

impl ProgressAnimation {
    /// Duration of one transition
    const ANIMATION_DURATION: Duration = Duration::from_millis(400);

    pub fn new(percent: f64) -> Self {
        Self {
            start_time: Instant::now(),
            from: percent,
            to: percent,
        }
    }

    /// Start moving towards `percent` from wherever the gauge is now
    pub fn retarget(&mut self, percent: f64) {
        if (percent - self.to).abs() < f64::EPSILON {
            return;
        }
        self.from = self.value();
        self.to = percent;
        self.start_time = Instant::now();
    }

    /// Current gauge value in percent
    pub fn value(&self) -> f64 {
        self.value_at(self.start_time.elapsed())
    }

    fn value_at(&self, elapsed: Duration) -> f64 {
        if elapsed >= Self::ANIMATION_DURATION {
            return self.to;
        }
        let progress = elapsed.as_secs_f32() / Self::ANIMATION_DURATION.as_secs_f32();
        // Cubic ease-out: fast start, gentle landing
        let eased = simple_easing::cubic_out(progress) as f64;
        self.from + (self.to - self.from) * eased
    }

    pub fn is_complete(&self) -> bool {
        self.start_time.elapsed() >= Self::ANIMATION_DURATION
    }

    #[allow(dead_code)]
    pub fn target(&self) -> f64 {
        self.to
    }
}
