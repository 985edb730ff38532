//! Monotonic elapsed-time source for the animation.

use instant::Instant;

/// Started once at startup, read every frame, never reset or paused.
#[derive(Clone, Copy, Debug)]
pub struct Clock {
    started: Instant,
}

impl Clock {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Seconds since the clock was started.
    pub fn elapsed_secs(&self) -> f32 {
        self.started.elapsed().as_secs_f32()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_never_decreases() {
        let clock = Clock::start();
        let first = clock.elapsed_secs();
        let second = clock.elapsed_secs();
        assert!(first >= 0.0);
        assert!(second >= first);
    }
}
