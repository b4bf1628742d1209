/// Turns variable frame deltas into the simulation delta handed to the scene.
/// Single frames are clamped so a backgrounded tab does not jump the orbits.
#[derive(Debug, Clone)]
pub struct AnimationClock {
    /// Longest frame delta accepted (seconds).
    max_dt: f64,
    /// Simulation seconds per real second.
    speed: f64,
    paused: bool,
    /// Total simulation time handed out.
    elapsed: f64,
}

impl AnimationClock {
    /// Running clock at speed 1 that clamps single frames to `max_dt`.
    pub fn new(max_dt: f64) -> Self {
        Self {
            max_dt: max_dt.max(0.0),
            speed: 1.0,
            paused: false,
            elapsed: 0.0,
        }
    }

    /// Delta to feed `advance` for this frame. Zero while paused.
    /// Negative or non-finite inputs count as zero.
    pub fn tick(&mut self, frame_dt: f64) -> f64 {
        if self.paused || !frame_dt.is_finite() || frame_dt <= 0.0 {
            return 0.0;
        }
        let dt = frame_dt.min(self.max_dt) * self.speed;
        self.elapsed += dt;
        dt
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Time multiplier. Negative or non-finite values are ignored.
    pub fn set_speed(&mut self, speed: f64) {
        if speed.is_finite() && speed >= 0.0 {
            self.speed = speed;
        }
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Simulation seconds handed out since creation.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_normal_frames_through() {
        let mut clock = AnimationClock::new(0.1);
        assert!((clock.tick(1.0 / 60.0) - 1.0 / 60.0).abs() < 1e-12);
    }

    #[test]
    fn clamps_long_gaps() {
        let mut clock = AnimationClock::new(0.1);
        assert_eq!(clock.tick(5.0), 0.1);
    }

    #[test]
    fn paused_clock_yields_zero() {
        let mut clock = AnimationClock::new(0.1);
        clock.pause();
        assert_eq!(clock.tick(0.016), 0.0);
        clock.resume();
        assert!(clock.tick(0.016) > 0.0);
    }

    #[test]
    fn speed_scales_and_bad_input_is_ignored() {
        let mut clock = AnimationClock::new(0.1);
        clock.set_speed(2.0);
        clock.set_speed(-1.0);
        assert_eq!(clock.speed(), 2.0);
        assert!((clock.tick(0.05) - 0.1).abs() < 1e-12);
        assert_eq!(clock.tick(f64::NAN), 0.0);
        assert_eq!(clock.tick(-1.0), 0.0);
        assert!((clock.elapsed() - 0.1).abs() < 1e-12);
    }
}
