use std::time::{Duration, Instant};

/// Frame timing for the render loop: delta, elapsed time and a rolling FPS
#[derive(Debug)]
pub struct FrameClock {
    last_tick: Instant,
    elapsed: f32,
    window: Duration,
    window_frames: u32,
    window_time: f32,
    fps: f32,
}

impl FrameClock {
    /// Clock that recomputes FPS once per `window`
    pub fn new(window: Duration) -> Self {
        Self {
            last_tick: Instant::now(),
            elapsed: 0.0,
            window,
            window_frames: 0,
            window_time: 0.0,
            fps: 0.0,
        }
    }

    /// Advance one frame, returning seconds since the previous tick
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let delta = now.duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;
        self.advance(delta);
        delta
    }

    fn advance(&mut self, delta: f32) {
        self.elapsed += delta;
        self.window_frames += 1;
        self.window_time += delta;

        if self.window_time >= self.window.as_secs_f32() {
            self.fps = self.window_frames as f32 / self.window_time;
            log::debug!("{:.1} fps", self.fps);
            self.window_frames = 0;
            self.window_time = 0.0;
        }
    }

    /// Seconds accumulated over all ticks
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Frames per second over the last completed window, 0 before the first
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Restart timing from now without touching elapsed time
    pub fn reset(&mut self) {
        self.last_tick = Instant::now();
        self.window_frames = 0;
        self.window_time = 0.0;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}
