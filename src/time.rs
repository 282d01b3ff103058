//! Frame timing.
//!
//! Tracks elapsed and delta time, counts frames and keeps a smoothed
//! frames-per-second value for the info dialog.
//!
//! # Example
//!
//! ```ignore
//! let mut time = Time::new();
//! // In the frame loop:
//! time.update();
//! log::debug!("{:.1} fps ({:.2} ms)", time.fps(), time.frame_ms());
//! ```

use std::time::{Duration, Instant};

/// Frame timing state.
#[derive(Debug)]
pub struct Time {
    start: Instant,
    last_frame: Instant,
    elapsed_secs: f32,
    delta_secs: f32,
    frame_count: u64,
    fps: f32,
    fps_frame_count: u64,
    fps_update_time: Instant,
    fps_update_interval: Duration,
    paused: bool,
    pause_elapsed: Duration,
}

impl Time {
    /// Create a new time tracker starting from now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_frame: now,
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
            paused: false,
            pause_elapsed: Duration::ZERO,
        }
    }

    /// Update timing values. Call once per frame.
    ///
    /// Returns `(elapsed_time, delta_time)` for convenience.
    pub fn update(&mut self) -> (f32, f32) {
        let now = Instant::now();

        if self.paused {
            self.delta_secs = 0.0;
            return (self.elapsed_secs, self.delta_secs);
        }

        self.delta_secs = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.elapsed_secs = (now.duration_since(self.start) - self.pause_elapsed).as_secs_f32();
        self.frame_count += 1;

        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        (self.elapsed_secs, self.delta_secs)
    }

    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Frames per second, refreshed every 500 ms.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Average frame time in milliseconds derived from [`fps`](Self::fps).
    pub fn frame_ms(&self) -> f32 {
        if self.fps > 0.0 {
            1000.0 / self.fps
        } else {
            0.0
        }
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// While paused, `delta()` returns 0 and `elapsed()` stops increasing.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        if self.paused {
            let now = Instant::now();
            self.pause_elapsed += now.duration_since(self.last_frame);
            self.last_frame = now;
            self.paused = false;
        }
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_time_new() {
        let time = Time::new();
        assert_eq!(time.frame(), 0);
        assert!(!time.is_paused());
        assert_eq!(time.frame_ms(), 0.0);
    }

    #[test]
    fn test_time_update() {
        let mut time = Time::new();
        thread::sleep(Duration::from_millis(10));
        let (elapsed, delta) = time.update();

        assert!(elapsed > 0.0);
        assert!(delta > 0.0);
        assert_eq!(time.frame(), 1);
    }

    #[test]
    fn test_time_pause() {
        let mut time = Time::new();
        time.update();

        time.pause();
        thread::sleep(Duration::from_millis(10));
        let (_, delta) = time.update();
        assert_eq!(delta, 0.0);
        assert_eq!(time.frame(), 1);

        time.resume();
        assert!(!time.is_paused());
    }

    #[test]
    fn test_fps_after_interval() {
        let mut time = Time::new();
        for _ in 0..3 {
            thread::sleep(Duration::from_millis(200));
            time.update();
        }
        assert!(time.fps() > 0.0);
        assert!(time.frame_ms() > 0.0);
    }
}
