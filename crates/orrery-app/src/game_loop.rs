//! Fixed-timestep loop.
//!
//! Simulation steps run at a fixed 60 Hz out of an accumulator fed by
//! wall-clock frame time; rendering happens once per frame with the leftover
//! fraction of a step as interpolation alpha.

use std::time::Instant;

use tracing::warn;

/// Simulation step: 60 Hz.
pub const FIXED_DT: f64 = 1.0 / 60.0;

/// Longest frame fed into the accumulator. Slower frames slow the simulation
/// down instead of queueing a burst of catch-up steps.
pub const MAX_FRAME_TIME: f64 = 0.25;

pub struct GameLoop {
    previous_time: Instant,
    accumulator: f64,
    sim_time: f64,
    frame_count: u64,
    update_count: u64,
}

impl GameLoop {
    pub fn new() -> Self {
        Self {
            previous_time: Instant::now(),
            accumulator: 0.0,
            sim_time: 0.0,
            frame_count: 0,
            update_count: 0,
        }
    }

    /// Measure the time since the previous call and run one frame.
    ///
    /// `update(dt, sim_time)` runs zero or more times; `render(alpha)` runs
    /// exactly once.
    pub fn tick(&mut self, update: impl FnMut(f64, f64), render: impl FnMut(f64)) {
        let now = Instant::now();
        let frame_time = now.duration_since(self.previous_time).as_secs_f64();
        self.previous_time = now;
        self.advance(frame_time, update, render);
    }

    /// Run one frame with an explicit frame duration in seconds.
    pub fn advance(
        &mut self,
        frame_time: f64,
        mut update: impl FnMut(f64, f64),
        mut render: impl FnMut(f64),
    ) {
        let frame_time = if frame_time > MAX_FRAME_TIME {
            warn!(
                "Frame took {:.1}ms, clamping to {:.1}ms",
                frame_time * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
            MAX_FRAME_TIME
        } else {
            frame_time.max(0.0)
        };

        self.accumulator += frame_time;
        while self.accumulator >= FIXED_DT {
            update(FIXED_DT, self.sim_time);
            self.sim_time += FIXED_DT;
            self.accumulator -= FIXED_DT;
            self.update_count += 1;
        }

        render(self.alpha());
        self.frame_count += 1;
    }

    /// Fraction of a step waiting in the accumulator, in `[0, 1)`.
    pub fn alpha(&self) -> f64 {
        self.accumulator / FIXED_DT
    }

    /// Simulation time interpolated by `alpha` towards the next step.
    pub fn interpolated_time(&self) -> f64 {
        self.sim_time + self.accumulator
    }

    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn update_count(&self) -> u64 {
        self.update_count
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_step_runs_one_update() {
        let mut game_loop = GameLoop::new();
        let mut updates = 0;
        game_loop.advance(FIXED_DT, |_, _| updates += 1, |_| {});
        assert_eq!(updates, 1);
        assert_eq!(game_loop.update_count(), 1);
        assert_eq!(game_loop.frame_count(), 1);
    }

    #[test]
    fn test_short_frames_accumulate() {
        let mut game_loop = GameLoop::new();
        let mut updates = 0;
        for _ in 0..3 {
            game_loop.advance(FIXED_DT * 0.4, |_, _| updates += 1, |_| {});
        }
        assert_eq!(updates, 1);
        assert_eq!(game_loop.frame_count(), 3);
    }

    #[test]
    fn test_long_frame_is_clamped() {
        let mut game_loop = GameLoop::new();
        let mut updates = 0;
        game_loop.advance(2.0, |_, _| updates += 1, |_| {});
        // 0.25 s at 60 Hz, give or take accumulator rounding.
        assert!((14..=15).contains(&updates));
        assert!(game_loop.sim_time() <= MAX_FRAME_TIME + 1e-9);
    }

    #[test]
    fn test_alpha_in_unit_range() {
        let mut game_loop = GameLoop::new();
        let mut seen = Vec::new();
        for frame in [0.005, 0.013, 0.021, 0.0, 0.1] {
            game_loop.advance(frame, |_, _| {}, |alpha| seen.push(alpha));
        }
        assert_eq!(seen.len(), 5);
        assert!(seen.iter().all(|a| (0.0..1.0).contains(a)));
    }

    #[test]
    fn test_update_sees_increasing_sim_time() {
        let mut game_loop = GameLoop::new();
        let mut times = Vec::new();
        game_loop.advance(FIXED_DT * 3.5, |dt, t| times.push((dt, t)), |_| {});
        assert_eq!(times.len(), 3);
        for (i, (dt, t)) in times.iter().enumerate() {
            assert_eq!(*dt, FIXED_DT);
            assert!((t - i as f64 * FIXED_DT).abs() < 1e-12);
        }
    }

    #[test]
    fn test_interpolated_time_tracks_wall_time() {
        let mut game_loop = GameLoop::new();
        game_loop.advance(0.05, |_, _| {}, |_| {});
        game_loop.advance(0.07, |_, _| {}, |_| {});
        assert!((game_loop.interpolated_time() - 0.12).abs() < 1e-9);
        assert!(game_loop.sim_time() <= game_loop.interpolated_time());
    }

    #[test]
    fn test_negative_frame_time_is_ignored() {
        let mut game_loop = GameLoop::new();
        game_loop.advance(-1.0, |_, _| panic!("no update expected"), |_| {});
        assert_eq!(game_loop.alpha(), 0.0);
    }
}
