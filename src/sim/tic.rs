use std::time::{Duration, Instant};

pub const SIM_FPS: u32 = 35;
pub const DT: f32 = 1.0 / SIM_FPS as f32;
const TIC: Duration = Duration::from_micros(1_000_000 / SIM_FPS as u64);

/// Fixed-rate clock for the simulation phase.
///
/// All tics due since the last call run *before* the caller renders, so a
/// frame always sees a completed step.
pub struct TicRunner {
    last: Instant,
    max_catch_up: u32,
}

impl Default for TicRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl TicRunner {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
            max_catch_up: SIM_FPS,
        }
    }

    /// Run `tick` once per elapsed tic, at most one second's worth; returns
    /// how many ran.
    pub fn pump<F: FnMut()>(&mut self, mut tick: F) -> u32 {
        let mut ran = 0;
        while self.last.elapsed() >= TIC {
            if ran == self.max_catch_up {
                // drop the backlog instead of spiralling
                self.last = Instant::now();
                break;
            }
            tick();
            self.last += TIC;
            ran += 1;
        }
        ran
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catch_up_is_bounded() {
        let mut t = TicRunner::new();
        t.last -= Duration::from_secs(2);
        let mut n = 0;
        assert_eq!(t.pump(|| n += 1), SIM_FPS);
        assert_eq!(n, SIM_FPS);
        assert_eq!(t.pump(|| n += 1), 0);
    }
}
