use std::time::Instant;

use serde::{Deserialize, Serialize};

/// Upper bound on a measured frame delta, so a stall does not fling the
/// camera around on the next tick.
pub const MAX_DELTA: f32 = 0.1;

/// How frame deltas are produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Pacing {
    /// Wall-clock time since the previous tick.
    #[default]
    Measured,
    /// The same delta every tick, for headless runs and tests.
    Fixed { fixed_dt: f32 },
}

/// Produces the per-tick delta time.
#[derive(Debug, Clone)]
pub struct FrameClock {
    pacing: Pacing,
    last: Option<Instant>,
}

impl FrameClock {
    pub fn new(pacing: Pacing) -> Self {
        Self {
            pacing,
            last: None,
        }
    }

    pub fn fixed(dt: f32) -> Self {
        Self::new(Pacing::Fixed { fixed_dt: dt })
    }

    pub fn pacing(&self) -> Pacing {
        self.pacing
    }

    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    /// Delta for a tick happening at `now`. The first measured tick is 0.
    pub fn tick_at(&mut self, now: Instant) -> f32 {
        match self.pacing {
            Pacing::Fixed { fixed_dt } => fixed_dt,
            Pacing::Measured => {
                let dt = self
                    .last
                    .map(|last| now.saturating_duration_since(last).as_secs_f32())
                    .unwrap_or(0.0);
                self.last = Some(now);
                dt.min(MAX_DELTA)
            }
        }
    }
}
