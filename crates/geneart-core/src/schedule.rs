//! Frame pacing and the start/stop state machine of the animation loop.
//!
//! The host drives the loop with a per-frame callback. [`FrameClock`] decides
//! whether a callback actually ticks, and [`AnimationLoop`] hands every
//! started loop a generation number so a callback left over from a cancelled
//! loop can tell that it must stop rescheduling itself.

/// Throttles ticks to at most one per `interval_ms`.
#[derive(Clone, Debug)]
pub struct FrameClock {
    pub interval_ms: f64,
    last_tick_ms: Option<f64>,
}

impl FrameClock {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            last_tick_ms: None,
        }
    }

    /// True (and records `now_ms`) when at least `interval_ms` has passed
    /// since the last accepted tick. The first call always ticks.
    pub fn should_tick(&mut self, now_ms: f64) -> bool {
        if let Some(last) = self.last_tick_ms {
            if now_ms - last < self.interval_ms {
                return false;
            }
        }
        self.last_tick_ms = Some(now_ms);
        true
    }

    pub fn reset(&mut self) {
        self.last_tick_ms = None;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running { generation: u64 },
    Cancelled { generation: u64 },
}

#[derive(Debug)]
pub struct AnimationLoop {
    state: LoopState,
    next_generation: u64,
}

impl Default for AnimationLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationLoop {
    pub fn new() -> Self {
        Self {
            state: LoopState::Idle,
            next_generation: 1,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Cancel whatever is running, then start a fresh generation.
    pub fn start(&mut self) -> u64 {
        self.cancel();
        let generation = self.next_generation;
        self.next_generation += 1;
        self.state = LoopState::Running { generation };
        log::debug!("animation loop generation {} started", generation);
        generation
    }

    /// Stop the running generation, if any. Returns the cancelled generation.
    pub fn cancel(&mut self) -> Option<u64> {
        match self.state {
            LoopState::Running { generation } => {
                self.state = LoopState::Cancelled { generation };
                log::debug!("animation loop generation {} cancelled", generation);
                Some(generation)
            }
            _ => None,
        }
    }

    /// Whether a callback belonging to `generation` may keep running.
    pub fn is_current(&self, generation: u64) -> bool {
        self.state == LoopState::Running { generation }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, LoopState::Running { .. })
    }
}
