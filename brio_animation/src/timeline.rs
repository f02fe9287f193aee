//! Float-time playback state: delay, duration, and transport controls.

use brio_structs::interp::clamp01;

/// Shortest duration a timeline will accept, in seconds. Guards the
/// progress division.
pub const MIN_DURATION: f64 = 0.01;

/// Playback state for one timed run: an optional delay, then `duration`
/// seconds of progress from 0 to 1.
///
/// The timeline only holds state; advancing it and firing events is the
/// animation script's job.
#[derive(Debug, Clone)]
pub struct Timeline {
    duration: f64,
    delay: f64,
    elapsed: f64,
    playing: bool,
    started: bool,
    /// Re-arm and play again after finishing.
    pub repeated: bool,
    /// Rewind to zero when the run finishes. On by default; clear it to
    /// leave `elapsed`/`progress` readable after the run.
    pub reset_on_finish: bool,
}

impl Timeline {
    pub fn new(duration: f64, delay: f64) -> Self {
        let mut timeline = Self {
            duration: MIN_DURATION,
            delay: 0.0,
            elapsed: 0.0,
            playing: false,
            started: false,
            repeated: false,
            reset_on_finish: true,
        };
        timeline.set_duration(duration);
        timeline.set_delay(delay);
        timeline
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Clamped to `MIN_DURATION` from below.
    pub fn set_duration(&mut self, duration: f64) {
        self.duration = duration.max(MIN_DURATION);
    }

    pub fn delay(&self) -> f64 {
        self.delay
    }

    /// Negative delays clamp to zero.
    pub fn set_delay(&mut self, delay: f64) {
        self.delay = delay.max(0.0);
    }

    /// Seconds accumulated while playing, including the delay phase.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Still inside the delay phase of a playing run.
    pub fn is_delaying(&self) -> bool {
        self.playing && self.elapsed < self.delay
    }

    /// The run has passed its delay at least once since the last reset.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Fraction of the post-delay run completed, clamped to `[0, 1]`.
    pub fn progress(&self) -> f64 {
        clamp01((self.elapsed - self.delay) / self.duration)
    }

    /// Whether the run has consumed its delay and full duration.
    pub fn is_finished(&self) -> bool {
        self.elapsed > self.delay + self.duration
    }

    /// Start or resume. Does not rewind; pair with `reset` to restart.
    pub fn play(&mut self) {
        self.playing = true;
    }

    /// Freeze in place, keeping accumulated time.
    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Rewind to zero and forget the started flag. Playback state is
    /// untouched, so a playing timeline restarts from its delay.
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.started = false;
    }

    /// Halt and rewind; the opposite of `play` after `reset`.
    pub fn stop(&mut self) {
        self.playing = false;
        self.reset();
    }

    /// Accumulate `dt` seconds; no-op while paused. Returns true when the
    /// tick crossed the delay boundary for the first time this run.
    pub(crate) fn advance(&mut self, dt: f64) -> bool {
        if !self.playing {
            return false;
        }
        self.elapsed += dt;
        if self.elapsed < self.delay || self.started {
            return false;
        }
        self.started = true;
        true
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new(1.0, 0.0)
    }
}
