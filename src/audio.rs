use std::time::Duration;

/// Shortest stretch a tick is allowed to play before the next one cuts in.
pub const MIN_TICK_SPACING: Duration = Duration::from_micros(33_333);

/// A sound that has been started.
pub trait Playback {
    fn is_playing(&self) -> bool;
    fn position(&self) -> Duration;
}

/// Keeps fast spins from stacking tick sounds on top of each other: a new tick
/// only plays once the last one stopped or has run for [`MIN_TICK_SPACING`].
#[derive(Debug)]
pub struct TickGate<P> {
    last: Option<P>,
}

impl<P> Default for TickGate<P> {
    fn default() -> Self {
        Self { last: None }
    }
}

impl<P: Playback> TickGate<P> {
    pub fn ready(&self) -> bool {
        self.last
            .as_ref()
            .is_none_or(|p| !p.is_playing() || p.position() >= MIN_TICK_SPACING)
    }

    /// Plays through `start` when the gate is open. Returns whether it fired.
    pub fn fire(&mut self, start: impl FnOnce() -> Option<P>) -> bool {
        if !self.ready() {
            return false;
        }
        match start() {
            Some(playback) => {
                self.last = Some(playback);
                true
            }
            None => false,
        }
    }
}
