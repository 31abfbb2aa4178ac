//! Screen rotation state machine.
//!
//! The scheduler never touches a clock. The shell feeds it data snapshots and
//! timer [`Signal`]s and carries out the [`Command`]s it returns. Stale timers
//! are harmless: each signal is checked against the current phase and
//! dropped if it no longer applies.

use std::time::Duration;

use tracing::{debug, info};

use crate::filter::ActiveSet;
use crate::model::ScreenKey;

/// Screen choreography and dwell timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// Dwell time for every screen without a marquee.
    pub dwell: Duration,
    /// Exit animation of the outgoing screen.
    pub exit: Duration,
    /// Entrance animation of the incoming screen.
    pub entrance: Duration,
    /// How much of the entrance runs before the exit has finished.
    pub entrance_overlap: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            dwell: Duration::from_secs(10),
            exit: Duration::from_millis(500),
            entrance: Duration::from_millis(800),
            entrance_overlap: Duration::from_millis(200),
        }
    }
}

impl Timings {
    /// Offset of the entrance start from the exit start.
    pub fn entrance_delay(&self) -> Duration {
        self.exit.saturating_sub(self.entrance_overlap)
    }

    /// Time from exit start until both animations have finished.
    pub fn transition(&self) -> Duration {
        self.exit.max(self.entrance_delay() + self.entrance)
    }
}

/// What the wall is doing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No data has ever been loaded.
    Idle,
    /// `ScreenKey` is fully visible and dwelling.
    Showing(ScreenKey),
    /// Exit and entrance animations are running.
    Transitioning {
        /// Outgoing screen.
        from: ScreenKey,
        /// Incoming screen.
        to: ScreenKey,
    },
}

/// Timer events the shell reports back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// The shown screen has been up for its dwell time.
    DwellElapsed,
    /// Both transition animations have ended.
    TransitionFinished,
}

/// Side effects the shell must carry out, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Hide every screen but `screen` and show it at full visibility, no
    /// animation.
    Reveal {
        /// Screen to show.
        screen: ScreenKey,
    },
    /// Animate `from` out and `to` in.
    Transition {
        /// Outgoing screen.
        from: ScreenKey,
        /// Incoming screen.
        to: ScreenKey,
        /// Animation lengths to use.
        timings: Timings,
    },
    /// Deliver `signal` after `after`.
    Schedule {
        /// Delay from now.
        after: Duration,
        /// Signal to deliver.
        signal: Signal,
    },
    /// Start a background fetch.
    Refresh,
}

/// Derived from a freshly fetched dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Screens eligible for rotation.
    pub active: ActiveSet,
    /// Loop length of the notices marquee, if the notices overflow.
    pub marquee: Option<Duration>,
}

/// Rotation state. Only [`RotationScheduler`] mutates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationState {
    /// Latest active set.
    pub active: ActiveSet,
    /// Position of the shown or incoming screen in `active`; may be stale
    /// after the set shrinks.
    pub current_index: usize,
    /// Latest marquee loop length.
    pub marquee: Option<Duration>,
    /// Current phase.
    pub phase: Phase,
}

impl Default for RotationState {
    fn default() -> Self {
        Self {
            active: ActiveSet::fallback(),
            current_index: 0,
            marquee: None,
            phase: Phase::Idle,
        }
    }
}

/// Decides which screen is shown and for how long.
#[derive(Debug, Clone, Default)]
pub struct RotationScheduler {
    state: RotationState,
    timings: Timings,
}

impl RotationScheduler {
    /// Idle scheduler; nothing shows until the first [`apply`](Self::apply).
    pub fn new(timings: Timings) -> Self {
        Self {
            state: RotationState::default(),
            timings,
        }
    }

    /// Read-only view of the rotation state.
    pub fn state(&self) -> &RotationState {
        &self.state
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    /// True until the first snapshot arrives.
    pub fn is_idle(&self) -> bool {
        self.state.phase == Phase::Idle
    }

    /// Configured choreography.
    pub fn timings(&self) -> &Timings {
        &self.timings
    }

    /// Dwell time for `screen` given the latest marquee measurement.
    pub fn dwell_for(&self, screen: ScreenKey) -> Duration {
        match (screen, self.state.marquee) {
            (ScreenKey::Notices, Some(marquee)) => marquee,
            _ => self.timings.dwell,
        }
    }

    /// Installs a new snapshot.
    ///
    /// The first snapshot reveals the first active screen and starts the
    /// cycle. Later snapshots only change what future decisions see: the
    /// phase, the index and any running animation are left alone.
    pub fn apply(&mut self, snapshot: Snapshot) -> Vec<Command> {
        self.state.active = snapshot.active;
        self.state.marquee = snapshot.marquee;

        if self.state.phase != Phase::Idle {
            debug!(
                active = ?self.state.active.as_slice(),
                marquee_ms = ?self.state.marquee.map(|d| d.as_millis()),
                "snapshot applied"
            );
            return vec![];
        }

        let first = self.state.active.first();
        self.state.current_index = 0;
        self.state.phase = Phase::Showing(first);
        info!(screen = %first, "first reveal");
        vec![
            Command::Reveal { screen: first },
            Command::Schedule {
                after: self.dwell_for(first),
                signal: Signal::DwellElapsed,
            },
        ]
    }

    /// Reacts to a timer firing.
    pub fn handle(&mut self, signal: Signal) -> Vec<Command> {
        match (signal, self.state.phase) {
            (Signal::DwellElapsed, Phase::Showing(shown)) => self.advance(shown),
            (Signal::TransitionFinished, Phase::Transitioning { to, .. }) => {
                self.state.phase = Phase::Showing(to);
                vec![Command::Schedule {
                    after: self.dwell_for(to),
                    signal: Signal::DwellElapsed,
                }]
            }
            (signal, phase) => {
                debug!(?signal, ?phase, "stale signal ignored");
                vec![]
            }
        }
    }

    fn advance(&mut self, shown: ScreenKey) -> Vec<Command> {
        let Some(next) = self.next_index(shown) else {
            // Lone screen: stay put, but keep checking whether it gained
            // siblings.
            return vec![
                Command::Refresh,
                Command::Schedule {
                    after: self.dwell_for(shown),
                    signal: Signal::DwellElapsed,
                },
            ];
        };

        let to = self.state.active.as_slice()[next];
        self.state.current_index = next;
        self.state.phase = Phase::Transitioning { from: shown, to };
        info!(from = %shown, %to, index = next, "transition");
        vec![
            Command::Transition {
                from: shown,
                to,
                timings: self.timings,
            },
            Command::Schedule {
                after: self.timings.transition(),
                signal: Signal::TransitionFinished,
            },
        ]
    }

    /// Index of the screen to rotate to, or `None` if `shown` is the only
    /// active screen.
    fn next_index(&self, shown: ScreenKey) -> Option<usize> {
        let active = self.state.active.as_slice();
        let len = active.len();
        if len == 1 {
            return (active[0] != shown).then_some(0);
        }

        let index = self.state.current_index;
        let mut next = if index < len { (index + 1) % len } else { 0 };
        if active[next] == shown {
            next = (next + 1) % len;
        }
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(screens: &[ScreenKey]) -> ActiveSet {
        ActiveSet::new(screens.to_vec()).unwrap()
    }

    fn snapshot(screens: &[ScreenKey]) -> Snapshot {
        Snapshot {
            active: set(screens),
            marquee: None,
        }
    }

    #[test]
    fn transition_timing_overlaps_entrance() {
        let t = Timings::default();
        assert_eq!(t.entrance_delay(), Duration::from_millis(300));
        assert_eq!(t.transition(), Duration::from_millis(1100));
    }

    #[test]
    fn stale_signals_are_ignored() {
        let mut s = RotationScheduler::default();
        assert!(s.handle(Signal::DwellElapsed).is_empty());
        s.apply(snapshot(&[ScreenKey::Notices, ScreenKey::Events]));
        assert!(s.handle(Signal::TransitionFinished).is_empty());
        assert_eq!(s.phase(), Phase::Showing(ScreenKey::Notices));
    }

    #[test]
    fn lone_screen_replaced_by_another_transitions_to_it() {
        let mut s = RotationScheduler::default();
        s.apply(snapshot(&[ScreenKey::Events]));
        s.apply(snapshot(&[ScreenKey::Notices]));
        let cmds = s.handle(Signal::DwellElapsed);
        assert!(matches!(
            cmds[0],
            Command::Transition {
                from: ScreenKey::Events,
                to: ScreenKey::Notices,
                ..
            }
        ));
    }

    #[test]
    fn never_targets_the_visible_screen() {
        let mut s = RotationScheduler::default();
        s.apply(snapshot(&[ScreenKey::Notices, ScreenKey::Events, ScreenKey::Cctv]));
        s.handle(Signal::DwellElapsed);
        s.handle(Signal::TransitionFinished);
        assert_eq!(s.phase(), Phase::Showing(ScreenKey::Events));

        // Notices disappears; index 1 now points past `events`' new slot.
        s.apply(snapshot(&[ScreenKey::Events, ScreenKey::Cctv]));
        s.handle(Signal::DwellElapsed);
        assert_eq!(
            s.phase(),
            Phase::Transitioning {
                from: ScreenKey::Events,
                to: ScreenKey::Cctv
            }
        );
    }
}
