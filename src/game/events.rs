//! Match event notification.
//!
//! Each engine owns its own [`Notifier`]; listeners are dropped with it.

use std::fmt;

use tracing::trace;

use crate::game::{Command, MatchState, Outcome, TankIndex};

/// Event names listeners can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A match was set up.
    NewMatch,
    /// A command was applied.
    CommandExecuted,
}

impl EventKind {
    /// Event name as exposed to collaborators.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            EventKind::NewMatch => "newMatch",
            EventKind::CommandExecuted => "commandExecuted",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An event with a borrowed view of the state it describes.
#[derive(Debug, Clone, Copy)]
pub enum MatchEvent<'a> {
    /// A match was set up; carries the fresh state.
    NewMatch(&'a MatchState),
    /// A command was applied.
    CommandExecuted {
        /// Tank that received the command.
        tank: TankIndex,
        /// The command.
        command: Command,
        /// How it resolved.
        outcome: Outcome,
        /// State after resolution.
        state: &'a MatchState,
    },
}

impl MatchEvent<'_> {
    /// The name this event is published under.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            MatchEvent::NewMatch(_) => EventKind::NewMatch,
            MatchEvent::CommandExecuted { .. } => EventKind::CommandExecuted,
        }
    }

    /// State snapshot carried by the event.
    #[must_use]
    pub const fn state(&self) -> &MatchState {
        match self {
            MatchEvent::NewMatch(state) | MatchEvent::CommandExecuted { state, .. } => state,
        }
    }
}

type Listener = Box<dyn FnMut(&MatchEvent<'_>)>;

/// Synchronous, in-process publish/subscribe registry.
#[derive(Default)]
pub struct Notifier {
    /// Listeners in registration order.
    listeners: Vec<(EventKind, Listener)>,
}

// Manual Debug implementation since boxed closures don't implement it
impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Notifier {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for events of `kind`.
    ///
    /// Several listeners may share a kind; they run in registration order.
    pub fn on(&mut self, kind: EventKind, listener: impl FnMut(&MatchEvent<'_>) + 'static) {
        self.listeners.push((kind, Box::new(listener)));
    }

    /// Number of listeners registered for `kind`.
    #[must_use]
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.iter().filter(|(k, _)| *k == kind).count()
    }

    /// Deliver `event` to every matching listener, returning once all have run.
    pub fn emit(&mut self, event: &MatchEvent<'_>) {
        let kind = event.kind();
        for (_, listener) in self.listeners.iter_mut().filter(|(k, _)| *k == kind) {
            listener(event);
        }
        trace!(event = %kind, listeners = self.listener_count(kind), "dispatched event");
    }
}
