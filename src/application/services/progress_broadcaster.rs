use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use futures::stream::{self, BoxStream};

use crate::domain::{SessionId, StatusEvent};

/// How long a terminal event stays readable before its key is retired, so
/// observers arriving after the run finished still see the outcome.
const DEFAULT_TERMINAL_RETENTION: Duration = Duration::from_secs(60);

/// Keyed live-progress state with overwrite semantics: one current event per
/// session, superseded by each publish. Observers poll at a fixed cadence and
/// are handed an event only when it differs from the last one they saw, so a
/// slow observer sees latest state rather than every intermediate step.
///
/// The map behind this type is the only state shared across sessions; it is
/// reached exclusively through publish/subscribe/clear. Keys are retired by
/// `publish_terminal` after the retention window, never by subscribers, so
/// any number of concurrent observers see the same terminal event.
pub struct ProgressBroadcaster {
    events: Arc<DashMap<SessionId, StatusEvent>>,
    cadence: Duration,
    terminal_retention: Duration,
}

impl ProgressBroadcaster {
    pub fn new(cadence: Duration) -> Self {
        Self {
            events: Arc::new(DashMap::new()),
            cadence,
            terminal_retention: DEFAULT_TERMINAL_RETENTION,
        }
    }

    pub fn with_terminal_retention(mut self, retention: Duration) -> Self {
        self.terminal_retention = retention;
        self
    }

    pub fn publish(&self, session: &SessionId, event: StatusEvent) {
        tracing::debug!(
            session_id = %session,
            step = %event.step,
            percent = event.progress_percent,
            "Progress update"
        );
        self.events.insert(*session, event);
    }

    /// Publish a `completed`/`failed` event and retire the key once the
    /// retention window elapses. The removal is conditional on the entry
    /// still holding this exact event, so a newer run started for the same
    /// session in the meantime keeps its own progress untouched.
    pub fn publish_terminal(&self, session: &SessionId, event: StatusEvent) {
        debug_assert!(event.step.is_terminal());
        self.publish(session, event.clone());

        let events = Arc::clone(&self.events);
        let key = *session;
        let retention = self.terminal_retention;
        tokio::spawn(async move {
            tokio::time::sleep(retention).await;
            events.remove_if(&key, |_, current| current == &event);
        });
    }

    pub fn clear(&self, session: &SessionId) {
        self.events.remove(session);
    }

    pub fn current(&self, session: &SessionId) -> Option<StatusEvent> {
        self.events.get(session).map(|entry| entry.value().clone())
    }

    /// Finite stream of status events for one session.
    ///
    /// Yields a synthetic `waiting` event when no entry exists yet, then each
    /// change to the keyed event, and terminates right after delivering a
    /// terminal (`completed`/`failed`) event to this observer. The keyed
    /// entry is left in place for other observers. Events are observed in
    /// emission order; intermediate states may be skipped.
    pub fn subscribe(&self, session: &SessionId) -> BoxStream<'static, StatusEvent> {
        let events = Arc::clone(&self.events);
        let key = *session;
        let cadence = self.cadence;

        let state = SubscriberState { last: None, done: false };
        Box::pin(stream::unfold(state, move |mut state| {
            let events = Arc::clone(&events);
            async move {
                if state.done {
                    return None;
                }
                loop {
                    let current = events
                        .get(&key)
                        .map(|entry| entry.value().clone())
                        .unwrap_or_else(StatusEvent::waiting);

                    if state.last.as_ref() != Some(&current) {
                        if current.step.is_terminal() {
                            state.done = true;
                        }
                        state.last = Some(current.clone());
                        return Some((current, state));
                    }

                    tokio::time::sleep(cadence).await;
                }
            }
        }))
    }
}

impl Default for ProgressBroadcaster {
    fn default() -> Self {
        Self::new(Duration::from_millis(500))
    }
}

struct SubscriberState {
    last: Option<StatusEvent>,
    done: bool,
}
