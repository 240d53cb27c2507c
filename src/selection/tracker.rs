//! Fixed-interval selection polling task.
//!
//! There is no uniform change-notification API for arbitrary text fields, so
//! the tracker re-reads the selection on a timer (default 100 ms) and emits
//! an [`EngineEvent::SelectionChanged`] only when the observed
//! `(text, range)` pair actually changed.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::orchestrator::EngineEvent;

use super::{FieldAccessor, SelectionSnapshot};

// ---------------------------------------------------------------------------
// SelectionTracker
// ---------------------------------------------------------------------------

/// Handle-less polling task; stops when the engine channel closes.
pub struct SelectionTracker;

impl SelectionTracker {
    /// Spawn the polling loop on the current tokio runtime.
    ///
    /// An empty or zero-length selection is reported as `None`, which tells
    /// the orchestrator to invalidate any snapshot it holds.
    pub fn spawn(
        field: Arc<dyn FieldAccessor>,
        poll_interval: Duration,
        tx: mpsc::Sender<EngineEvent>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(poll_interval);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            // The last snapshot we reported, to suppress duplicate events.
            let mut last: Option<Option<SelectionSnapshot>> = None;

            loop {
                interval.tick().await;

                let snapshot = poll_once(field.as_ref());
                if last.as_ref() == Some(&snapshot) {
                    continue;
                }

                if tx
                    .send(EngineEvent::SelectionChanged(snapshot.clone()))
                    .await
                    .is_err()
                {
                    log::debug!("selection tracker: engine channel closed, stopping");
                    return;
                }
                last = Some(snapshot);
            }
        })
    }
}

/// Read the current selection; `None` when nothing useful is selected.
fn poll_once(field: &dyn FieldAccessor) -> Option<SelectionSnapshot> {
    let range = field.selected_range()?;
    if range.is_empty() {
        return None;
    }
    let text = field.selected_text()?;
    if text.is_empty() {
        return None;
    }
    Some(SelectionSnapshot { text, range })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::{FieldRange, MockFieldAccessor};

    async fn next_selection_event(
        rx: &mut mpsc::Receiver<EngineEvent>,
    ) -> Option<SelectionSnapshot> {
        let ev = tokio::time::timeout(Duration::from_millis(500), rx.recv())
            .await
            .expect("timed out waiting for selection event")
            .expect("channel closed");
        match ev {
            EngineEvent::SelectionChanged(snap) => snap,
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn reports_new_selection_once() {
        let field = Arc::new(MockFieldAccessor::new("hello world"));
        let (tx, mut rx) = mpsc::channel(16);
        let handle = SelectionTracker::spawn(
            Arc::clone(&field) as Arc<dyn FieldAccessor>,
            Duration::from_millis(5),
            tx,
        );

        // Initial poll: nothing selected.
        assert_eq!(next_selection_event(&mut rx).await, None);

        field.select(FieldRange::new(6, 5));
        let snap = next_selection_event(&mut rx).await.expect("snapshot");
        assert_eq!(snap.text, "world");
        assert_eq!(snap.range, FieldRange::new(6, 5));

        // No further events while the selection is unchanged.
        let quiet =
            tokio::time::timeout(Duration::from_millis(50), rx.recv()).await;
        assert!(quiet.is_err(), "duplicate SelectionChanged emitted");

        handle.abort();
    }

    #[tokio::test]
    async fn cleared_selection_is_reported_as_none() {
        let field = Arc::new(MockFieldAccessor::new("hello world"));
        field.select(FieldRange::new(0, 5));
        let (tx, mut rx) = mpsc::channel(16);
        let handle = SelectionTracker::spawn(
            Arc::clone(&field) as Arc<dyn FieldAccessor>,
            Duration::from_millis(5),
            tx,
        );

        let snap = next_selection_event(&mut rx).await.expect("snapshot");
        assert_eq!(snap.text, "hello");

        field.clear_selection();
        assert_eq!(next_selection_event(&mut rx).await, None);

        handle.abort();
    }

    #[tokio::test]
    async fn stops_when_channel_closes() {
        let field = Arc::new(MockFieldAccessor::new("x"));
        let (tx, rx) = mpsc::channel(16);
        let handle = SelectionTracker::spawn(
            field as Arc<dyn FieldAccessor>,
            Duration::from_millis(5),
            tx,
        );
        drop(rx);

        tokio::time::timeout(Duration::from_millis(500), handle)
            .await
            .expect("tracker did not stop")
            .expect("tracker panicked");
    }
}
