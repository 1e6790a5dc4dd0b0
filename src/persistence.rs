//! §6's match-end event sink. No persistent storage lives in this crate —
//! callers supply a [`MatchEndSink`] (a database-backed one, a message
//! queue producer, whatever the deployment needs); the default just logs.

use tracing::info;

use crate::domain::room::PlayerId;

#[derive(Debug, Clone)]
pub struct MatchEndEvent {
    pub match_id: u64,
    pub room_id: String,
    pub variant_key: Option<String>,
    pub winner_id: Option<PlayerId>,
    pub participants: Vec<PlayerId>,
    pub total_rounds: u32,
}

/// Implemented by whatever the deployment uses to record finished matches.
/// Room/Hub code never depends on a concrete storage backend directly.
pub trait MatchEndSink: Send + Sync {
    fn on_match_end(&self, event: MatchEndEvent);
}

/// Default sink: structured log line, nothing persisted.
#[derive(Debug, Default)]
pub struct LoggingMatchEndSink;

impl MatchEndSink for LoggingMatchEndSink {
    fn on_match_end(&self, event: MatchEndEvent) {
        info!(
            match_id = event.match_id,
            room_id = %event.room_id,
            variant_key = ?event.variant_key,
            winner_id = ?event.winner_id,
            participants = ?event.participants,
            total_rounds = event.total_rounds,
            "match ended"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        events: Mutex<Vec<MatchEndEvent>>,
    }

    impl MatchEndSink for RecordingSink {
        fn on_match_end(&self, event: MatchEndEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    #[test]
    fn sink_receives_the_emitted_event() {
        let sink = RecordingSink::default();
        sink.on_match_end(MatchEndEvent {
            match_id: 1,
            room_id: "r1".into(),
            variant_key: None,
            winner_id: Some("a".into()),
            participants: vec!["a".into(), "b".into()],
            total_rounds: 5,
        });
        assert_eq!(sink.events.lock().unwrap().len(), 1);
    }
}
