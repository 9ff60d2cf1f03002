use super::{LogEntry, LogState};
use std::fmt::Write as _;
use std::time::SystemTime;
use tracing::{
    Event, Subscriber,
    field::{Field, Visit},
};
use tracing_subscriber::{Layer, layer::Context};

/// Couche `tracing` qui copie chaque événement dans le [`LogState`]
pub struct SseLayer {
    state: LogState,
}

impl SseLayer {
    pub fn new(state: LogState) -> Self {
        Self { state }
    }
}

/// Reconstruit le message : le champ `message` puis les autres en `clé=valeur`
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

impl<S: Subscriber> Layer<S> for SseLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let meta = event.metadata();
        self.state.push(LogEntry {
            timestamp: SystemTime::now(),
            level: meta.level().as_str().to_string(),
            target: meta.target().to_string(),
            message: format!("{}{}", visitor.message, visitor.fields),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::layer::SubscriberExt;

    #[test]
    fn test_events_land_in_buffer() {
        let state = LogState::detached(16);
        let subscriber = tracing_subscriber::registry().with(SseLayer::new(state.clone()));

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(bytes = 42, "relay aborted");
        });

        let entries = state.dump();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].level, "WARN");
        assert_eq!(entries[0].message, "relay aborted bytes=42");
    }
}
