use serde::Serialize;

/// Severity of a recorded event, mirrored onto the `log` level by callers.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warn,
    Error,
}

/// Structured diagnostic kept for inspection after the fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub frame_index: u64,
    pub severity: Severity,
    pub kind: &'static str,
    pub message: String,
}

/// Append-only diagnostic log, bounded to the most recent `capacity` events.
#[derive(Debug)]
pub struct EventBus {
    events: Vec<Event>,
    capacity: usize,
    dropped: u64,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::with_capacity(1024)
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Vec::new(),
            capacity: capacity.max(1),
            dropped: 0,
        }
    }

    pub fn emit(
        &mut self,
        frame_index: u64,
        severity: Severity,
        kind: &'static str,
        message: impl Into<String>,
    ) {
        if self.events.len() == self.capacity {
            self.events.remove(0);
            self.dropped += 1;
        }
        self.events.push(Event {
            frame_index,
            severity,
            kind,
            message: message.into(),
        });
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn of_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a Event> + 'a {
        self.events.iter().filter(move |e| e.kind == kind)
    }

    /// Number of events evicted because the bus was full.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

#[cfg(test)]
mod tests {
    use super::{EventBus, Severity};

    #[test]
    fn records_events_with_frame_index() {
        let mut bus = EventBus::new();
        bus.emit(2, Severity::Warn, "missing_root_world", "/a.html");
        assert_eq!(bus.events().len(), 1);
        assert_eq!(bus.events()[0].frame_index, 2);
        assert_eq!(bus.of_kind("missing_root_world").count(), 1);
        assert_eq!(bus.of_kind("other").count(), 0);
    }

    #[test]
    fn evicts_oldest_when_full() {
        let mut bus = EventBus::with_capacity(2);
        bus.emit(0, Severity::Info, "a", "1");
        bus.emit(0, Severity::Info, "b", "2");
        bus.emit(0, Severity::Info, "c", "3");
        let kinds: Vec<_> = bus.events().iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec!["b", "c"]);
        assert_eq!(bus.dropped(), 1);
    }
}
