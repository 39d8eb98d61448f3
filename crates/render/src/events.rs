use serde::Serialize;

/// One entry per threshold change or resize handled by a view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderEvent {
    pub sequence: u64,
    pub kind: &'static str,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct EventLog {
    next_sequence: u64,
    events: Vec<RenderEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, kind: &'static str, message: impl Into<String>) {
        self.events.push(RenderEvent {
            sequence: self.next_sequence,
            kind,
            message: message.into(),
        });
        self.next_sequence += 1;
    }

    pub fn drain(&mut self) -> Vec<RenderEvent> {
        std::mem::take(&mut self.events)
    }
}
