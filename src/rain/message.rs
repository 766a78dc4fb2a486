/// A sentence shown centred over the rain for a bounded time.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayMessage {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub created_at: f64,
}

impl OverlayMessage {
    pub fn is_expired(&self, now: f64, duration: f64) -> bool {
        now - self.created_at >= duration
    }
}

/// Active overlay messages in creation order, plus when the next one is due.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageBoard {
    active: Vec<OverlayMessage>,
    next_at: f64,
}

impl MessageBoard {
    pub fn new(next_at: f64) -> Self {
        Self {
            active: Vec::new(),
            next_at,
        }
    }

    pub fn is_due(&self, now: f64, capacity: usize) -> bool {
        now >= self.next_at && self.active.len() < capacity
    }

    pub fn push(&mut self, message: OverlayMessage, next_at: f64) {
        self.active.push(message);
        self.next_at = next_at;
    }

    /// Drops every message whose display time is up.
    pub fn retain_live(&mut self, now: f64, duration: f64) {
        self.active.retain(|m| !m.is_expired(now, duration));
    }

    pub fn active(&self) -> &[OverlayMessage] {
        &self.active
    }

    pub fn next_at(&self) -> f64 {
        self.next_at
    }
}
