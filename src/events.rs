use crate::models::Inquiry;
use tokio::sync::broadcast;

#[derive(Debug, Clone)]
pub enum LivechatEvent {
    InquiryQueued(Inquiry),
    InquiryTaken(Inquiry),
    InquiryPrioritized(Inquiry),
}

impl LivechatEvent {
    /// SSE event name.
    pub fn name(&self) -> &'static str {
        match self {
            LivechatEvent::InquiryQueued(_) => "inquiry_queued",
            LivechatEvent::InquiryTaken(_) => "inquiry_taken",
            LivechatEvent::InquiryPrioritized(_) => "inquiry_prioritized",
        }
    }

    pub fn inquiry(&self) -> &Inquiry {
        match self {
            LivechatEvent::InquiryQueued(i)
            | LivechatEvent::InquiryTaken(i)
            | LivechatEvent::InquiryPrioritized(i) => i,
        }
    }
}

pub struct EventBus {
    pub sender: broadcast::Sender<LivechatEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(1024);
        EventBus { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LivechatEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: LivechatEvent) {
        // Ignore send errors (no subscribers)
        let _ = self.sender.send(event);
    }
}
