use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

use crate::EngineEvent;

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

/// Forwards engine events to the owner of the state, until teardown.
///
/// Once `cancel` fires every event is dropped, so nothing writes into a state
/// container that has been discarded.
pub struct ChannelEventSink {
    tx: UnboundedSender<EngineEvent>,
    cancel: CancellationToken,
}

impl ChannelEventSink {
    pub fn new(tx: UnboundedSender<EngineEvent>, cancel: CancellationToken) -> Self {
        Self { tx, cancel }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        if self.cancel.is_cancelled() {
            return;
        }
        let _ = self.tx.send(event);
    }
}
