//! Overlay notification bus
//!
//! The registry emits an event after each settled disguise or undisguise so
//! external listeners (audit logging, permission gating) can react. Listener
//! behavior is out of scope here; the bus is a plain tokio broadcast channel
//! and lagging receivers simply miss events.

use guise_core::{IdentityOverlay, ParticipantId};
use tokio::sync::broadcast;

/// Notification emitted by the registry on overlay lifecycle changes.
#[derive(Debug, Clone)]
pub enum OverlayEvent {
    /// A participant is now presenting a substitute identity
    Disguised {
        participant: ParticipantId,
        overlay: IdentityOverlay,
    },
    /// A participant's overlay was removed and their real identity restored
    Undisguised {
        participant: ParticipantId,
        overlay: IdentityOverlay,
    },
}

impl OverlayEvent {
    /// The participant the event concerns
    pub fn participant(&self) -> ParticipantId {
        match self {
            OverlayEvent::Disguised { participant, .. } => *participant,
            OverlayEvent::Undisguised { participant, .. } => *participant,
        }
    }
}

/// Create the notification bus with the given buffer size
pub fn overlay_event_channel(
    buffer: usize,
) -> (broadcast::Sender<OverlayEvent>, broadcast::Receiver<OverlayEvent>) {
    broadcast::channel(buffer)
}
