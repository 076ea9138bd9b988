//! Registry-backed presence rewrite filter
//!
//! The transport registers this filter for the identity-broadcast message
//! type and calls it with `(recipient, entries)` before every send. The
//! filter takes one snapshot of the overlay map per message and applies the
//! pure rewrite from `guise-core`; it never mutates registry state and never
//! fails a transmission.

use std::sync::Arc;

use guise_core::{rewrite_presence_update, ParticipantId, PresenceUpdate};

use crate::registry::IdentityRegistry;

/// Per-recipient rewrite filter over the live registry.
#[derive(Clone)]
pub struct PresenceRewriteFilter {
    registry: Arc<IdentityRegistry>,
}

impl PresenceRewriteFilter {
    /// Create a filter reading from `registry`
    pub fn new(registry: Arc<IdentityRegistry>) -> Self {
        Self { registry }
    }

    /// Rewrite `update` in place for delivery to `recipient`.
    pub fn apply(&self, recipient: ParticipantId, update: &mut PresenceUpdate) {
        if update.is_empty() {
            return;
        }
        let overlays = self.registry.overlays_snapshot();
        rewrite_presence_update(recipient, update, &overlays);
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::overlay_event_channel;
    use crate::resync::{NullVisibilityHost, PresenceResynchronizer};
    use guise_core::{
        AvatarDescriptor, GameMode, NameAllocator, Participant, PresenceEntry, Profile, SkinPool,
    };

    async fn filter_with_disguised(
        name: &str,
    ) -> (PresenceRewriteFilter, ParticipantId, String, Profile) {
        let (resync, _task) = PresenceResynchronizer::spawn(Box::new(NullVisibilityHost), 8);
        let (events, _rx) = overlay_event_channel(16);
        let registry = Arc::new(IdentityRegistry::new(
            NameAllocator::with_defaults(),
            SkinPool::new(vec![AvatarDescriptor::new("cG9vbA==", None)]),
            resync,
            events,
        ));

        let profile = Profile::new(ParticipantId::random(), name, AvatarDescriptor::placeholder());
        let participant = Participant::new(profile.clone());
        let id = participant.id();
        registry.on_participant_joined(participant).await;
        let overlay = registry.disguise(id).await.unwrap();

        (
            PresenceRewriteFilter::new(registry),
            id,
            overlay.substitute_name().to_string(),
            profile,
        )
    }

    #[tokio::test]
    async fn test_filter_rewrites_for_observers_only() {
        let (filter, p, substitute, profile) = filter_with_disguised("RealName").await;
        let entry = PresenceEntry::new(profile, 5, GameMode::Survival);

        // Observer Q sees the substitute
        let mut for_q = PresenceUpdate::new(vec![entry.clone()]);
        filter.apply(ParticipantId::random(), &mut for_q);
        assert_eq!(for_q.entries[0].display_name, substitute);
        assert_eq!(for_q.entries[0].latency, 5);

        // P sees their own real entry
        let mut for_p = PresenceUpdate::new(vec![entry.clone()]);
        filter.apply(p, &mut for_p);
        assert_eq!(for_p.entries[0], entry);
    }

    #[tokio::test]
    async fn test_filter_passes_empty_update_through() {
        let (filter, _, _, _) = filter_with_disguised("RealName").await;
        let mut update = PresenceUpdate::empty();
        filter.apply(ParticipantId::random(), &mut update);
        assert!(update.is_empty());
    }
}
