//! Per-recipient presence rewrite
//!
//! Pure rewrite pass over an outbound identity-broadcast: entries describing
//! disguised participants are replaced with their substitute identity before
//! transmission, except in the copy addressed to the disguised participant
//! themselves, who must see their own true identity reflected back.
//!
//! This pass must never fail a transmission. Any inconsistency (an overlay
//! missing from the snapshot) degrades to leaving that entry untouched.

use std::collections::HashMap;

use crate::packet::PresenceUpdate;
use crate::profile::IdentityOverlay;
use crate::types::ParticipantId;

/// Rewrite `update` in place for delivery to `recipient`.
///
/// `overlays` is a consistent snapshot of the registry's overlay map taken
/// once per message. Latency and play state pass through unchanged; entry
/// order is not guaranteed to be preserved, but no entry is duplicated or
/// dropped.
pub fn rewrite_presence_update(
    recipient: ParticipantId,
    update: &mut PresenceUpdate,
    overlays: &HashMap<ParticipantId, IdentityOverlay>,
) {
    if update.is_empty() || overlays.is_empty() {
        return;
    }

    for entry in &mut update.entries {
        let participant = entry.participant_id();

        // Self-view exception: a disguised participant sees their own real
        // entry, every other recipient sees the substitute.
        if participant == recipient {
            continue;
        }

        if let Some(overlay) = overlays.get(&participant) {
            entry.profile = overlay.substitute().clone();
            entry.display_name = overlay.substitute_name().to_string();
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
