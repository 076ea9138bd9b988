//! Identity registry
//!
//! Authoritative owner of the "who is disguised" state: the overlay map, the
//! substitute-name reservation set, and the roster of connected participants.
//! No other component mutates this state; the rewrite filter only reads
//! snapshots of it.
//!
//! Locking discipline: every mutating operation (`disguise`, `undisguise`,
//! `on_participant_left`) serializes on one async mutex held across the
//! awaited presence refresh, so overlapping calls never interleave partial
//! state. The data itself sits behind a separate `RwLock`; writes are applied
//! in a single critical section only after the overlay is fully constructed,
//! so readers always see a consistent snapshot.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use guise_core::{
    AvatarDescriptor, GuiseError, IdentityOverlay, NameAllocator, Participant, ParticipantId,
    Result, SkinPool, Timestamp,
};
use tokio::sync::{broadcast, Mutex};
use tracing::{info, warn};

use crate::events::OverlayEvent;
use crate::resync::PresenceResynchronizer;

// ----------------------------------------------------------------------------
// Registry State
// ----------------------------------------------------------------------------

#[derive(Default)]
struct RegistryState {
    /// Connected participants by account ID
    roster: HashMap<ParticipantId, Participant>,
    /// Active overlays, at most one per participant
    overlays: HashMap<ParticipantId, IdentityOverlay>,
    /// Substitute names currently in use, one-to-one with `overlays`
    reserved_names: HashSet<String>,
}

// ----------------------------------------------------------------------------
// Identity Registry
// ----------------------------------------------------------------------------

/// Tracks which participants are disguised and under what substitute
/// identity.
pub struct IdentityRegistry {
    state: RwLock<RegistryState>,
    /// Serializes mutating operations end to end, including the resync wait
    op_lock: Mutex<()>,
    allocator: NameAllocator,
    skins: SkinPool,
    resync: PresenceResynchronizer,
    events: broadcast::Sender<OverlayEvent>,
    empty_pool_warned: AtomicBool,
}

impl IdentityRegistry {
    /// Create a registry over the given collaborators.
    pub fn new(
        allocator: NameAllocator,
        skins: SkinPool,
        resync: PresenceResynchronizer,
        events: broadcast::Sender<OverlayEvent>,
    ) -> Self {
        Self {
            state: RwLock::new(RegistryState::default()),
            op_lock: Mutex::new(()),
            allocator,
            skins,
            resync,
            events,
            empty_pool_warned: AtomicBool::new(false),
        }
    }

    // ------------------------------------------------------------------------
    // Read Operations
    // ------------------------------------------------------------------------

    /// Whether the participant currently has an overlay
    pub fn is_disguised(&self, participant: ParticipantId) -> bool {
        self.read_state().overlays.contains_key(&participant)
    }

    /// The participant's overlay, if any
    pub fn overlay_of(&self, participant: ParticipantId) -> Option<IdentityOverlay> {
        self.read_state().overlays.get(&participant).cloned()
    }

    /// Defensive snapshot of every active overlay
    pub fn all_overlays(&self) -> Vec<IdentityOverlay> {
        self.read_state().overlays.values().cloned().collect()
    }

    /// Read-only projection for the operator's listing surface
    pub fn list_disguised(&self) -> Vec<IdentityOverlay> {
        self.all_overlays()
    }

    /// The real display name behind a disguise
    pub fn real_name_of(&self, participant: ParticipantId) -> Option<String> {
        self.read_state()
            .overlays
            .get(&participant)
            .map(|overlay| overlay.real_name().to_string())
    }

    /// Snapshot of the overlay map for one rewrite pass.
    ///
    /// Hot path of every outbound identity broadcast: holds the read lock
    /// only for the clone.
    pub fn overlays_snapshot(&self) -> HashMap<ParticipantId, IdentityOverlay> {
        self.read_state().overlays.clone()
    }

    /// Number of connected participants
    pub fn roster_len(&self) -> usize {
        self.read_state().roster.len()
    }

    /// Subscribe to overlay lifecycle notifications
    pub fn subscribe(&self) -> broadcast::Receiver<OverlayEvent> {
        self.events.subscribe()
    }

    // ------------------------------------------------------------------------
    // Session Lifecycle
    // ------------------------------------------------------------------------

    /// Session layer callback: a participant joined.
    pub async fn on_participant_joined(&self, participant: Participant) {
        let _guard = self.op_lock.lock().await;
        let id = participant.id();
        self.write_state().roster.insert(id, participant);
        info!(participant = %id, "Participant joined");
    }

    /// Session layer callback: a participant left.
    ///
    /// Silently removes any overlay; leaving is not an error condition even
    /// if the participant was never disguised. No resynchronization is
    /// needed since the participant is gone from every client anyway.
    pub async fn on_participant_left(&self, participant: ParticipantId) {
        let _guard = self.op_lock.lock().await;
        let removed = {
            let mut state = self.write_state();
            state.roster.remove(&participant);
            let removed = state.overlays.remove(&participant);
            if let Some(ref overlay) = removed {
                state.reserved_names.remove(overlay.substitute_name());
            }
            removed
        };

        if let Some(overlay) = removed {
            info!(
                participant = %participant,
                substitute = overlay.substitute_name(),
                "Overlay released on disconnect"
            );
        }
    }

    // ------------------------------------------------------------------------
    // Disguise Operations
    // ------------------------------------------------------------------------

    /// Disguise a connected participant under a freshly allocated substitute
    /// identity.
    ///
    /// Fails with [`GuiseError::AlreadyDisguised`] if an overlay already
    /// exists (callers wanting idempotence check [`Self::is_disguised`]
    /// first) and with [`GuiseError::NamePoolExhausted`] if no collision-free
    /// name could be found. A failed call leaves no partial overlay, no
    /// reserved name, and no pending resynchronization.
    pub async fn disguise(&self, participant: ParticipantId) -> Result<IdentityOverlay> {
        let _guard = self.op_lock.lock().await;

        // Allocation inputs come from one consistent read; nothing mutates
        // until the overlay is fully built.
        let (real_profile, reserved) = {
            let state = self.read_state();
            if state.overlays.contains_key(&participant) {
                return Err(GuiseError::AlreadyDisguised { participant });
            }
            let member = state
                .roster
                .get(&participant)
                .ok_or(GuiseError::NotConnected { participant })?;
            (member.profile.clone(), state.reserved_names.clone())
        };

        let substitute_name = self.allocator.allocate(&reserved)?;
        let avatar = self.pick_avatar();
        let overlay = IdentityOverlay::new(
            real_profile,
            substitute_name.clone(),
            avatar,
            Timestamp::now(),
        );

        let observers = {
            let mut state = self.write_state();
            state.reserved_names.insert(substitute_name.clone());
            state.overlays.insert(participant, overlay.clone());
            if let Some(member) = state.roster.get_mut(&participant) {
                member.display_name = substitute_name.clone();
            }
            other_participants(&state, participant)
        };

        self.settle_refresh(participant, observers).await;

        info!(
            participant = %participant,
            substitute = substitute_name.as_str(),
            "Participant disguised"
        );
        let _ = self.events.send(OverlayEvent::Disguised {
            participant,
            overlay: overlay.clone(),
        });

        Ok(overlay)
    }

    /// Remove a participant's overlay and restore their real identity.
    ///
    /// Fails with [`GuiseError::NotDisguised`] if no overlay exists.
    pub async fn undisguise(&self, participant: ParticipantId) -> Result<()> {
        let _guard = self.op_lock.lock().await;

        let (overlay, observers) = {
            let mut state = self.write_state();
            let overlay = state
                .overlays
                .remove(&participant)
                .ok_or(GuiseError::NotDisguised { participant })?;
            state.reserved_names.remove(overlay.substitute_name());
            if let Some(member) = state.roster.get_mut(&participant) {
                member.display_name = overlay.real_name().to_string();
            }
            (overlay, other_participants(&state, participant))
        };

        self.settle_refresh(participant, observers).await;

        info!(
            participant = %participant,
            restored = overlay.real_name(),
            "Participant undisguised"
        );
        let _ = self.events.send(OverlayEvent::Undisguised {
            participant,
            overlay,
        });

        Ok(())
    }

    // ------------------------------------------------------------------------
    // Private Methods
    // ------------------------------------------------------------------------

    /// Pick a substitute avatar, degrading to the placeholder descriptor when
    /// the pool never got populated. The degradation is logged once.
    fn pick_avatar(&self) -> AvatarDescriptor {
        match self.skins.random_pick() {
            Ok(avatar) => avatar,
            Err(_) => {
                if !self.empty_pool_warned.swap(true, Ordering::Relaxed) {
                    warn!("Skin pool is empty; disguises will use the placeholder avatar");
                }
                AvatarDescriptor::placeholder()
            }
        }
    }

    /// Wait for the visibility refresh to settle so the caller observes a
    /// fully-settled world state. Registry state is already committed at this
    /// point; a refused refresh means the host context is shutting down, so
    /// it is logged rather than surfaced.
    async fn settle_refresh(&self, subject: ParticipantId, observers: Vec<ParticipantId>) {
        if let Err(err) = self.resync.refresh(subject, observers).await {
            warn!(participant = %subject, error = %err, "Presence refresh not delivered");
        }
    }

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, RegistryState> {
        // A poisoned lock must not fail reads on the broadcast hot path
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_state(&self) -> std::sync::RwLockWriteGuard<'_, RegistryState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }
}

/// Every connected participant except `subject`
fn other_participants(state: &RegistryState, subject: ParticipantId) -> Vec<ParticipantId> {
    state
        .roster
        .keys()
        .copied()
        .filter(|id| *id != subject)
        .collect()
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
