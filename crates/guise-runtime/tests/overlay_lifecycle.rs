//! End-to-end tests for the identity overlay engine: disguise lifecycle,
//! visibility refresh ordering, and per-recipient broadcast rewrites through
//! a simulated transport.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use guise_core::{
    AvatarDescriptor, GameMode, GuiseError, Participant, ParticipantId, PresenceEntry,
    PresenceUpdate, Profile, Result,
};
use guise_runtime::{AvatarSource, EngineBuilder, EngineHandle, OverlayEvent, VisibilityHost};

// ----------------------------------------------------------------------------
// Test Collaborators
// ----------------------------------------------------------------------------

struct StaticAvatars;

#[async_trait::async_trait]
impl AvatarSource for StaticAvatars {
    async fn fetch(&self, count: usize) -> Result<Vec<AvatarDescriptor>> {
        Ok((0..count)
            .map(|i| AvatarDescriptor::new(format!("texture-{}", i), Some(format!("sig-{}", i))))
            .collect())
    }
}

/// Visibility host that records remove/add ordering per refresh
#[derive(Clone, Default)]
struct RecordingHost {
    calls: Arc<Mutex<Vec<(bool, ParticipantId, ParticipantId)>>>,
}

impl VisibilityHost for RecordingHost {
    fn hide(&mut self, observer: ParticipantId, subject: ParticipantId) {
        self.calls.lock().unwrap().push((false, observer, subject));
    }

    fn show(&mut self, observer: ParticipantId, subject: ParticipantId) {
        self.calls.lock().unwrap().push((true, observer, subject));
    }
}

async fn engine_with_host(host: RecordingHost) -> EngineHandle {
    EngineBuilder::new()
        .with_avatar_source(Box::new(StaticAvatars))
        .with_visibility_host(Box::new(host))
        .build_and_start()
        .await
}

async fn join(engine: &EngineHandle, name: &str) -> ParticipantId {
    let participant = Participant::new(Profile::new(
        ParticipantId::random(),
        name,
        AvatarDescriptor::new("cmVhbA==", None),
    ));
    let id = participant.id();
    engine.on_participant_joined(participant).await.unwrap();
    id
}

/// The transport side of the pipeline: encode, filter per recipient, decode.
fn deliver(
    engine: &EngineHandle,
    recipient: ParticipantId,
    update: &PresenceUpdate,
) -> PresenceUpdate {
    let bytes = bincode::serialize(update).unwrap();
    let mut outbound: PresenceUpdate = bincode::deserialize(&bytes).unwrap();
    engine.filter().apply(recipient, &mut outbound);
    outbound
}

// ----------------------------------------------------------------------------
// Lifecycle
// ----------------------------------------------------------------------------

#[tokio::test]
async fn disguise_round_trip_restores_real_identity() {
    let engine = engine_with_host(RecordingHost::default()).await;
    let p = join(&engine, "RealName").await;

    let registry = engine.registry();
    let overlay = registry.disguise(p).await.unwrap();
    assert!(registry.is_disguised(p));
    assert_eq!(overlay.real().account_id, overlay.substitute().account_id);
    assert_ne!(overlay.real_name(), overlay.substitute_name());

    registry.undisguise(p).await.unwrap();
    assert!(!registry.is_disguised(p));
    assert!(registry.overlay_of(p).is_none());

    engine.shutdown().await;
}

#[tokio::test]
async fn simultaneous_overlays_never_share_names() {
    let engine = engine_with_host(RecordingHost::default()).await;
    let registry = engine.registry();

    let mut names = HashSet::new();
    for i in 0..32 {
        let p = join(&engine, &format!("Player{}", i)).await;
        let overlay = registry.disguise(p).await.unwrap();
        assert!(
            names.insert(overlay.substitute_name().to_string()),
            "substitute name collided"
        );
    }
    assert_eq!(registry.list_disguised().len(), 32);

    engine.shutdown().await;
}

#[tokio::test]
async fn concurrent_disguises_both_succeed_with_distinct_names() {
    let engine = engine_with_host(RecordingHost::default()).await;
    let p = join(&engine, "Alpha").await;
    let q = join(&engine, "Beta").await;
    let registry = engine.registry();

    let (a, b) = tokio::join!(registry.disguise(p), registry.disguise(q));
    let (a, b) = (a.unwrap(), b.unwrap());
    assert_ne!(a.substitute_name(), b.substitute_name());

    engine.shutdown().await;
}

#[tokio::test]
async fn double_disguise_surfaces_precondition_error() {
    let engine = engine_with_host(RecordingHost::default()).await;
    let p = join(&engine, "RealName").await;
    let registry = engine.registry();

    let original = registry.disguise(p).await.unwrap();
    assert!(matches!(
        registry.disguise(p).await,
        Err(GuiseError::AlreadyDisguised { .. })
    ));
    assert_eq!(registry.overlay_of(p).unwrap(), original);

    engine.shutdown().await;
}

// ----------------------------------------------------------------------------
// Visibility Refresh
// ----------------------------------------------------------------------------

#[tokio::test]
async fn refresh_touches_every_observer_remove_before_add() {
    let host = RecordingHost::default();
    let calls = host.calls.clone();
    let engine = engine_with_host(host).await;

    let p = join(&engine, "Disguised").await;
    let q = join(&engine, "ObserverOne").await;
    let r = join(&engine, "ObserverTwo").await;

    engine.registry().disguise(p).await.unwrap();

    let recorded = calls.lock().unwrap().clone();
    assert_eq!(recorded.len(), 4, "one hide and one show per observer");

    let observers: HashSet<ParticipantId> = recorded.iter().map(|(_, o, _)| *o).collect();
    assert_eq!(observers, HashSet::from([q, r]), "the subject never observes itself");
    assert!(recorded.iter().all(|(_, _, subject)| *subject == p));

    // All hides strictly precede all shows
    let first_show = recorded.iter().position(|(show, _, _)| *show).unwrap();
    assert!(recorded[..first_show].iter().all(|(show, _, _)| !*show));
    assert!(recorded[first_show..].iter().all(|(show, _, _)| *show));

    engine.shutdown().await;
}

#[tokio::test]
async fn undisguise_triggers_a_second_refresh() {
    let host = RecordingHost::default();
    let calls = host.calls.clone();
    let engine = engine_with_host(host).await;

    let p = join(&engine, "Disguised").await;
    join(&engine, "Observer").await;

    let registry = engine.registry();
    registry.disguise(p).await.unwrap();
    registry.undisguise(p).await.unwrap();

    // Two refreshes, each with one hide and one show for the single observer
    assert_eq!(calls.lock().unwrap().len(), 4);

    engine.shutdown().await;
}

// ----------------------------------------------------------------------------
// Broadcast Rewrite Through the Transport
// ----------------------------------------------------------------------------

#[tokio::test]
async fn observers_see_substitute_while_subject_sees_themselves() {
    let engine = engine_with_host(RecordingHost::default()).await;
    let p = join(&engine, "RealName").await;
    let q = join(&engine, "Observer").await;

    let overlay = engine.registry().disguise(p).await.unwrap();

    let entry = PresenceEntry::new(
        Profile::new(p, "RealName", AvatarDescriptor::new("cmVhbA==", None)),
        5,
        GameMode::Survival,
    );
    let broadcast = PresenceUpdate::new(vec![entry.clone()]);

    // Q's copy carries the substitute identity, session fields untouched
    let for_q = deliver(&engine, q, &broadcast);
    assert_eq!(for_q.entries[0].display_name, overlay.substitute_name());
    assert_eq!(for_q.entries[0].profile, *overlay.substitute());
    assert_eq!(for_q.entries[0].participant_id(), p);
    assert_eq!(for_q.entries[0].latency, 5);
    assert_eq!(for_q.entries[0].mode, GameMode::Survival);

    // P's own copy is left as-is
    let for_p = deliver(&engine, p, &broadcast);
    assert_eq!(for_p.entries[0], entry);

    engine.shutdown().await;
}

#[tokio::test]
async fn rewrite_stops_after_undisguise() {
    let engine = engine_with_host(RecordingHost::default()).await;
    let p = join(&engine, "RealName").await;
    let q = join(&engine, "Observer").await;
    let registry = engine.registry();

    let entry = PresenceEntry::new(
        Profile::new(p, "RealName", AvatarDescriptor::new("cmVhbA==", None)),
        5,
        GameMode::Survival,
    );
    let broadcast = PresenceUpdate::new(vec![entry.clone()]);

    registry.disguise(p).await.unwrap();
    assert_ne!(deliver(&engine, q, &broadcast).entries[0], entry);

    registry.undisguise(p).await.unwrap();
    assert_eq!(deliver(&engine, q, &broadcast).entries[0], entry);

    engine.shutdown().await;
}

#[tokio::test]
async fn events_reach_external_listeners() {
    let engine = engine_with_host(RecordingHost::default()).await;
    let mut events = engine.subscribe();
    let p = join(&engine, "RealName").await;

    let overlay = engine.registry().disguise(p).await.unwrap();

    match events.recv().await.unwrap() {
        OverlayEvent::Disguised {
            participant,
            overlay: event_overlay,
        } => {
            assert_eq!(participant, p);
            assert_eq!(event_overlay, overlay);
        }
        other => panic!("expected Disguised, got {:?}", other),
    }

    engine.shutdown().await;
}
