use huddle_client::{MediaEvent, NegotiationState};
use huddle_core::IceCandidate;

use crate::integration::init_tracing;
use crate::utils::{TestRoom, eventually};

fn candidate(value: &str) -> MediaEvent {
    MediaEvent::LocalCandidate(IceCandidate {
        candidate: value.into(),
        sdp_mid: Some("0".into()),
        sdp_m_line_index: Some(0),
        username_fragment: None,
    })
}

#[tokio::test]
async fn test_local_candidates_are_sent_to_remote() {
    init_tracing();

    let room = TestRoom::new("u1");
    room.snapshot_of(&["u2"]).await;
    room.wait_for_state("u2", NegotiationState::Offering).await;

    room.media.emit("u2", candidate("c1")).await;
    room.media.emit("u2", candidate("c2")).await;

    eventually(|| room.signaling.candidates_to("u2") == 2).await;
    assert!(room.signaling.all_from(&room.local));
}

#[tokio::test]
async fn test_events_of_replaced_session_are_dropped() {
    init_tracing();

    let room = TestRoom::new("u1");
    room.snapshot_of(&["u2"]).await;
    room.wait_for_state("u2", NegotiationState::Offering).await;
    let first = room.media.generation_of("u2").unwrap();

    room.deliver(huddle_core::SignalEnvelope::UserLeft {
        user_id: "u2".into(),
    })
    .await;
    room.snapshot_of(&["u2"]).await;
    room.sync().await;
    assert_eq!(room.media.created_for("u2"), 2);
    let second = room.media.generation_of("u2").unwrap();
    assert_ne!(first, second);

    room.media
        .emit_with_generation("u2", first, candidate("stale"))
        .await;
    room.media
        .emit_with_generation("u2", first, MediaEvent::Failed)
        .await;
    room.media.emit("u2", candidate("fresh")).await;

    eventually(|| room.signaling.candidates_to("u2") == 1).await;
    let snapshot = room.sync().await;
    assert_eq!(snapshot.sessions.len(), 1);
    assert_eq!(room.signaling.candidates_to("u2"), 1);
}

#[tokio::test]
async fn test_remote_tracks_populate_participant_media() {
    init_tracing();

    let room = TestRoom::new("u1");
    room.snapshot_of(&["u2"]).await;
    room.complete_offer("u2").await;

    for track in ["audio", "video"] {
        room.media
            .emit(
                "u2",
                MediaEvent::RemoteTrack {
                    stream_id: "s2".into(),
                    track_id: track.into(),
                },
            )
            .await;
    }

    let snapshot = room
        .wait_for(|s| {
            s.participant("u2")
                .and_then(|p| p.media_stream.as_ref())
                .is_some_and(|m| m.track_ids.len() == 2)
        })
        .await;
    assert_eq!(
        snapshot.participant("u2").unwrap().media_stream.as_ref().unwrap().stream_id,
        "s2"
    );
}

#[tokio::test]
async fn test_media_connected_completes_answering_session() {
    init_tracing();

    let room = TestRoom::new("u1");
    room.deliver(room.offer_from("u2", "v=0")).await;
    room.wait_for_state("u2", NegotiationState::Answering).await;

    room.media.emit("u2", MediaEvent::Connected).await;
    room.media.emit("u2", MediaEvent::Disconnected).await;

    room.wait_for_state("u2", NegotiationState::Connected).await;
}
