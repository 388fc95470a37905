use huddle_client::{ChannelEvent, ConnectionStatus, MediaEvent, NegotiationState};

use crate::integration::init_tracing;
use crate::utils::{SessionCall, TestRoom, participant_ids, session_ids};

#[tokio::test]
async fn test_next_snapshot_reconciles_after_reconnect() {
    init_tracing();

    let room = TestRoom::new("u1");
    room.connect().await;
    room.snapshot_of(&["u2", "u3"]).await;
    room.complete_offer("u2").await;
    room.media
        .emit(
            "u2",
            MediaEvent::RemoteTrack {
                stream_id: "s2".into(),
                track_id: "t".into(),
            },
        )
        .await;
    room.wait_for(|s| {
        s.participant("u2")
            .is_some_and(|p| p.media_stream.is_some())
    })
    .await;

    room.event(ChannelEvent::ConnectionLost).await;
    let snapshot = room
        .wait_for(|s| s.status == ConnectionStatus::Reconnecting)
        .await;

    assert!(snapshot.sessions.is_empty());
    assert_eq!(participant_ids(&snapshot), vec!["u2", "u3"]);
    assert!(snapshot.participants.iter().all(|p| p.media_stream.is_none()));
    assert_eq!(room.media.calls_for("u2").last(), Some(&SessionCall::Close));
    assert_eq!(room.media.calls_for("u3").last(), Some(&SessionCall::Close));

    room.connect().await;
    room.snapshot_of(&["u3", "u4"]).await;
    let snapshot = room.sync().await;

    assert_eq!(snapshot.status, ConnectionStatus::Connected);
    assert_eq!(participant_ids(&snapshot), vec!["u3", "u4"]);
    assert_eq!(session_ids(&snapshot), vec!["u3", "u4"]);
    assert!(
        snapshot
            .sessions
            .iter()
            .all(|s| s.state == NegotiationState::Offering)
    );
    assert_eq!(room.media.created_for("u2"), 1);
    assert_eq!(room.media.created_for("u3"), 2);
    assert_eq!(room.signaling.offers_to("u3").len(), 2);
}

#[tokio::test]
async fn test_unchanged_roster_is_renegotiated_after_reconnect() {
    init_tracing();

    let room = TestRoom::new("u1");
    room.snapshot_of(&["u2"]).await;
    room.complete_offer("u2").await;

    room.event(ChannelEvent::ConnectionLost).await;
    room.connect().await;
    room.snapshot_of(&["u2"]).await;
    let snapshot = room.sync().await;

    assert_eq!(session_ids(&snapshot), vec!["u2"]);
    assert_eq!(snapshot.sessions[0].state, NegotiationState::Offering);
    assert_eq!(room.media.created_for("u2"), 2);
}
