use huddle_client::{
    CoordinatorError, MediaAcquisitionError, NegotiationState, TrackReplacement, VideoSource,
};

use huddle_core::SdpKind;

use crate::integration::init_tracing;
use crate::utils::{MockMediaSource, SessionCall, TestRoom, eventually};

fn replaced_with(calls: &[SessionCall], prefix: &str) -> bool {
    calls.iter().any(|c| {
        matches!(c, SessionCall::ReplaceVideo(Some(id)) if id.starts_with(prefix))
    })
}

#[tokio::test]
async fn test_screen_share_replaces_track_on_every_session() {
    init_tracing();

    let room = TestRoom::new("u1");
    room.snapshot_of(&["u2", "u3"]).await;
    room.complete_offer("u2").await;

    assert!(room.handle.toggle_screen_share().await.unwrap());
    let snapshot = room.sync().await;

    assert!(snapshot.screen_sharing);
    assert_eq!(snapshot.local_media.source, VideoSource::Screen);
    assert!(snapshot.local_media.audio);
    assert!(replaced_with(&room.media.calls_for("u2"), "screen-"));
    assert!(replaced_with(&room.media.calls_for("u3"), "screen-"));
    assert_eq!(room.signaling.offers_to("u2").len(), 1);
    assert_eq!(room.signaling.offers_to("u3").len(), 1);
    assert_eq!(snapshot.sessions[0].state, NegotiationState::Connected);
    assert_eq!(snapshot.sessions[1].state, NegotiationState::Offering);

    assert!(!room.handle.toggle_screen_share().await.unwrap());
    let snapshot = room.sync().await;

    assert!(!snapshot.screen_sharing);
    assert_eq!(snapshot.local_media.source, VideoSource::Camera);
    assert!(replaced_with(&room.media.calls_for("u2"), "camera-"));
    assert_eq!(room.source.released(), vec![VideoSource::Screen]);
}

#[tokio::test]
async fn test_screen_share_renegotiates_when_replacement_is_not_enough() {
    init_tracing();

    let room = TestRoom::new("u1");
    room.snapshot_of(&["u2"]).await;
    room.complete_offer("u2").await;
    room.media.set_replacement(TrackReplacement::RenegotiationRequired);

    assert!(room.handle.toggle_screen_share().await.unwrap());
    let snapshot = room.wait_for_state("u2", NegotiationState::Offering).await;

    assert_eq!(snapshot.sessions.len(), 1);
    assert_eq!(room.media.created_for("u2"), 1);
    assert_eq!(room.signaling.offers_to("u2").len(), 2);

    room.deliver(room.answer_from("u2", "v=1")).await;
    room.wait_for_state("u2", NegotiationState::Connected).await;
}

#[tokio::test]
async fn test_negotiating_session_switches_to_screen_before_connecting() {
    init_tracing();

    let room = TestRoom::new("u1");
    room.snapshot_of(&["u2"]).await;
    room.wait_for_state("u2", NegotiationState::Offering).await;

    assert!(room.handle.toggle_screen_share().await.unwrap());
    room.complete_offer("u2").await;

    let calls = room.media.calls_for("u2");
    assert!(replaced_with(&calls, "screen-"));
    assert_eq!(calls.last(), Some(&SessionCall::ApplyRemote(SdpKind::Answer)));
    assert_eq!(room.signaling.offers_to("u2").len(), 1);
}

#[tokio::test]
async fn test_negotiating_session_renegotiates_once_connected() {
    init_tracing();

    let room = TestRoom::new("u1");
    room.snapshot_of(&["u2"]).await;
    room.wait_for_state("u2", NegotiationState::Offering).await;
    room.media.set_replacement(TrackReplacement::RenegotiationRequired);

    assert!(room.handle.toggle_screen_share().await.unwrap());
    room.sync().await;
    assert_eq!(room.signaling.offers_to("u2").len(), 1);

    room.deliver(room.answer_from("u2", "v=0")).await;
    eventually(|| room.signaling.offers_to("u2").len() == 2).await;

    let snapshot = room.wait_for_state("u2", NegotiationState::Offering).await;
    assert_eq!(snapshot.sessions.len(), 1);
    assert_eq!(room.media.created_for("u2"), 1);

    room.deliver(room.answer_from("u2", "v=1")).await;
    room.wait_for_state("u2", NegotiationState::Connected).await;
    assert_eq!(room.signaling.offers_to("u2").len(), 2);
}

#[tokio::test]
async fn test_sessions_opened_while_sharing_get_screen_video() {
    init_tracing();

    let room = TestRoom::new("u1");
    assert!(room.handle.toggle_screen_share().await.unwrap());

    room.snapshot_of(&["u2"]).await;
    room.wait_for_state("u2", NegotiationState::Offering).await;

    assert_eq!(
        room.media.calls_for("u2")[0],
        SessionCall::Attach {
            audio: true,
            video: true
        }
    );
}

#[tokio::test]
async fn test_denied_screen_capture_keeps_camera() {
    init_tracing();

    let room = TestRoom::with_source("u1", MockMediaSource::denying_screen());

    let result = room.handle.toggle_screen_share().await;

    assert!(matches!(
        result,
        Err(CoordinatorError::Media(MediaAcquisitionError::Denied(_)))
    ));
    let snapshot = room.sync().await;
    assert!(!snapshot.screen_sharing);
    assert_eq!(snapshot.local_media.source, VideoSource::Camera);
}
