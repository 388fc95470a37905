use crate::integration::init_tracing;
use crate::utils::TestRoom;

#[tokio::test]
async fn test_toggles_change_flags_not_membership() {
    init_tracing();

    let room = TestRoom::new("u1");
    room.snapshot_of(&["u2", "u3"]).await;
    room.sync().await;

    assert!(room.handle.toggle_pin("u2".into()).await.unwrap());
    assert!(room.handle.toggle_audio("u2".into()).await.unwrap());
    assert!(room.handle.toggle_video("u3".into()).await.unwrap());
    assert!(room.handle.toggle_video("u3".into()).await.unwrap());
    assert!(!room.handle.toggle_pin("u9".into()).await.unwrap());

    let snapshot = room.sync().await;
    let u2 = snapshot.participant("u2").unwrap();
    assert!(u2.pinned);
    assert!(!u2.audio_enabled);
    assert!(u2.video_enabled);

    let u3 = snapshot.participant("u3").unwrap();
    assert!(!u3.pinned);
    assert!(u3.video_enabled);

    assert_eq!(snapshot.participants.len(), 2);
}
