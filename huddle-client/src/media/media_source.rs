use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;
use webrtc::api::media_engine::{MIME_TYPE_OPUS, MIME_TYPE_VP8};
use webrtc::rtp_transceiver::rtp_codec::RTCRtpCodecCapability;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;

use crate::error::MediaAcquisitionError;
use crate::media::{LocalMedia, LocalTrack, VideoSource};

/// Access to local capture devices.
#[async_trait]
pub trait MediaSource: Send + Sync {
    /// Camera capture yields audio and video; screen capture yields video only.
    async fn acquire(&self, source: VideoSource) -> Result<LocalMedia, MediaAcquisitionError>;

    async fn release(&self, media: LocalMedia) {
        drop(media);
    }
}

/// Produces sample-fed tracks with no device behind them. Whoever holds the
/// tracks writes frames into them.
pub struct SyntheticMediaSource {
    stream_id: String,
}

impl SyntheticMediaSource {
    pub fn new() -> Self {
        Self {
            stream_id: Uuid::new_v4().to_string(),
        }
    }

    fn track(&self, mime_type: &str, kind: &str) -> LocalTrack {
        Arc::new(TrackLocalStaticSample::new(
            RTCRtpCodecCapability {
                mime_type: mime_type.to_owned(),
                ..Default::default()
            },
            format!("{}-{}", kind, Uuid::new_v4()),
            self.stream_id.clone(),
        ))
    }
}

impl Default for SyntheticMediaSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaSource for SyntheticMediaSource {
    async fn acquire(&self, source: VideoSource) -> Result<LocalMedia, MediaAcquisitionError> {
        debug!("Creating synthetic {:?} tracks", source);
        let media = match source {
            VideoSource::Camera => LocalMedia::new(
                Some(self.track(MIME_TYPE_OPUS, "audio")),
                Some(self.track(MIME_TYPE_VP8, "camera")),
                source,
            ),
            VideoSource::Screen => {
                LocalMedia::new(None, Some(self.track(MIME_TYPE_VP8, "screen")), source)
            }
        };
        Ok(media)
    }
}

/// A source with no devices at all, for receive-only participation.
pub struct NoMediaSource;

#[async_trait]
impl MediaSource for NoMediaSource {
    async fn acquire(&self, source: VideoSource) -> Result<LocalMedia, MediaAcquisitionError> {
        Err(MediaAcquisitionError::Unavailable(format!(
            "no {:?} device configured",
            source
        )))
    }
}
