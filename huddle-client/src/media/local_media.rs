use std::sync::Arc;

use webrtc::track::track_local::TrackLocal;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;

pub type LocalTrack = Arc<TrackLocalStaticSample>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VideoSource {
    #[default]
    Camera,
    Screen,
}

/// The local capture handle. Shared read-only by every peer session; only the
/// coordinator swaps or releases it.
#[derive(Clone)]
pub struct LocalMedia {
    audio: Option<LocalTrack>,
    video: Option<LocalTrack>,
    source: VideoSource,
}

impl LocalMedia {
    pub fn new(audio: Option<LocalTrack>, video: Option<LocalTrack>, source: VideoSource) -> Self {
        Self {
            audio,
            video,
            source,
        }
    }

    pub fn audio(&self) -> Option<&LocalTrack> {
        self.audio.as_ref()
    }

    pub fn video(&self) -> Option<&LocalTrack> {
        self.video.as_ref()
    }

    pub fn source(&self) -> VideoSource {
        self.source
    }

    /// Same audio, different video.
    pub fn with_video(&self, video: Option<LocalTrack>, source: VideoSource) -> Self {
        Self {
            audio: self.audio.clone(),
            video,
            source,
        }
    }
}

impl std::fmt::Debug for LocalMedia {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalMedia")
            .field("audio", &self.audio.as_ref().map(|t| t.id().to_owned()))
            .field("video", &self.video.as_ref().map(|t| t.id().to_owned()))
            .field("source", &self.source)
            .finish()
    }
}
