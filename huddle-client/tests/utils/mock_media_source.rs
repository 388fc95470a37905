use async_trait::async_trait;
use huddle_client::{
    LocalMedia, MediaAcquisitionError, MediaSource, SyntheticMediaSource, VideoSource,
};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Synthetic tracks with switchable permissions and a release counter.
#[derive(Default)]
pub struct MockMediaSource {
    inner: SyntheticMediaSource,
    deny_camera: bool,
    deny_screen: bool,
    releases: AtomicUsize,
    released: Mutex<Vec<VideoSource>>,
}

impl MockMediaSource {
    pub fn granting() -> Self {
        Self::default()
    }

    pub fn denying() -> Self {
        Self {
            deny_camera: true,
            deny_screen: true,
            ..Default::default()
        }
    }

    pub fn denying_screen() -> Self {
        Self {
            deny_screen: true,
            ..Default::default()
        }
    }

    pub fn release_count(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> Vec<VideoSource> {
        self.released.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaSource for MockMediaSource {
    async fn acquire(&self, source: VideoSource) -> Result<LocalMedia, MediaAcquisitionError> {
        let denied = match source {
            VideoSource::Camera => self.deny_camera,
            VideoSource::Screen => self.deny_screen,
        };
        if denied {
            return Err(MediaAcquisitionError::Denied(format!("{:?}", source)));
        }
        self.inner.acquire(source).await
    }

    async fn release(&self, media: LocalMedia) {
        self.releases.fetch_add(1, Ordering::SeqCst);
        self.released.lock().unwrap().push(media.source());
    }
}
