use std::collections::HashSet;

use huddle_core::{ParticipantId, ParticipantInfo};
use tracing::debug;

use crate::media::RemoteStream;
use crate::roster::Participant;

/// Membership delta produced by a roster snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationResult {
    pub added: Vec<ParticipantId>,
    pub removed: Vec<ParticipantId>,
}

impl ReconciliationResult {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Known remote participants of the current room, in join order. The local
/// participant is never tracked.
pub struct RosterTracker {
    local_id: ParticipantId,
    participants: Vec<Participant>,
}

impl RosterTracker {
    pub fn new(local_id: ParticipantId) -> Self {
        Self {
            local_id,
            participants: Vec::new(),
        }
    }

    /// Replaces the membership wholesale. Entries that survive keep their
    /// toggles and media; their name and avatar are refreshed.
    pub fn apply_snapshot(&mut self, users: Vec<ParticipantInfo>) -> ReconciliationResult {
        let mut seen = HashSet::new();
        let users: Vec<ParticipantInfo> = users
            .into_iter()
            .filter(|u| u.user_id != self.local_id)
            .filter(|u| seen.insert(u.user_id.clone()))
            .collect();

        let mut result = ReconciliationResult::default();

        self.participants.retain(|p| {
            let keep = seen.contains(&p.id);
            if !keep {
                result.removed.push(p.id.clone());
            }
            keep
        });

        for info in users {
            match self.participants.iter_mut().find(|p| p.id == info.user_id) {
                Some(existing) => {
                    existing.display_name = info.user_name;
                    existing.avatar_url = info.img_url;
                }
                None => {
                    result.added.push(info.user_id.clone());
                    self.participants.push(info.into());
                }
            }
        }

        debug!(
            "Roster snapshot applied: +{:?} -{:?}",
            result.added, result.removed
        );
        result
    }

    /// Returns `true` if the participant was not known before.
    pub fn apply_join(&mut self, info: ParticipantInfo) -> bool {
        if info.user_id == self.local_id || self.contains(&info.user_id) {
            return false;
        }
        self.participants.push(info.into());
        true
    }

    /// Returns `true` if the participant was known.
    pub fn apply_leave(&mut self, id: &ParticipantId) -> bool {
        let before = self.participants.len();
        self.participants.retain(|p| &p.id != id);
        self.participants.len() != before
    }

    pub fn toggle_pin(&mut self, id: &ParticipantId) -> bool {
        self.update(id, |p| p.pinned = !p.pinned)
    }

    pub fn toggle_audio(&mut self, id: &ParticipantId) -> bool {
        self.update(id, |p| p.audio_enabled = !p.audio_enabled)
    }

    pub fn toggle_video(&mut self, id: &ParticipantId) -> bool {
        self.update(id, |p| p.video_enabled = !p.video_enabled)
    }

    /// Records a remote track. Tracks of the same stream accumulate; a new
    /// stream id replaces the previous reference.
    pub fn set_media(&mut self, id: &ParticipantId, stream_id: String, track_id: String) -> bool {
        self.update(id, |p| match &mut p.media_stream {
            Some(stream) if stream.stream_id == stream_id => {
                if !stream.track_ids.contains(&track_id) {
                    stream.track_ids.push(track_id);
                }
            }
            slot => {
                *slot = Some(RemoteStream {
                    stream_id,
                    track_ids: vec![track_id],
                })
            }
        })
    }

    pub fn clear_media(&mut self, id: &ParticipantId) -> bool {
        self.update(id, |p| p.media_stream = None)
    }

    pub fn clear_all_media(&mut self) {
        for p in &mut self.participants {
            p.media_stream = None;
        }
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn get(&self, id: &ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| &p.id == id)
    }

    pub fn ids(&self) -> Vec<ParticipantId> {
        self.participants.iter().map(|p| p.id.clone()).collect()
    }

    pub fn contains(&self, id: &ParticipantId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    fn update(&mut self, id: &ParticipantId, f: impl FnOnce(&mut Participant)) -> bool {
        let Some(participant) = self.participants.iter_mut().find(|p| &p.id == id) else {
            return false;
        };
        f(participant);
        true
    }
}
