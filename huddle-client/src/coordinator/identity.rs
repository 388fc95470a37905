use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use huddle_core::{LocalIdentity, ParticipantId};
use serde::{Deserialize, Serialize};

use crate::error::IdentityError;

pub const DEFAULT_DISPLAY_NAME: &str = "Anonymous";

/// Identity as supplied by the auth collaborator, before resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentitySource {
    #[serde(default)]
    pub id: Option<ParticipantId>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub access_credential: Option<String>,
}

impl IdentitySource {
    /// Explicit id first, then the credential's `user_id` or `sub` claim.
    pub fn resolve(&self) -> Result<LocalIdentity, IdentityError> {
        let id = match (&self.id, &self.access_credential) {
            (Some(id), _) => id.clone(),
            (None, Some(credential)) => claimed_id(credential)?,
            (None, None) => return Err(IdentityError::Unresolved),
        };

        Ok(LocalIdentity {
            id,
            display_name: self
                .display_name
                .clone()
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_owned()),
            avatar_url: self.avatar_url.clone().unwrap_or_default(),
            access_credential: self.access_credential.clone(),
        })
    }
}

/// Reads the participant id out of a JWT payload. The signature is not
/// checked; the server does that when the credential is presented.
fn claimed_id(credential: &str) -> Result<ParticipantId, IdentityError> {
    let mut parts = credential.split('.');
    let (Some(_), Some(payload), Some(_)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(IdentityError::MalformedCredential(
            "expected three dot-separated segments".into(),
        ));
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| IdentityError::MalformedCredential(e.to_string()))?;
    let claims: serde_json::Value = serde_json::from_slice(&bytes)
        .map_err(|e| IdentityError::MalformedCredential(e.to_string()))?;

    ["user_id", "sub"]
        .iter()
        .find_map(|key| match claims.get(*key)? {
            serde_json::Value::String(s) if !s.is_empty() => Some(ParticipantId::from(s.as_str())),
            serde_json::Value::Number(n) => Some(ParticipantId::from(n.to_string())),
            _ => None,
        })
        .ok_or(IdentityError::Unresolved)
}
