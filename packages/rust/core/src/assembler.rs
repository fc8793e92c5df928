//! Response assembly: canonical profile + contacts → reply shape.

use serde::Serialize;
use tracing::warn;

use profilescout_shared::{CanonicalProfile, ContactSet, RawPageSnapshot, Resolved, Result};

use crate::pipeline::{Extraction, extract};

/// The only error text a caller ever sees; details stay in the logs.
pub const UNAVAILABLE_MESSAGE: &str = "profile is temporarily unavailable, try again later";

/// Reply for one profile request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ProfileResponse {
    Success(Box<ProfileReply>),
    Failure(FailureReply),
}

/// Success body. Unknown fields serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileReply {
    ok: bool,
    pub username: String,
    pub full_name: Resolved<String>,
    pub biography: Resolved<String>,
    pub external_url: Resolved<String>,
    pub profile_pic_url: Resolved<String>,
    pub is_private: Resolved<bool>,
    pub is_verified: Resolved<bool>,
    pub followers: Resolved<u64>,
    pub following: Resolved<u64>,
    pub posts_count: Resolved<u64>,
    pub emails_found: Vec<String>,
    pub phones_found: Vec<String>,
}

/// Failure body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureReply {
    ok: bool,
    pub error: String,
}

impl ProfileReply {
    pub fn new(username: &str, profile: CanonicalProfile, contacts: ContactSet) -> Self {
        Self {
            ok: true,
            username: username.to_string(),
            full_name: profile.full_name,
            biography: profile.bio_text,
            external_url: profile.external_url,
            profile_pic_url: profile.profile_pic_url,
            is_private: profile.is_private,
            is_verified: profile.is_verified,
            followers: profile.followers_count,
            following: profile.following_count,
            posts_count: profile.posts_count,
            emails_found: contacts.emails,
            phones_found: contacts.phones,
        }
    }
}

impl ProfileResponse {
    /// Failure reply carrying `message`.
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure(FailureReply {
            ok: false,
            error: message.into(),
        })
    }

    /// Generic service-unavailable reply.
    pub fn unavailable() -> Self {
        Self::failure(UNAVAILABLE_MESSAGE)
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Build the reply for `username` from whatever the fetch step produced.
///
/// Partial data is a success. The reply is a failure only when no snapshot
/// exists, or when the snapshot came with a fetch warning and no reader
/// could extract anything from it.
pub fn assemble(username: &str, fetched: Result<RawPageSnapshot>) -> ProfileResponse {
    let snapshot = match fetched {
        Ok(snapshot) => snapshot,
        Err(e) => {
            warn!(username, error = %e, "page fetch failed");
            return ProfileResponse::unavailable();
        }
    };

    let Extraction {
        fragments,
        profile,
        contacts,
    } = extract(&snapshot);

    if let Some(warning) = &snapshot.fetch_warning {
        if fragments.all_empty() {
            warn!(username, %warning, "page unusable after fetch warning");
            return ProfileResponse::unavailable();
        }
    }

    ProfileResponse::Success(Box::new(ProfileReply::new(username, profile, contacts)))
}
