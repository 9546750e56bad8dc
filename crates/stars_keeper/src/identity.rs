//! Deterministic identifiers for star records.
//!
//! A star is identified by the repository it points at and the moment it was
//! created. Hashing that pair gives a stable primary key, so re-running a sync
//! overwrites existing rows instead of duplicating them.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};

/// How the canonical input is turned into an identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityScheme {
    /// Hex-encoded SHA-512 digest of the canonical input.
    #[default]
    Digest,
    /// Hex of the canonical input bytes followed by the digest.
    ///
    /// Matches identifiers written by earlier releases; only useful when an
    /// existing database must keep its primary keys.
    Legacy,
}

impl IdentityScheme {
    /// Derive the identifier for a star on `repository_id` created at `starred_at`.
    pub fn identity(self, repository_id: i64, starred_at: &DateTime<Utc>) -> String {
        let input = canonical_input(repository_id, starred_at);
        let digest = Sha512::digest(input.as_bytes());

        match self {
            Self::Digest => hex::encode(digest),
            Self::Legacy => {
                let mut bytes = input.into_bytes();
                bytes.extend_from_slice(&digest);
                hex::encode(bytes)
            }
        }
    }
}

impl std::fmt::Display for IdentityScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Digest => write!(f, "digest"),
            Self::Legacy => write!(f, "legacy"),
        }
    }
}

/// Format a timestamp the way it is stored and hashed (RFC 3339, whole seconds, `Z`).
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Build the canonical hash input: `"<repository_id>:<starred_at>"`.
pub fn canonical_input(repository_id: i64, starred_at: &DateTime<Utc>) -> String {
    format!("{}:{}", repository_id, format_timestamp(starred_at))
}

/// Derive a star identifier with the default [`IdentityScheme::Digest`] scheme.
pub fn identity(repository_id: i64, starred_at: &DateTime<Utc>) -> String {
    IdentityScheme::Digest.identity(repository_id, starred_at)
}
