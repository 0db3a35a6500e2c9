//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// An identified participant, as listed by `GET /api/participants`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantDto {
    pub id: String,
    pub name: String,
    /// RFC 3339 (UTC)
    pub joined_at: String,
}
