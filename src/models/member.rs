use chrono::{DateTime, Utc};
use serde::Serialize;

/// A registered member of the group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: i64,                          // ⇔ members.id
    pub full_name: String,                // ⇔ members.full_name
    pub community_number: Option<String>, // ⇔ members.community_number (NULL = none)
    pub qr_code: String,                  // ⇔ members.qr_code (UNIQUE)
    pub created_at: DateTime<Utc>,        // ⇔ members.created_at (RFC 3339, UTC)
}

/// Fields accepted when registering or editing a member.
#[derive(Debug, Clone, Default)]
pub struct MemberInput {
    pub full_name: String,
    pub community_number: Option<String>,
}

impl MemberInput {
    pub fn new(full_name: impl Into<String>, community_number: Option<String>) -> Self {
        Self {
            full_name: full_name.into(),
            community_number,
        }
    }
}

/// Directory filters offered by the admin listing.
#[derive(Debug, Clone, Default)]
pub struct MemberFilter {
    /// Exact community label.
    pub community: Option<String>,
    /// Case-insensitive substring of the full name.
    pub search: Option<String>,
}

impl MemberFilter {
    pub fn matches(&self, member: &Member) -> bool {
        if let Some(c) = &self.community
            && member.community_number.as_deref() != Some(c.as_str())
        {
            return false;
        }

        if let Some(q) = &self.search {
            let q = q.trim().to_lowercase();
            if !q.is_empty() && !member.full_name.to_lowercase().contains(&q) {
                return false;
            }
        }

        true
    }
}
