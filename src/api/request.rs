use crate::errors::{AppError, AppResult};
use serde::Deserialize;

/// Member ids arrive either as numbers or as numeric strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum IdValue {
    Number(i64),
    Text(String),
}

impl IdValue {
    pub fn parse(&self, field: &str) -> AppResult<i64> {
        match self {
            IdValue::Number(n) => Ok(*n),
            IdValue::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| AppError::Validation(format!("{field} must be an integer"))),
        }
    }
}

/// Parse a required id field.
pub(crate) fn required_id(value: &Option<IdValue>, field: &str) -> AppResult<i64> {
    value
        .as_ref()
        .ok_or_else(|| AppError::Validation(format!("{field} is required")))?
        .parse(field)
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(
    tag = "action",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum ApiRequest {
    /// Scanner check-in, optionally retroactive (`date` = `DD/MM/YYYY`).
    CheckIn {
        #[serde(default)]
        qr_code: Option<String>,
        #[serde(default)]
        date: Option<String>,
    },
    ListMembers {
        #[serde(default)]
        community: Option<String>,
        #[serde(default)]
        search: Option<String>,
    },
    CreateMember {
        #[serde(default)]
        full_name: Option<String>,
        #[serde(default)]
        community_number: Option<String>,
    },
    UpdateMember {
        #[serde(default)]
        id: Option<IdValue>,
        #[serde(default)]
        full_name: Option<String>,
        #[serde(default)]
        community_number: Option<String>,
    },
    DeleteMember {
        #[serde(default)]
        id: Option<IdValue>,
    },
    DeleteAttendance {
        #[serde(default)]
        user_id: Option<IdValue>,
        #[serde(default)]
        date: Option<String>,
    },
    AttendanceReport,
    /// Monthly matrix; `month` is zero-based, `today` is `DD/MM/YYYY`.
    AttendanceMatrix {
        year: i32,
        month: u32,
        #[serde(default)]
        today: Option<String>,
    },
}

impl ApiRequest {
    pub fn from_json(raw: &str) -> AppResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Message returned when the operation fails for an internal reason.
    pub(crate) fn failure_message(&self) -> &'static str {
        match self {
            ApiRequest::CheckIn { .. } => "Error logging attendance",
            ApiRequest::ListMembers { .. } => "Error fetching users",
            ApiRequest::CreateMember { .. } => "Error creating user",
            ApiRequest::UpdateMember { .. } => "Error updating user",
            ApiRequest::DeleteMember { .. } => "Error deleting user",
            ApiRequest::DeleteAttendance { .. } => "Error deleting attendance",
            ApiRequest::AttendanceReport | ApiRequest::AttendanceMatrix { .. } => {
                "Error fetching attendance data"
            }
        }
    }
}
