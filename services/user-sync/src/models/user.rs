//! User model and its wire representations

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User entity as held by the local store
///
/// Every field except `id` is resolved: values missing on the wire are stored
/// as an empty string or zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, FromRow)]
pub struct UserRecord {
    /// Server-assigned identifier, `None` until the record has been synced
    #[sqlx(rename = "user_id")]
    pub id: Option<i64>,
    pub full_name: String,
    pub email: String,
    pub profile_pic_url: String,
    pub phone: String,
    pub address: String,
    pub birth_date: String,
    pub gender: String,
    pub designation: String,
    pub salary: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// User as it appears inside a response envelope
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteUser {
    pub id: Option<i64>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub profile_pic_url: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[serde(rename = "dob")]
    pub birth_date: Option<String>,
    pub gender: Option<String>,
    pub designation: Option<String>,
    pub salary: Option<i64>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl From<RemoteUser> for UserRecord {
    fn from(user: RemoteUser) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name.unwrap_or_default(),
            email: user.email.unwrap_or_default(),
            profile_pic_url: user.profile_pic_url.unwrap_or_default(),
            phone: user.phone.unwrap_or_default(),
            address: user.address.unwrap_or_default(),
            birth_date: user.birth_date.unwrap_or_default(),
            gender: user.gender.unwrap_or_default(),
            designation: user.designation.unwrap_or_default(),
            salary: user.salary.unwrap_or_default(),
            created_at: user.created_at.unwrap_or_default(),
            updated_at: user.updated_at.unwrap_or_default(),
        }
    }
}

/// Envelope returned by both user endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListResponse {
    pub status: bool,
    pub data: Option<Vec<RemoteUser>>,
}

impl ListResponse {
    /// Resolve the carried users into store records, in response order
    pub fn into_records(self) -> Vec<UserRecord> {
        self.data
            .unwrap_or_default()
            .into_iter()
            .map(UserRecord::from)
            .collect()
    }
}

/// New user creation payload
///
/// Serializes to the body of `POST /user`. Fields left at their default go
/// out as `""` and `0`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDraft {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    #[serde(rename = "dob")]
    pub birth_date: String,
    pub gender: String,
    pub designation: String,
    pub salary: i64,
}

impl From<&UserRecord> for UserDraft {
    fn from(record: &UserRecord) -> Self {
        Self {
            full_name: record.full_name.clone(),
            email: record.email.clone(),
            phone: record.phone.clone(),
            address: record.address.clone(),
            birth_date: record.birth_date.clone(),
            gender: record.gender.clone(),
            designation: record.designation.clone(),
            salary: record.salary,
        }
    }
}
