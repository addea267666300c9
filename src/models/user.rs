use super::{Resource, fields};
use crate::core::{RecordId, ResourceKind, Result};
use crate::storage::{InMemoryStorage, Table};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const USERNAME_MAX_LEN: usize = 150;
pub const EMAIL_MAX_LEN: usize = 254;

/// Account referenced by courses (as instructor), enrollments and reviews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: RecordId,
    pub username: String,
    pub email: String,
    pub date_joined: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserDraft {
    pub username: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPatch {
    #[serde(default, deserialize_with = "fields::present_value")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "fields::present_value")]
    pub email: Option<String>,
}

impl Resource for User {
    const KIND: ResourceKind = ResourceKind::User;

    type Draft = UserDraft;
    type Patch = UserPatch;

    fn id(&self) -> RecordId {
        self.id
    }

    fn from_draft(id: RecordId, draft: UserDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            username: draft.username,
            email: draft.email,
            date_joined: now,
        }
    }

    fn replace(&mut self, draft: UserDraft) {
        self.username = draft.username;
        self.email = draft.email;
    }

    fn apply(&mut self, patch: UserPatch) {
        if let Some(username) = patch.username {
            self.username = username;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
    }

    fn validate(&self) -> Result<()> {
        fields::required_text("username", &self.username, USERNAME_MAX_LEN)?;
        fields::optional_email("email", &self.email, EMAIL_MAX_LEN)
    }

    fn table(storage: &InMemoryStorage) -> &Table<Self> {
        &storage.users
    }

    fn table_mut(storage: &mut InMemoryStorage) -> &mut Table<Self> {
        &mut storage.users
    }
}
