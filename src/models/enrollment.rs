use super::{Resource, fields};
use crate::core::{RecordId, Reference, ResourceKind, Result};
use crate::storage::{InMemoryStorage, Table};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const STATUS_MAX_LEN: usize = 20;
pub const DEFAULT_STATUS: &str = "active";

/// Link between a user and a course.
///
/// Nothing stops a user from enrolling in the same course twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: RecordId,
    pub user: RecordId,
    pub course: RecordId,
    pub enrollment_date: DateTime<Utc>,
    pub status: String,
}

fn default_status() -> String {
    DEFAULT_STATUS.to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnrollmentDraft {
    pub user: RecordId,
    pub course: RecordId,
    #[serde(default = "default_status")]
    pub status: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnrollmentPatch {
    #[serde(default, deserialize_with = "fields::present_value")]
    pub user: Option<RecordId>,
    #[serde(default, deserialize_with = "fields::present_value")]
    pub course: Option<RecordId>,
    #[serde(default, deserialize_with = "fields::present_value")]
    pub status: Option<String>,
}

impl Resource for Enrollment {
    const KIND: ResourceKind = ResourceKind::Enrollment;

    type Draft = EnrollmentDraft;
    type Patch = EnrollmentPatch;

    fn id(&self) -> RecordId {
        self.id
    }

    fn from_draft(id: RecordId, draft: EnrollmentDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user: draft.user,
            course: draft.course,
            enrollment_date: now,
            status: draft.status,
        }
    }

    fn replace(&mut self, draft: EnrollmentDraft) {
        self.user = draft.user;
        self.course = draft.course;
        self.status = draft.status;
    }

    fn apply(&mut self, patch: EnrollmentPatch) {
        if let Some(user) = patch.user {
            self.user = user;
        }
        if let Some(course) = patch.course {
            self.course = course;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }

    fn validate(&self) -> Result<()> {
        fields::max_length("status", &self.status, STATUS_MAX_LEN)
    }

    fn references(&self) -> Vec<Reference> {
        vec![
            Reference::new("user", ResourceKind::User, self.user),
            Reference::new("course", ResourceKind::Course, self.course),
        ]
    }

    fn table(storage: &InMemoryStorage) -> &Table<Self> {
        &storage.enrollments
    }

    fn table_mut(storage: &mut InMemoryStorage) -> &mut Table<Self> {
        &mut storage.enrollments
    }
}
