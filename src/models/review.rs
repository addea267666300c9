use super::{Resource, fields};
use crate::core::{RecordId, Reference, ResourceKind, Result};
use crate::storage::{InMemoryStorage, Table};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: RecordId,
    pub user: RecordId,
    pub course: RecordId,
    pub rating: u32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewDraft {
    pub user: RecordId,
    pub course: RecordId,
    pub rating: u32,
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewPatch {
    #[serde(default, deserialize_with = "fields::present_value")]
    pub user: Option<RecordId>,
    #[serde(default, deserialize_with = "fields::present_value")]
    pub course: Option<RecordId>,
    #[serde(default, deserialize_with = "fields::present_value")]
    pub rating: Option<u32>,
    #[serde(default, deserialize_with = "fields::present_value")]
    pub comment: Option<String>,
}

impl Resource for Review {
    const KIND: ResourceKind = ResourceKind::Review;

    type Draft = ReviewDraft;
    type Patch = ReviewPatch;

    fn id(&self) -> RecordId {
        self.id
    }

    fn from_draft(id: RecordId, draft: ReviewDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user: draft.user,
            course: draft.course,
            rating: draft.rating,
            comment: draft.comment,
            created_at: now,
        }
    }

    fn replace(&mut self, draft: ReviewDraft) {
        self.user = draft.user;
        self.course = draft.course;
        self.rating = draft.rating;
        self.comment = draft.comment;
    }

    fn apply(&mut self, patch: ReviewPatch) {
        if let Some(user) = patch.user {
            self.user = user;
        }
        if let Some(course) = patch.course {
            self.course = course;
        }
        if let Some(rating) = patch.rating {
            self.rating = rating;
        }
        if let Some(comment) = patch.comment {
            self.comment = comment;
        }
    }

    // Rating range and one-review-per-user are left open.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn references(&self) -> Vec<Reference> {
        vec![
            Reference::new("user", ResourceKind::User, self.user),
            Reference::new("course", ResourceKind::Course, self.course),
        ]
    }

    fn table(storage: &InMemoryStorage) -> &Table<Self> {
        &storage.reviews
    }

    fn table_mut(storage: &mut InMemoryStorage) -> &mut Table<Self> {
        &mut storage.reviews
    }
}
