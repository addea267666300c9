use super::{Resource, fields};
use crate::core::{Decimal, RecordId, Reference, ResourceKind, Result};
use crate::storage::{InMemoryStorage, Table};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const TITLE_MAX_LEN: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: RecordId,
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    pub category: RecordId,
    pub instructor: RecordId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CourseDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    pub category: RecordId,
    pub instructor: RecordId,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoursePatch {
    #[serde(default, deserialize_with = "fields::present_value")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "fields::present_value")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "fields::present_value")]
    pub price: Option<Decimal>,
    #[serde(default, deserialize_with = "fields::present_value")]
    pub category: Option<RecordId>,
    #[serde(default, deserialize_with = "fields::present_value")]
    pub instructor: Option<RecordId>,
}

impl Resource for Course {
    const KIND: ResourceKind = ResourceKind::Course;

    type Draft = CourseDraft;
    type Patch = CoursePatch;

    fn id(&self) -> RecordId {
        self.id
    }

    fn from_draft(id: RecordId, draft: CourseDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            price: draft.price,
            created_at: now,
            category: draft.category,
            instructor: draft.instructor,
        }
    }

    fn replace(&mut self, draft: CourseDraft) {
        self.title = draft.title;
        self.description = draft.description;
        self.price = draft.price;
        self.category = draft.category;
        self.instructor = draft.instructor;
    }

    fn apply(&mut self, patch: CoursePatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(instructor) = patch.instructor {
            self.instructor = instructor;
        }
    }

    fn validate(&self) -> Result<()> {
        fields::required_text("title", &self.title, TITLE_MAX_LEN)
    }

    fn references(&self) -> Vec<Reference> {
        vec![
            Reference::new("category", ResourceKind::Category, self.category),
            Reference::new("instructor", ResourceKind::User, self.instructor),
        ]
    }

    fn table(storage: &InMemoryStorage) -> &Table<Self> {
        &storage.courses
    }

    fn table_mut(storage: &mut InMemoryStorage) -> &mut Table<Self> {
        &mut storage.courses
    }
}
