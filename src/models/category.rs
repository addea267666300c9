use super::{Resource, fields};
use crate::core::{RecordId, ResourceKind, Result};
use crate::storage::{InMemoryStorage, Table};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const NAME_MAX_LEN: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: RecordId,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryPatch {
    #[serde(default, deserialize_with = "fields::present_value")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "fields::present_value")]
    pub description: Option<String>,
}

impl Resource for Category {
    const KIND: ResourceKind = ResourceKind::Category;

    type Draft = CategoryDraft;
    type Patch = CategoryPatch;

    fn id(&self) -> RecordId {
        self.id
    }

    fn from_draft(id: RecordId, draft: CategoryDraft, _now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
        }
    }

    fn replace(&mut self, draft: CategoryDraft) {
        self.name = draft.name;
        self.description = draft.description;
    }

    fn apply(&mut self, patch: CategoryPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
    }

    fn validate(&self) -> Result<()> {
        fields::required_text("name", &self.name, NAME_MAX_LEN)
    }

    fn table(storage: &InMemoryStorage) -> &Table<Self> {
        &storage.categories
    }

    fn table_mut(storage: &mut InMemoryStorage) -> &mut Table<Self> {
        &mut storage.categories
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_defaults_to_empty() {
        let draft: CategoryDraft = serde_json::from_str(r#"{"name":"Science"}"#).unwrap();
        let category = Category::from_draft(1, draft, Utc::now());
        assert_eq!(category.description, "");
        assert!(category.validate().is_ok());
    }

    #[test]
    fn missing_name_fails_to_deserialize() {
        let parsed = serde_json::from_str::<CategoryDraft>(r#"{"description":"x"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn id_in_payload_is_ignored() {
        let draft: CategoryDraft = serde_json::from_str(r#"{"id":42,"name":"Art"}"#).unwrap();
        let category = Category::from_draft(3, draft, Utc::now());
        assert_eq!(category.id, 3);
    }
}
