use super::{Resource, fields};
use crate::core::{RecordId, Reference, ResourceKind, Result};
use crate::storage::{InMemoryStorage, Table};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const TITLE_MAX_LEN: usize = 200;
pub const VIDEO_URL_MAX_LEN: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: RecordId,
    pub title: String,
    pub content: String,
    pub video_url: String,
    /// Position of the lesson inside its course.
    pub order: u32,
    pub course: RecordId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LessonDraft {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub video_url: String,
    #[serde(default)]
    pub order: u32,
    pub course: RecordId,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LessonPatch {
    #[serde(default, deserialize_with = "fields::present_value")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "fields::present_value")]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "fields::present_value")]
    pub video_url: Option<String>,
    #[serde(default, deserialize_with = "fields::present_value")]
    pub order: Option<u32>,
    #[serde(default, deserialize_with = "fields::present_value")]
    pub course: Option<RecordId>,
}

impl Resource for Lesson {
    const KIND: ResourceKind = ResourceKind::Lesson;

    type Draft = LessonDraft;
    type Patch = LessonPatch;

    fn id(&self) -> RecordId {
        self.id
    }

    fn from_draft(id: RecordId, draft: LessonDraft, _now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            content: draft.content,
            video_url: draft.video_url,
            order: draft.order,
            course: draft.course,
        }
    }

    fn replace(&mut self, draft: LessonDraft) {
        self.title = draft.title;
        self.content = draft.content;
        self.video_url = draft.video_url;
        self.order = draft.order;
        self.course = draft.course;
    }

    fn apply(&mut self, patch: LessonPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(video_url) = patch.video_url {
            self.video_url = video_url;
        }
        if let Some(order) = patch.order {
            self.order = order;
        }
        if let Some(course) = patch.course {
            self.course = course;
        }
    }

    fn validate(&self) -> Result<()> {
        fields::required_text("title", &self.title, TITLE_MAX_LEN)?;
        fields::optional_url("video_url", &self.video_url, VIDEO_URL_MAX_LEN)
    }

    fn references(&self) -> Vec<Reference> {
        vec![Reference::new("course", ResourceKind::Course, self.course)]
    }

    fn table(storage: &InMemoryStorage) -> &Table<Self> {
        &storage.lessons
    }

    fn table_mut(storage: &mut InMemoryStorage) -> &mut Table<Self> {
        &mut storage.lessons
    }
}
