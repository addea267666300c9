//! Record types served by the gateway.
//!
//! Every record type declares its wire shape explicitly: the stored record,
//! the full payload accepted by create/replace (`Draft`) and the partial
//! payload accepted by partial update (`Patch`). Server-assigned fields
//! (`id`, timestamps) never appear in a draft or patch, so clients cannot
//! write them; unknown payload fields are ignored.

pub mod category;
pub mod course;
pub mod enrollment;
pub mod fields;
pub mod lesson;
pub mod review;
pub mod user;

pub use category::{Category, CategoryDraft, CategoryPatch};
pub use course::{Course, CourseDraft, CoursePatch};
pub use enrollment::{Enrollment, EnrollmentDraft, EnrollmentPatch};
pub use lesson::{Lesson, LessonDraft, LessonPatch};
pub use review::{Review, ReviewDraft, ReviewPatch};
pub use user::{User, UserDraft, UserPatch};

use crate::core::{RecordId, RecordRef, Reference, ResourceKind, Result};
use crate::storage::{InMemoryStorage, Table};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::Debug;

/// A record type registered with the gateway.
///
/// The associated table accessors are the registry: they pair the record
/// type with the table that stores it, so generic code never dispatches on
/// a runtime type name.
pub trait Resource:
    Clone + Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    const KIND: ResourceKind;

    type Draft: DeserializeOwned + Send + 'static;
    type Patch: DeserializeOwned + Send + 'static;

    fn id(&self) -> RecordId;

    /// Builds a new record from a full payload. `now` feeds server-assigned timestamps.
    fn from_draft(id: RecordId, draft: Self::Draft, now: DateTime<Utc>) -> Self;

    /// Overwrites every writable field.
    fn replace(&mut self, draft: Self::Draft);

    /// Overwrites the writable fields present in the patch.
    fn apply(&mut self, patch: Self::Patch);

    /// Field-level rules (blank, length, format).
    fn validate(&self) -> Result<()>;

    /// Foreign keys held by this record.
    fn references(&self) -> Vec<Reference> {
        Vec::new()
    }

    fn table(storage: &InMemoryStorage) -> &Table<Self>;

    fn table_mut(storage: &mut InMemoryStorage) -> &mut Table<Self>;

    fn record_ref(&self) -> RecordRef {
        RecordRef::new(Self::KIND, self.id())
    }

    fn refers_to(&self, target: RecordRef) -> bool {
        self.references().iter().any(|r| r.target == target)
    }
}
