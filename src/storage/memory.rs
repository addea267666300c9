use super::Table;
use crate::core::{GatewayError, RecordId, RecordRef, ResourceKind, Result};
use crate::models::{Category, Course, Enrollment, Lesson, Resource, Review, User};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What happens to rows that reference a row being deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletePolicy {
    /// Dependent rows are deleted too, transitively.
    #[default]
    Cascade,
    /// Deleting a referenced row fails with a conflict.
    Restrict,
}

impl FromStr for DeletePolicy {
    type Err = String;

    fn from_str(raw: &str) -> std::result::Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "cascade" => Ok(Self::Cascade),
            "restrict" | "protect" => Ok(Self::Restrict),
            other => Err(format!(
                "unknown delete policy '{other}', expected one of: cascade, restrict"
            )),
        }
    }
}

impl fmt::Display for DeletePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cascade => f.write_str("cascade"),
            Self::Restrict => f.write_str("restrict"),
        }
    }
}

/// All tables of the catalogue.
///
/// Every mutating method checks before it writes: on error the storage is
/// left exactly as it was.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InMemoryStorage {
    pub(crate) users: Table<User>,
    pub(crate) categories: Table<Category>,
    pub(crate) courses: Table<Course>,
    pub(crate) lessons: Table<Lesson>,
    pub(crate) enrollments: Table<Enrollment>,
    pub(crate) reviews: Table<Review>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, target: RecordRef) -> bool {
        match target.kind {
            ResourceKind::User => self.users.contains(target.id),
            ResourceKind::Category => self.categories.contains(target.id),
            ResourceKind::Course => self.courses.contains(target.id),
            ResourceKind::Lesson => self.lessons.contains(target.id),
            ResourceKind::Enrollment => self.enrollments.contains(target.id),
            ResourceKind::Review => self.reviews.contains(target.id),
        }
    }

    pub fn row_count(&self, kind: ResourceKind) -> usize {
        match kind {
            ResourceKind::User => self.users.row_count(),
            ResourceKind::Category => self.categories.row_count(),
            ResourceKind::Course => self.courses.row_count(),
            ResourceKind::Lesson => self.lessons.row_count(),
            ResourceKind::Enrollment => self.enrollments.row_count(),
            ResourceKind::Review => self.reviews.row_count(),
        }
    }

    pub fn total_rows(&self) -> usize {
        ResourceKind::ALL.iter().map(|kind| self.row_count(*kind)).sum()
    }

    pub fn get<R: Resource>(&self, id: RecordId) -> Result<&R> {
        R::table(self)
            .get(id)
            .ok_or_else(|| GatewayError::not_found(R::KIND, id))
    }

    /// Fails with the first foreign key of `record` that points nowhere.
    pub fn check_references<R: Resource>(&self, record: &R) -> Result<()> {
        for reference in record.references() {
            if !self.contains(reference.target) {
                return Err(GatewayError::DanglingReference {
                    field: reference.field,
                    target: reference.target,
                });
            }
        }
        Ok(())
    }

    pub fn insert<R: Resource>(&mut self, draft: R::Draft, now: DateTime<Utc>) -> Result<R> {
        let record = R::from_draft(R::table(self).peek_next_id(), draft, now);
        record.validate()?;
        self.check_references(&record)?;

        let table = R::table_mut(self);
        table.allocate_id();
        table.put(record.clone());
        Ok(record)
    }

    pub fn replace<R: Resource>(&mut self, id: RecordId, draft: R::Draft) -> Result<R> {
        let mut record = self.get::<R>(id)?.clone();
        record.replace(draft);
        self.store_checked(record)
    }

    pub fn patch<R: Resource>(&mut self, id: RecordId, patch: R::Patch) -> Result<R> {
        let mut record = self.get::<R>(id)?.clone();
        record.apply(patch);
        self.store_checked(record)
    }

    fn store_checked<R: Resource>(&mut self, record: R) -> Result<R> {
        record.validate()?;
        self.check_references(&record)?;
        R::table_mut(self).put(record.clone());
        Ok(record)
    }

    /// Rows that hold a foreign key to `target`.
    pub fn dependents_of(&self, target: RecordRef) -> Vec<RecordRef> {
        fn collect<R: Resource>(table: &Table<R>, target: RecordRef, out: &mut Vec<RecordRef>) {
            out.extend(
                table
                    .referencing(target)
                    .into_iter()
                    .map(|id| RecordRef::new(R::KIND, id)),
            );
        }

        let mut dependents = Vec::new();
        collect(&self.users, target, &mut dependents);
        collect(&self.categories, target, &mut dependents);
        collect(&self.courses, target, &mut dependents);
        collect(&self.lessons, target, &mut dependents);
        collect(&self.enrollments, target, &mut dependents);
        collect(&self.reviews, target, &mut dependents);
        dependents
    }

    /// Deletes a row according to `policy` and returns every row removed,
    /// the requested one first.
    pub fn delete<R: Resource>(
        &mut self,
        id: RecordId,
        policy: DeletePolicy,
    ) -> Result<Vec<RecordRef>> {
        let target = RecordRef::new(R::KIND, id);
        if !self.contains(target) {
            return Err(GatewayError::not_found(R::KIND, id));
        }

        if policy == DeletePolicy::Restrict {
            let dependents = self.dependents_of(target);
            if !dependents.is_empty() {
                let names: Vec<String> = dependents.iter().map(ToString::to_string).collect();
                return Err(GatewayError::Conflict(format!(
                    "cannot delete {target}: referenced by {}",
                    names.join(", ")
                )));
            }
        }

        let mut removed = Vec::new();
        let mut pending = vec![target];
        while let Some(next) = pending.pop() {
            if self.remove_row(next) {
                removed.push(next);
                pending.extend(self.dependents_of(next));
            }
        }
        Ok(removed)
    }

    fn remove_row(&mut self, target: RecordRef) -> bool {
        match target.kind {
            ResourceKind::User => self.users.remove(target.id).is_some(),
            ResourceKind::Category => self.categories.remove(target.id).is_some(),
            ResourceKind::Course => self.courses.remove(target.id).is_some(),
            ResourceKind::Lesson => self.lessons.remove(target.id).is_some(),
            ResourceKind::Enrollment => self.enrollments.remove(target.id).is_some(),
            ResourceKind::Review => self.reviews.remove(target.id).is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryDraft, CourseDraft, LessonDraft, UserDraft};
    use serde_json::json;

    fn draft<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> T {
        serde_json::from_value(value).unwrap()
    }

    fn seeded() -> InMemoryStorage {
        let mut storage = InMemoryStorage::new();
        let now = Utc::now();
        storage
            .insert::<User>(draft::<UserDraft>(json!({"username": "ada"})), now)
            .unwrap();
        storage
            .insert::<Category>(draft::<CategoryDraft>(json!({"name": "Science"})), now)
            .unwrap();
        storage
            .insert::<Course>(
                draft::<CourseDraft>(json!({
                    "title": "Physics101", "price": "10", "category": 1, "instructor": 1
                })),
                now,
            )
            .unwrap();
        storage
            .insert::<Lesson>(
                draft::<LessonDraft>(json!({"title": "Motion", "course": 1})),
                now,
            )
            .unwrap();
        storage
    }

    #[test]
    fn dangling_reference_is_rejected_without_consuming_an_id() {
        let mut storage = seeded();
        let err = storage
            .insert::<Course>(
                draft::<CourseDraft>(json!({
                    "title": "X", "price": "1", "category": 999, "instructor": 1
                })),
                Utc::now(),
            )
            .unwrap_err();

        assert!(matches!(
            err,
            GatewayError::DanglingReference { field: "category", .. }
        ));
        assert_eq!(storage.row_count(ResourceKind::Course), 1);
        assert_eq!(storage.courses.peek_next_id(), 2);
    }

    #[test]
    fn cascade_removes_dependents_transitively() {
        let mut storage = seeded();
        let removed = storage
            .delete::<Category>(1, DeletePolicy::Cascade)
            .unwrap();

        assert_eq!(removed[0], RecordRef::new(ResourceKind::Category, 1));
        assert!(removed.contains(&RecordRef::new(ResourceKind::Course, 1)));
        assert!(removed.contains(&RecordRef::new(ResourceKind::Lesson, 1)));
        assert_eq!(storage.row_count(ResourceKind::Lesson), 0);
        assert_eq!(storage.row_count(ResourceKind::User), 1);
    }

    #[test]
    fn restrict_refuses_referenced_rows() {
        let mut storage = seeded();
        let err = storage
            .delete::<Course>(1, DeletePolicy::Restrict)
            .unwrap_err();
        assert!(matches!(err, GatewayError::Conflict(_)));
        assert_eq!(storage.row_count(ResourceKind::Course), 1);

        storage.delete::<Lesson>(1, DeletePolicy::Restrict).unwrap();
        storage.delete::<Course>(1, DeletePolicy::Restrict).unwrap();
        assert_eq!(storage.row_count(ResourceKind::Course), 0);
    }

    #[test]
    fn failed_patch_leaves_row_untouched() {
        let mut storage = seeded();
        let before = storage.get::<Lesson>(1).unwrap().clone();
        let err = storage
            .patch::<Lesson>(
                1,
                crate::models::LessonPatch {
                    course: Some(42),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(storage.get::<Lesson>(1).unwrap(), &before);
    }

    #[test]
    fn delete_policy_parses() {
        assert_eq!("Cascade".parse::<DeletePolicy>(), Ok(DeletePolicy::Cascade));
        assert_eq!("restrict".parse::<DeletePolicy>(), Ok(DeletePolicy::Restrict));
        assert!("nullify".parse::<DeletePolicy>().is_err());
    }
}
