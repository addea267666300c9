use coursebase::core::{GatewayError, Result};
use coursebase::models::{Category, CategoryDraft, Course, CourseDraft, User, UserDraft};
use coursebase::{Database, ResourceKind};
use serde_json::json;
use tempfile::TempDir;

fn category(name: &str) -> CategoryDraft {
    CategoryDraft {
        name: name.to_string(),
        description: String::new(),
    }
}

#[tokio::test]
async fn test_missing_file_starts_empty() -> Result<()> {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("catalog.snapshot");

    let db = Database::open_snapshot(&path)?;
    assert!(db.is_persistent());
    assert!(db.list::<Category>().await.is_empty());
    assert!(!path.exists());

    db.create::<Category>(category("Science")).await?;
    assert!(path.exists());

    Ok(())
}

#[tokio::test]
async fn test_records_survive_reopen() -> Result<()> {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("catalog.snapshot");

    {
        let db = Database::open_snapshot(&path)?;
        db.create::<User>(serde_json::from_value::<UserDraft>(json!({"username": "ada"})).unwrap())
            .await?;
        db.create::<Category>(category("Science")).await?;
        db.create::<Category>(category("Art")).await?;
        let course: CourseDraft = serde_json::from_value(json!({
            "title": "Physics101", "price": "49.99", "category": 1, "instructor": 1
        }))
        .unwrap();
        db.create::<Course>(course).await?;
        db.destroy::<Category>(2).await?;
    }

    let db = Database::open_snapshot(&path)?;
    assert_eq!(db.row_count(ResourceKind::Category).await, 1);
    let course = db.retrieve::<Course>(1).await?;
    assert_eq!(course.title, "Physics101");
    assert_eq!(course.price.to_string(), "49.99");
    assert!(matches!(
        db.retrieve::<Category>(2).await,
        Err(GatewayError::NotFound { .. })
    ));

    // The id counter is part of the snapshot.
    let next = db.create::<Category>(category("Music")).await?;
    assert_eq!(next.id, 3);

    Ok(())
}

#[tokio::test]
async fn test_rejected_write_leaves_file_untouched() -> Result<()> {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("catalog.snapshot");

    let db = Database::open_snapshot(&path)?;
    db.create::<Category>(category("Science")).await?;
    let before = std::fs::read(&path).expect("snapshot readable");

    let res = db.create::<Category>(category("")).await;
    assert!(matches!(res, Err(GatewayError::Validation(_))));
    assert_eq!(std::fs::read(&path).expect("snapshot readable"), before);

    Ok(())
}

#[tokio::test]
async fn test_corrupt_file_is_a_storage_error() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("catalog.snapshot");
    std::fs::write(&path, b"definitely not messagepack").expect("write");

    match Database::open_snapshot(&path) {
        Err(GatewayError::Storage(_)) => {}
        Err(other) => panic!("Expected Storage error, got {:?}", other),
        Ok(_) => panic!("Expected Storage error, got a database"),
    }
}

#[tokio::test]
async fn test_unwritable_snapshot_rejects_the_write() -> Result<()> {
    let dir = TempDir::new().expect("temp dir");
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"").expect("write");
    let path = blocker.join("catalog.snapshot");

    let db = Database::open_snapshot(&path)?;
    let res = db.create::<Category>(category("Science")).await;
    assert!(matches!(res, Err(GatewayError::Storage(_))));
    assert!(db.list::<Category>().await.is_empty());

    Ok(())
}
