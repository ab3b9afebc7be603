mod common;

use folio::SiteError;
use folio::db::{AboutPage, HomePage};

#[tokio::test]
async fn singletons_are_created_once() {
    let site = common::site().await;
    let storage = &site.state.storage;

    assert!(storage.home_page().await.unwrap().is_none());
    let first = storage.home_page_or_create().await.unwrap();
    let second = storage.home_page_or_create().await.unwrap();
    assert_eq!(first, second);
    assert_eq!(first.intro_title, HomePage::defaults().intro_title);
    assert_eq!(first.profile_pic.as_deref(), Some("default.png"));

    let about = storage.about_page_or_create().await.unwrap();
    assert_eq!(about.skills, AboutPage::defaults().skills);
    storage.about_page_or_create().await.unwrap();

    let homes: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM home_page")
        .fetch_one(storage.pool())
        .await
        .unwrap();
    let abouts: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM about_page")
        .fetch_one(storage.pool())
        .await
        .unwrap();
    assert_eq!((homes, abouts), (1, 1));
}

#[tokio::test]
async fn concurrent_first_edits_create_one_row() {
    let site = common::site().await;
    let storage = site.state.storage.clone();

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let storage = storage.clone();
            tokio::spawn(async move { storage.home_page_or_create().await })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let homes: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM home_page")
        .fetch_one(storage.pool())
        .await
        .unwrap();
    assert_eq!(homes, 1);
}

#[tokio::test]
async fn posts_are_listed_newest_first() {
    let site = common::site().await;
    let storage = &site.state.storage;

    for n in 1..=4 {
        storage
            .insert_post(&format!("post {n}"), "body", "01 January 2025")
            .await
            .unwrap();
    }

    let recent = storage.list_posts(Some(3)).await.unwrap();
    let titles: Vec<_> = recent.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["post 4", "post 3", "post 2"]);
    assert_eq!(storage.list_posts(None).await.unwrap().len(), 4);
}

#[tokio::test]
async fn missing_rows_report_not_found() {
    let site = common::site().await;
    let storage = &site.state.storage;

    assert!(matches!(
        storage.update_post(42, "t", "c").await,
        Err(SiteError::NotFound)
    ));
    assert!(matches!(storage.delete_post(42).await, Err(SiteError::NotFound)));
    assert!(matches!(
        storage.delete_project(42).await,
        Err(SiteError::NotFound)
    ));
    assert!(storage.get_project(42).await.unwrap().is_none());
}

#[tokio::test]
async fn project_image_is_optional_in_storage() {
    let site = common::site().await;
    let storage = &site.state.storage;

    let id = storage.insert_project("CLI tool", None).await.unwrap();
    let mut project = storage.get_project(id).await.unwrap().unwrap();
    assert!(project.image_file.is_none());

    project.image_file = Some("cli.png".to_string());
    storage.update_project(&project).await.unwrap();
    let stored = storage.get_project(id).await.unwrap().unwrap();
    assert_eq!(stored, project);
}
