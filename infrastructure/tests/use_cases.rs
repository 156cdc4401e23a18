use std::sync::Arc;

use application::{
    ApplicationError, CategoryService, CreateCategoryInput, SearchInput, UpdateCategoryInput,
};
use domain::DomainError;
use infrastructure::CategoryInMemoryRepository;

fn service() -> CategoryService {
    CategoryService::new(Arc::new(CategoryInMemoryRepository::new()))
}

fn create_input(name: &str) -> CreateCategoryInput {
    CreateCategoryInput {
        name: name.to_string(),
        description: None,
        is_active: true,
    }
}

#[tokio::test]
async fn create_then_get_roundtrip() {
    let service = service();

    let created = service
        .create(CreateCategoryInput {
            name: "Movie".to_string(),
            description: Some("Feature films".to_string()),
            is_active: true,
        })
        .await
        .unwrap();

    let fetched = service.get(&created.id).await.unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched.name, "Movie");
    assert_eq!(fetched.description.as_deref(), Some("Feature films"));
    assert!(fetched.is_active);
}

#[tokio::test]
async fn create_rejects_invalid_name() {
    let service = service();

    let result = service.create(create_input("")).await;

    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::Validation { ref field, .. })) if field == "name"
    ));
}

#[tokio::test]
async fn get_rejects_malformed_id() {
    let service = service();

    let result = service.get("not-a-uuid").await;

    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::InvalidId(_)))
    ));
}

#[tokio::test]
async fn get_unknown_id_is_not_found() {
    let service = service();
    let unknown = domain::EntityId::new().to_string();

    let result = service.get(&unknown).await;

    assert!(matches!(result, Err(ApplicationError::NotFound(id)) if id == unknown));
}

#[tokio::test]
async fn list_maps_items_and_pagination_metadata() {
    let service = service();
    for name in ["Movie", "Series", "Documentary"] {
        service.create(create_input(name)).await.unwrap();
    }

    let output = service.list(SearchInput::default()).await.unwrap();

    assert_eq!(output.total, 3);
    assert_eq!(output.current_page, 1);
    assert_eq!(output.per_page, 15);
    assert_eq!(output.last_page, 1);
    assert_eq!(output.items.len(), 3);
}

#[tokio::test]
async fn list_honors_filter_sort_and_pagination() {
    let service = service();
    for name in ["Action", "Adventure", "Animation", "Romance", "Anime"] {
        service.create(create_input(name)).await.unwrap();
    }

    let output = service
        .list(SearchInput {
            page: Some(1),
            per_page: Some(2),
            sort: Some("name".to_string()),
            sort_dir: Some("asc".to_string()),
            filter: Some("an".to_string()),
        })
        .await
        .unwrap();

    let names: Vec<&str> = output.items.iter().map(|item| item.name.as_str()).collect();
    assert_eq!(names, vec!["Animation", "Anime"]);
    assert_eq!(output.total, 3);
    assert_eq!(output.last_page, 2);
}

#[tokio::test]
async fn list_normalizes_invalid_paging_input() {
    let service = service();
    service.create(create_input("Movie")).await.unwrap();

    let output = service
        .list(SearchInput {
            page: Some(0),
            per_page: Some(-3),
            ..SearchInput::default()
        })
        .await
        .unwrap();

    assert_eq!(output.current_page, 1);
    assert_eq!(output.per_page, 15);
}

#[tokio::test]
async fn update_changes_fields_in_place() {
    let service = service();
    let created = service.create(create_input("Movie")).await.unwrap();

    let updated = service
        .update(UpdateCategoryInput {
            id: created.id.clone(),
            name: "Documentary".to_string(),
            description: Some("Non-fiction".to_string()),
            is_active: Some(false),
        })
        .await
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, "Documentary");
    assert_eq!(updated.description.as_deref(), Some("Non-fiction"));
    assert!(!updated.is_active);

    // The stored entity changed too
    let fetched = service.get(&created.id).await.unwrap();
    assert_eq!(fetched, updated);
}

#[tokio::test]
async fn update_unknown_id_is_not_found() {
    let service = service();

    let result = service
        .update(UpdateCategoryInput {
            id: domain::EntityId::new().to_string(),
            name: "Movie".to_string(),
            description: None,
            is_active: None,
        })
        .await;

    assert!(matches!(result, Err(ApplicationError::NotFound(_))));
}

#[tokio::test]
async fn delete_removes_the_category() {
    let service = service();
    let created = service.create(create_input("Movie")).await.unwrap();

    service.delete(&created.id).await.unwrap();

    assert!(matches!(
        service.get(&created.id).await,
        Err(ApplicationError::NotFound(_))
    ));
    // Deleting again keeps failing
    assert!(matches!(
        service.delete(&created.id).await,
        Err(ApplicationError::NotFound(_))
    ));

    let output = service.list(SearchInput::default()).await.unwrap();
    assert_eq!(output.total, 0);
    assert_eq!(output.last_page, 0);
}
