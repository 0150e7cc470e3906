use yamdb_api::domain::types::ClassifierKind;
use yamdb_api::error::ApiError;
use yamdb_api::usecase::catalog::{
    CreateClassifierUseCase, DeleteClassifierUseCase, ListClassifiersUseCase,
};
use yamdb_api::usecase::title::GetTitleUseCase;
use yamdb_domain::pagination::PageRequest;
use yamdb_domain::policy::Subject;
use yamdb_domain::validation::ValidationReason;
use yamdb_testing::auth::MockAuth;

use crate::helpers::{MemoryStore, seed_classifier, seed_title};

#[tokio::test]
async fn should_create_category_as_admin() {
    let store = MemoryStore::new();

    let item = CreateClassifierUseCase {
        repo: store.clone(),
    }
    .execute(
        &MockAuth::admin().subject(),
        ClassifierKind::Category,
        "Films".to_owned(),
        "films".to_owned(),
    )
    .await
    .unwrap();

    assert_eq!(item.slug, "films");
}

#[tokio::test]
async fn should_forbid_catalog_writes_for_moderator() {
    let store = MemoryStore::new();

    let result = CreateClassifierUseCase {
        repo: store.clone(),
    }
    .execute(
        &MockAuth::moderator().subject(),
        ClassifierKind::Genre,
        "Drama".to_owned(),
        "drama".to_owned(),
    )
    .await;

    assert!(matches!(result, Err(ApiError::Forbidden)));
}

#[tokio::test]
async fn should_reject_duplicate_and_malformed_slugs() {
    let store = MemoryStore::new();
    seed_classifier(&store, ClassifierKind::Genre, "drama");
    let uc = CreateClassifierUseCase {
        repo: store.clone(),
    };
    let admin = MockAuth::admin().subject();

    let dup = uc
        .execute(
            &admin,
            ClassifierKind::Genre,
            "Drama again".to_owned(),
            "drama".to_owned(),
        )
        .await;
    assert!(matches!(
        dup,
        Err(ApiError::Validation {
            field: "slug",
            reason: ValidationReason::Conflict
        })
    ));

    let bad = uc
        .execute(
            &admin,
            ClassifierKind::Genre,
            "Sci-fi".to_owned(),
            "sci fi!".to_owned(),
        )
        .await;
    assert!(matches!(
        bad,
        Err(ApiError::Validation {
            field: "slug",
            reason: ValidationReason::InvalidSlug
        })
    ));
}

#[tokio::test]
async fn should_list_genres_for_anonymous_with_search() {
    let store = MemoryStore::new();
    for slug in ["drama", "comedy", "melodrama"] {
        seed_classifier(&store, ClassifierKind::Genre, slug);
    }

    let page = ListClassifiersUseCase {
        repo: store.clone(),
    }
    .execute(
        &Subject::Anonymous,
        ClassifierKind::Genre,
        Some("DRAMA"),
        PageRequest::default(),
    )
    .await
    .unwrap();

    assert_eq!(page.count, 2);
}

#[tokio::test]
async fn should_detach_titles_when_category_deleted() {
    let store = MemoryStore::new();
    let films = seed_classifier(&store, ClassifierKind::Category, "films");
    let title_id = seed_title(&store, "Heat");
    {
        let mut t = store.tables.lock().unwrap();
        t.titles[0].1.category_id = Some(films.id);
    }

    DeleteClassifierUseCase {
        repo: store.clone(),
    }
    .execute(
        &MockAuth::admin().subject(),
        ClassifierKind::Category,
        "films",
    )
    .await
    .unwrap();

    let title = GetTitleUseCase {
        titles: store.clone(),
        reviews: store.clone(),
    }
    .execute(&Subject::Anonymous, title_id)
    .await
    .unwrap();
    assert!(title.category.is_none());
}

#[tokio::test]
async fn should_return_not_found_for_unknown_genre_slug() {
    let store = MemoryStore::new();

    let result = DeleteClassifierUseCase {
        repo: store.clone(),
    }
    .execute(&MockAuth::admin().subject(), ClassifierKind::Genre, "nope")
    .await;

    assert!(matches!(result, Err(ApiError::GenreNotFound)));
}
