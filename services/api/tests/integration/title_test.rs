use chrono::{Datelike, Utc};

use yamdb_api::domain::types::{ClassifierKind, TitleFilter};
use yamdb_api::error::ApiError;
use yamdb_api::usecase::title::{
    CreateTitleUseCase, DeleteTitleUseCase, GetTitleUseCase, ListTitlesUseCase, TitleInput,
    TitlePatch, UpdateTitleUseCase,
};
use yamdb_domain::pagination::PageRequest;
use yamdb_domain::policy::Subject;
use yamdb_domain::user::Role;
use yamdb_domain::validation::ValidationReason;
use yamdb_testing::auth::MockAuth;

use crate::helpers::{MemoryStore, seed_classifier, seed_review, seed_title, seed_user};

fn create_uc(store: &MemoryStore) -> CreateTitleUseCase<MemoryStore, MemoryStore> {
    CreateTitleUseCase {
        titles: store.clone(),
        catalog: store.clone(),
    }
}

#[tokio::test]
async fn should_create_title_with_slugs_resolved() {
    let store = MemoryStore::new();
    seed_classifier(&store, ClassifierKind::Category, "films");
    seed_classifier(&store, ClassifierKind::Genre, "drama");
    seed_classifier(&store, ClassifierKind::Genre, "crime");

    let title = create_uc(&store)
        .execute(
            &MockAuth::admin().subject(),
            TitleInput {
                name: "Heat".to_owned(),
                year: Some(1995),
                description: Some("Cops and robbers".to_owned()),
                genre: vec!["crime".to_owned(), "drama".to_owned()],
                category: Some("films".to_owned()),
            },
        )
        .await
        .unwrap();

    assert_eq!(title.category.as_ref().unwrap().slug, "films");
    assert_eq!(title.genres.len(), 2);
    assert_eq!(title.rating, None);
}

#[tokio::test]
async fn should_reject_unknown_genre_slug() {
    let store = MemoryStore::new();

    let result = create_uc(&store)
        .execute(
            &MockAuth::admin().subject(),
            TitleInput {
                name: "Heat".to_owned(),
                year: Some(1995),
                genre: vec!["nope".to_owned()],
                ..Default::default()
            },
        )
        .await;

    assert!(matches!(
        result,
        Err(ApiError::Validation {
            field: "genre",
            reason: ValidationReason::UnknownSlug
        })
    ));
}

#[tokio::test]
async fn should_reject_future_year_and_missing_year() {
    let store = MemoryStore::new();
    let admin = MockAuth::admin().subject();

    let future = create_uc(&store)
        .execute(
            &admin,
            TitleInput {
                name: "Tomorrow".to_owned(),
                year: Some(Utc::now().year() + 1),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(
        future,
        Err(ApiError::Validation {
            field: "year",
            reason: ValidationReason::InvalidYear
        })
    ));

    let missing = create_uc(&store)
        .execute(
            &admin,
            TitleInput {
                name: "Someday".to_owned(),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(
        missing,
        Err(ApiError::Validation {
            field: "year",
            reason: ValidationReason::Required
        })
    ));
}

#[tokio::test]
async fn should_forbid_title_writes_for_non_admin() {
    let store = MemoryStore::new();
    let title_id = seed_title(&store, "Heat");

    let created = create_uc(&store)
        .execute(
            &MockAuth::moderator().subject(),
            TitleInput {
                name: "Ronin".to_owned(),
                year: Some(1998),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(created, Err(ApiError::Forbidden)));

    let deleted = DeleteTitleUseCase {
        titles: store.clone(),
    }
    .execute(&Subject::Anonymous, title_id)
    .await;
    assert!(matches!(deleted, Err(ApiError::Unauthorized)));
}

#[tokio::test]
async fn should_return_mean_rating_or_none() {
    let store = MemoryStore::new();
    let heat = seed_title(&store, "Heat");
    let ronin = seed_title(&store, "Ronin");
    for (name, score) in [("a", 10), ("b", 7), ("c", 4)] {
        let author = seed_user(&store, name, Role::User);
        seed_review(&store, heat, &author, score);
    }

    let page = ListTitlesUseCase {
        titles: store.clone(),
        reviews: store.clone(),
    }
    .execute(&Subject::Anonymous, &TitleFilter::default(), PageRequest::default())
    .await
    .unwrap();

    let rating_of = |id: uuid::Uuid| page.results.iter().find(|t| t.id == id).unwrap().rating;
    assert_eq!(rating_of(heat), Some(7.0));
    assert_eq!(rating_of(ronin), None);
}

#[tokio::test]
async fn should_filter_titles_by_genre_and_year() {
    let store = MemoryStore::new();
    let drama = seed_classifier(&store, ClassifierKind::Genre, "drama");
    seed_title(&store, "Heat");
    let ronin = seed_title(&store, "Ronin");
    {
        let mut t = store.tables.lock().unwrap();
        let record = &mut t.titles.iter_mut().find(|(id, _)| *id == ronin).unwrap().1;
        record.genre_ids.push(drama.id);
        record.year = 1998;
    }
    let list = ListTitlesUseCase {
        titles: store.clone(),
        reviews: store.clone(),
    };

    let by_genre = list
        .execute(
            &Subject::Anonymous,
            &TitleFilter {
                genre: Some("drama".to_owned()),
                ..Default::default()
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(by_genre.count, 1);
    assert_eq!(by_genre.results[0].id, ronin);

    let by_year = list
        .execute(
            &Subject::Anonymous,
            &TitleFilter {
                year: Some(1999),
                ..Default::default()
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(by_year.count, 1);
    assert_eq!(by_year.results[0].name, "Heat");
}

#[tokio::test]
async fn should_patch_title_and_keep_rating() {
    let store = MemoryStore::new();
    let heat = seed_title(&store, "Heat");
    let author = seed_user(&store, "alice", Role::User);
    seed_review(&store, heat, &author, 9);

    let title = UpdateTitleUseCase {
        titles: store.clone(),
        catalog: store.clone(),
        reviews: store.clone(),
    }
    .execute(
        &MockAuth::admin().subject(),
        heat,
        TitlePatch {
            description: Some("Directed by Michael Mann".to_owned()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(title.name, "Heat");
    assert_eq!(title.description.as_deref(), Some("Directed by Michael Mann"));
    assert_eq!(title.rating, Some(9.0));
}

#[tokio::test]
async fn should_return_not_found_for_missing_title() {
    let store = MemoryStore::new();

    let result = GetTitleUseCase {
        titles: store.clone(),
        reviews: store.clone(),
    }
    .execute(&Subject::Anonymous, uuid::Uuid::now_v7())
    .await;

    assert!(matches!(result, Err(ApiError::TitleNotFound)));
}

#[tokio::test]
async fn should_delete_title_with_its_reviews() {
    let store = MemoryStore::new();
    let heat = seed_title(&store, "Heat");
    let author = seed_user(&store, "alice", Role::User);
    seed_review(&store, heat, &author, 9);

    DeleteTitleUseCase {
        titles: store.clone(),
    }
    .execute(&MockAuth::admin().subject(), heat)
    .await
    .unwrap();

    assert_eq!(store.review_count(), 0);
}

#[tokio::test]
async fn should_return_empty_page_for_offset_past_signed_range() {
    let store = MemoryStore::new();
    seed_title(&store, "Heat");

    let page = ListTitlesUseCase {
        titles: store.clone(),
        reviews: store.clone(),
    }
    .execute(
        &Subject::Anonymous,
        &TitleFilter::default(),
        PageRequest {
            limit: 20,
            offset: u64::MAX,
        },
    )
    .await
    .unwrap();

    assert_eq!(page.count, 1);
    assert!(page.results.is_empty());
}
