use yamdb_api::domain::types::ProfilePatch;
use yamdb_api::error::ApiError;
use yamdb_api::usecase::signup::{SignupInput, SignupUseCase};
use yamdb_api::usecase::token::IssueTokenUseCase;
use yamdb_api::usecase::user::UpdateSelfUseCase;
use yamdb_auth_types::identity::TokenSecret;
use yamdb_auth_types::token::validate_access_token;
use yamdb_domain::user::Role;
use yamdb_domain::validation::ValidationReason;
use yamdb_testing::auth::TEST_SECRET;

use crate::helpers::{MemoryStore, RecordingMailer, test_codes};

async fn signup(store: &MemoryStore, mailer: &RecordingMailer, username: &str) -> String {
    SignupUseCase {
        repo: store.clone(),
        mailer: mailer.clone(),
        codes: test_codes(),
    }
    .execute(SignupInput {
        username: username.to_owned(),
        email: format!("{username}@example.com"),
    })
    .await
    .unwrap();
    mailer.last_code()
}

fn usecase(store: &MemoryStore) -> IssueTokenUseCase<MemoryStore> {
    IssueTokenUseCase {
        repo: store.clone(),
        codes: test_codes(),
        secret: TokenSecret::new(TEST_SECRET),
        ttl_secs: 3600,
    }
}

fn is_bad_code(result: &Result<impl std::fmt::Debug, ApiError>) -> bool {
    matches!(
        result,
        Err(ApiError::Validation {
            field: "confirmation_code",
            reason: ValidationReason::BadCode
        })
    )
}

#[tokio::test]
async fn should_issue_token_for_valid_code() {
    let store = MemoryStore::new();
    let mailer = RecordingMailer::new();
    let code = signup(&store, &mailer, "alice").await;

    let issued = usecase(&store).execute("alice", &code).await.unwrap();

    let info = validate_access_token(&issued.token, TEST_SECRET).unwrap();
    let alice = store.user("alice").unwrap();
    assert_eq!(info.principal.id, alice.id);
    assert_eq!(info.principal.role, Role::User);
    assert!(alice.challenge.is_none(), "challenge is consumed");
}

#[tokio::test]
async fn should_accept_code_only_once() {
    let store = MemoryStore::new();
    let mailer = RecordingMailer::new();
    let code = signup(&store, &mailer, "bob").await;
    let uc = usecase(&store);

    uc.execute("bob", &code).await.unwrap();
    let second = uc.execute("bob", &code).await.map(|t| t.token);

    assert!(is_bad_code(&second), "got {second:?}");
}

#[tokio::test]
async fn should_reject_superseded_code() {
    let store = MemoryStore::new();
    let mailer = RecordingMailer::new();
    let first = signup(&store, &mailer, "carol").await;
    let second = signup(&store, &mailer, "carol").await;
    let uc = usecase(&store);

    let stale = uc.execute("carol", &first).await.map(|t| t.token);
    assert!(is_bad_code(&stale), "got {stale:?}");
    uc.execute("carol", &second).await.unwrap();
}

#[tokio::test]
async fn should_reject_code_after_profile_change() {
    let store = MemoryStore::new();
    let mailer = RecordingMailer::new();
    let code = signup(&store, &mailer, "dave").await;
    let dave = store.user("dave").unwrap();

    UpdateSelfUseCase {
        repo: store.clone(),
    }
    .execute(
        dave.principal(),
        ProfilePatch {
            bio: Some("changed".to_owned()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let result = usecase(&store).execute("dave", &code).await.map(|t| t.token);
    assert!(is_bad_code(&result), "got {result:?}");
}

#[tokio::test]
async fn should_reject_garbage_code() {
    let store = MemoryStore::new();
    let mailer = RecordingMailer::new();
    signup(&store, &mailer, "erin").await;

    let result = usecase(&store)
        .execute("erin", "not-hex-at-all")
        .await
        .map(|t| t.token);
    assert!(is_bad_code(&result), "got {result:?}");
}

#[tokio::test]
async fn should_return_not_found_for_unknown_username() {
    let store = MemoryStore::new();

    let result = usecase(&store)
        .execute("ghost", "00112233445566778899aabb")
        .await
        .map(|t| t.token);
    assert!(
        matches!(result, Err(ApiError::UserNotFound)),
        "got {result:?}"
    );
}

#[tokio::test]
async fn should_require_username_and_code() {
    let store = MemoryStore::new();
    let uc = usecase(&store);

    let no_user = uc.execute("", "abc").await.map(|t| t.token);
    assert!(matches!(
        no_user,
        Err(ApiError::Validation {
            field: "username",
            reason: ValidationReason::Required
        })
    ));
    let no_code = uc.execute("frank", " ").await.map(|t| t.token);
    assert!(matches!(
        no_code,
        Err(ApiError::Validation {
            field: "confirmation_code",
            reason: ValidationReason::Required
        })
    ));
}
