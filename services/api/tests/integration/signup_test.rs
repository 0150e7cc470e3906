use yamdb_api::error::ApiError;
use yamdb_api::usecase::signup::{CONFIRMATION_SUBJECT, SignupInput, SignupUseCase};
use yamdb_domain::user::Role;
use yamdb_domain::validation::ValidationReason;

use crate::helpers::{MemoryStore, RecordingMailer, test_codes};

fn usecase(store: &MemoryStore, mailer: &RecordingMailer) -> SignupUseCase<MemoryStore, RecordingMailer> {
    SignupUseCase {
        repo: store.clone(),
        mailer: mailer.clone(),
        codes: test_codes(),
    }
}

fn input(username: &str, email: &str) -> SignupInput {
    SignupInput {
        username: username.to_owned(),
        email: email.to_owned(),
    }
}

#[tokio::test]
async fn should_register_user_and_mail_code() {
    let store = MemoryStore::new();
    let mailer = RecordingMailer::new();

    let user = usecase(&store, &mailer)
        .execute(input("alice", "alice@example.com"))
        .await
        .unwrap();

    assert_eq!(user.role, Role::User);
    assert!(!user.is_superuser);
    assert!(store.user("alice").unwrap().challenge.is_some());

    let sent = mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "alice@example.com");
    assert_eq!(sent[0].subject, CONFIRMATION_SUBJECT);
    assert!(sent[0].body.starts_with("Your code - "));
}

#[tokio::test]
async fn should_reject_reserved_username() {
    let store = MemoryStore::new();
    let mailer = RecordingMailer::new();

    let result = usecase(&store, &mailer)
        .execute(input("me", "a@b.com"))
        .await;

    assert!(
        matches!(
            result,
            Err(ApiError::Validation {
                field: "username",
                reason: ValidationReason::ReservedUsername
            })
        ),
        "expected reserved_username, got {result:?}"
    );
    assert_eq!(mailer.count(), 0);
}

#[tokio::test]
async fn should_be_idempotent_on_exact_match() {
    let store = MemoryStore::new();
    let mailer = RecordingMailer::new();
    let uc = usecase(&store, &mailer);

    let first = uc.execute(input("bob", "bob@example.com")).await.unwrap();
    let second = uc.execute(input("bob", "bob@example.com")).await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(mailer.count(), 2, "a fresh code is mailed on every signup");
    let sent = mailer.sent.lock().unwrap();
    assert_ne!(sent[0].body, sent[1].body);
}

#[tokio::test]
async fn should_conflict_on_same_username_different_email() {
    let store = MemoryStore::new();
    let mailer = RecordingMailer::new();
    let uc = usecase(&store, &mailer);
    uc.execute(input("carol", "carol@example.com")).await.unwrap();

    let result = uc.execute(input("carol", "other@example.com")).await;

    assert!(matches!(
        result,
        Err(ApiError::Validation {
            field: "username",
            reason: ValidationReason::Conflict
        })
    ));
}

#[tokio::test]
async fn should_conflict_on_same_email_different_username() {
    let store = MemoryStore::new();
    let mailer = RecordingMailer::new();
    let uc = usecase(&store, &mailer);
    uc.execute(input("dave", "dave@example.com")).await.unwrap();

    let result = uc.execute(input("david", "dave@example.com")).await;

    assert!(matches!(
        result,
        Err(ApiError::Validation {
            field: "email",
            reason: ValidationReason::Conflict
        })
    ));
}

#[tokio::test]
async fn should_reject_invalid_email() {
    let store = MemoryStore::new();
    let mailer = RecordingMailer::new();

    let result = usecase(&store, &mailer)
        .execute(input("erin", "not-an-email"))
        .await;

    assert!(matches!(
        result,
        Err(ApiError::Validation {
            field: "email",
            reason: ValidationReason::InvalidEmail
        })
    ));
}

#[tokio::test]
async fn should_keep_user_when_delivery_fails() {
    let store = MemoryStore::new();
    let mailer = RecordingMailer::failing();

    let result = usecase(&store, &mailer)
        .execute(input("frank", "frank@example.com"))
        .await;

    assert!(
        matches!(result, Err(ApiError::Delivery(_))),
        "expected Delivery, got {result:?}"
    );
    let stored = store.user("frank").expect("user must stay committed");
    assert!(stored.challenge.is_some());

    // Retrying with a working transport re-identifies the same account.
    let healthy = RecordingMailer::new();
    let retried = usecase(&store, &healthy)
        .execute(input("frank", "frank@example.com"))
        .await
        .unwrap();
    assert_eq!(retried.id, stored.id);
    assert_eq!(healthy.count(), 1);
}
