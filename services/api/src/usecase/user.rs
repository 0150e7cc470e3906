use yamdb_domain::pagination::{Page, PageRequest};
use yamdb_domain::policy::{Action, Principal, Resource, Subject};
use yamdb_domain::user::{PERSONAL_NAME_MAX_LEN, Role, validate_email, validate_username};
use yamdb_domain::validation::{FieldError, ValidationReason};

use crate::domain::repository::UserRepository;
use crate::domain::types::{ProfilePatch, User};
use crate::error::ApiError;
use crate::usecase::authorize;
use crate::usecase::signup::find_exact;

fn check_personal_name(field: &'static str, value: &str) -> Result<(), FieldError> {
    if value.chars().count() > PERSONAL_NAME_MAX_LEN {
        return Err(FieldError::new(field, ValidationReason::Length));
    }
    Ok(())
}

/// Validate and apply `patch` to `user`, then persist. An empty patch is a no-op.
async fn apply_patch<R: UserRepository>(
    repo: &R,
    mut user: User,
    patch: ProfilePatch,
) -> Result<User, ApiError> {
    if patch.is_empty() {
        return Ok(user);
    }
    if let Some(username) = patch.username {
        if username != user.username {
            validate_username(&username)?;
            if repo.find_by_username(&username).await?.is_some() {
                return Err(ApiError::validation("username", ValidationReason::Conflict));
            }
            user.username = username;
        }
    }
    if let Some(email) = patch.email {
        if email != user.email {
            validate_email(&email)?;
            if repo.find_by_email(&email).await?.is_some() {
                return Err(ApiError::validation("email", ValidationReason::Conflict));
            }
            user.email = email;
        }
    }
    if let Some(first_name) = patch.first_name {
        check_personal_name("first_name", &first_name)?;
        user.first_name = first_name;
    }
    if let Some(last_name) = patch.last_name {
        check_personal_name("last_name", &last_name)?;
        user.last_name = last_name;
    }
    if let Some(bio) = patch.bio {
        user.bio = bio;
    }
    if let Some(role) = patch.role {
        user.role = role;
    }
    if !repo.update(&user).await? {
        return Err(ApiError::validation("username", ValidationReason::Conflict));
    }
    Ok(user)
}

async fn find_account<R: UserRepository>(repo: &R, username: &str) -> Result<User, ApiError> {
    repo.find_by_username(username)
        .await?
        .ok_or(ApiError::UserNotFound)
}

// ── GetSelf ──────────────────────────────────────────────────────────────────

pub struct GetSelfUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> GetSelfUseCase<R> {
    pub async fn execute(&self, caller: Principal) -> Result<User, ApiError> {
        authorize(
            &caller.into(),
            Action::Retrieve,
            &Resource::Profile { owner: caller.id },
        )?;
        self.repo
            .find_by_id(caller.id)
            .await?
            .ok_or(ApiError::UserNotFound)
    }
}

// ── UpdateSelf ───────────────────────────────────────────────────────────────

pub struct UpdateSelfUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> UpdateSelfUseCase<R> {
    /// Any submitted `role` is discarded; users cannot change their own role.
    pub async fn execute(&self, caller: Principal, patch: ProfilePatch) -> Result<User, ApiError> {
        authorize(
            &caller.into(),
            Action::Update,
            &Resource::Profile { owner: caller.id },
        )?;
        let patch = ProfilePatch { role: None, ..patch };
        let user = self
            .repo
            .find_by_id(caller.id)
            .await?
            .ok_or(ApiError::UserNotFound)?;
        apply_patch(&self.repo, user, patch).await
    }
}

// ── SetRole ──────────────────────────────────────────────────────────────────

pub struct SetRoleUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> SetRoleUseCase<R> {
    pub async fn execute(
        &self,
        actor: &Subject,
        username: &str,
        role: Role,
    ) -> Result<User, ApiError> {
        authorize(actor, Action::Update, &Resource::Account)?;
        let user = find_account(&self.repo, username).await?;
        let patch = ProfilePatch {
            role: Some(role),
            ..Default::default()
        };
        let user = apply_patch(&self.repo, user, patch).await?;
        tracing::info!(user_id = %user.id, role = %role, "role changed");
        Ok(user)
    }
}

// ── Admin: list / get / create / update / delete ─────────────────────────────

pub struct ListUsersUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> ListUsersUseCase<R> {
    pub async fn execute(
        &self,
        actor: &Subject,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<User>, ApiError> {
        authorize(actor, Action::List, &Resource::Account)?;
        self.repo.list(search, page.clamped()).await
    }
}

pub struct GetUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> GetUserUseCase<R> {
    pub async fn execute(&self, actor: &Subject, username: &str) -> Result<User, ApiError> {
        authorize(actor, Action::Retrieve, &Resource::Account)?;
        find_account(&self.repo, username).await
    }
}

pub struct CreateUserInput {
    pub username: String,
    pub email: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
}

pub struct CreateUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> CreateUserUseCase<R> {
    pub async fn execute(&self, actor: &Subject, input: CreateUserInput) -> Result<User, ApiError> {
        authorize(actor, Action::Create, &Resource::Account)?;
        validate_username(&input.username)?;
        validate_email(&input.email)?;
        check_personal_name("first_name", &input.first_name)?;
        check_personal_name("last_name", &input.last_name)?;

        if self.repo.find_by_username(&input.username).await?.is_some() {
            return Err(ApiError::validation("username", ValidationReason::Conflict));
        }
        if self.repo.find_by_email(&input.email).await?.is_some() {
            return Err(ApiError::validation("email", ValidationReason::Conflict));
        }
        let user = User {
            role: input.role,
            first_name: input.first_name,
            last_name: input.last_name,
            bio: input.bio,
            ..User::new(input.username, input.email)
        };
        if !self.repo.create(&user).await? {
            return Err(ApiError::validation("username", ValidationReason::Conflict));
        }
        Ok(user)
    }
}

pub struct UpdateUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> UpdateUserUseCase<R> {
    pub async fn execute(
        &self,
        actor: &Subject,
        username: &str,
        patch: ProfilePatch,
    ) -> Result<User, ApiError> {
        authorize(actor, Action::Update, &Resource::Account)?;
        let user = find_account(&self.repo, username).await?;
        apply_patch(&self.repo, user, patch).await
    }
}

pub struct DeleteUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> DeleteUserUseCase<R> {
    pub async fn execute(&self, actor: &Subject, username: &str) -> Result<(), ApiError> {
        authorize(actor, Action::Delete, &Resource::Account)?;
        let user = find_account(&self.repo, username).await?;
        if !self.repo.delete(user.id).await? {
            return Err(ApiError::UserNotFound);
        }
        tracing::info!(user_id = %user.id, "user deleted");
        Ok(())
    }
}

// ── Superuser bootstrap (operator CLI) ───────────────────────────────────────

pub struct BootstrapSuperuserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> BootstrapSuperuserUseCase<R> {
    /// Create the account, or promote it if the exact `(username, email)` pair
    /// already exists.
    pub async fn execute(&self, username: String, email: String) -> Result<User, ApiError> {
        validate_username(&username)?;
        validate_email(&email)?;

        let existing = find_exact(&self.repo, &username, &email).await?;
        let user = User {
            role: Role::Admin,
            is_superuser: true,
            ..existing
                .clone()
                .unwrap_or_else(|| User::new(username, email))
        };
        let saved = if existing.is_some() {
            self.repo.update(&user).await?
        } else {
            self.repo.create(&user).await?
        };
        if !saved {
            return Err(ApiError::validation("username", ValidationReason::Conflict));
        }
        Ok(user)
    }
}
