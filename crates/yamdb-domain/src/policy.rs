//! Authorization engine.
//!
//! [`allowed`] is a pure function of `(subject, action, resource)`. Rules, in
//! precedence order:
//!
//! 1. `List`/`Retrieve` on titles, categories, genres, reviews and comments is
//!    open to everyone, including anonymous callers.
//! 2. `Create` on reviews and comments requires an authenticated caller.
//! 3. `Update`/`Delete` on reviews and comments: the author, any admin, or any
//!    moderator. Moderators act on other users' content as a blanket override.
//! 4. `Create`/`Update`/`Delete` on categories, genres and titles: admins only.
//!    A moderator is not an admin here.
//! 5. Account administration: admins only. A caller's own profile: that caller.
//! 6. Everything else is denied.

use crate::id::UserId;
use crate::user::Role;

/// An authenticated caller, as asserted by a verified access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub id: UserId,
    pub role: Role,
    pub is_superuser: bool,
}

impl Principal {
    /// Admin-equivalent: `role == admin` OR superuser, regardless of role.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin || self.is_superuser
    }

    pub fn is_moderator(&self) -> bool {
        self.role == Role::Moderator
    }
}

/// Who is asking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    Anonymous,
    Authenticated(Principal),
}

impl Subject {
    pub fn principal(&self) -> Option<&Principal> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(p) => Some(p),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.principal().is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.principal().is_some_and(Principal::is_admin)
    }
}

impl From<Principal> for Subject {
    fn from(p: Principal) -> Self {
        Self::Authenticated(p)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    List,
    Retrieve,
    Create,
    Update,
    Delete,
}

impl Action {
    pub fn is_read_only(self) -> bool {
        matches!(self, Self::List | Self::Retrieve)
    }
}

/// What is being acted on.
///
/// `author` is `None` for collection-level checks (list, create) where no
/// existing object is involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Title,
    Category,
    Genre,
    Review { author: Option<UserId> },
    Comment { author: Option<UserId> },
    /// Any account, managed through the admin user endpoints.
    Account,
    /// The caller's own profile (`/users/me`).
    Profile { owner: UserId },
}

impl Resource {
    fn is_catalog(&self) -> bool {
        matches!(self, Self::Title | Self::Category | Self::Genre)
    }

    fn content_author(&self) -> Option<Option<UserId>> {
        match *self {
            Self::Review { author } | Self::Comment { author } => Some(author),
            _ => None,
        }
    }
}

pub fn allowed(subject: &Subject, action: Action, resource: &Resource) -> bool {
    let content_author = resource.content_author();

    // Rule 1
    if action.is_read_only() && (resource.is_catalog() || content_author.is_some()) {
        return true;
    }

    let Some(principal) = subject.principal() else {
        return false;
    };

    match (action, resource) {
        // Rule 2
        (Action::Create, _) if content_author.is_some() => true,
        // Rule 3
        (Action::Update | Action::Delete, _) if content_author.is_some() => {
            let is_author = content_author.flatten() == Some(principal.id);
            is_author || principal.is_admin() || principal.is_moderator()
        }
        // Rule 4
        (Action::Create | Action::Update | Action::Delete, r) if r.is_catalog() => {
            principal.is_admin()
        }
        // Rule 5
        (_, Resource::Account) => principal.is_admin(),
        (Action::Retrieve | Action::Update, Resource::Profile { owner }) => *owner == principal.id,
        // Rule 6
        _ => false,
    }
}
