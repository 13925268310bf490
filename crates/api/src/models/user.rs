//! User domain types.
//!
//! The password hash never appears on any of these types; it stays inside
//! the repository and the login path.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crowdlocal_core::{Email, ProjectId, UserId};

/// A registered user (domain type).
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address (lowercased, unique).
    pub email: Email,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// The public view of this user, safe to embed in any response.
    #[must_use]
    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// Identity resolution for founders and contributors.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: UserId,
    pub name: String,
    pub email: Email,
}

/// The authenticated user's own view: account data plus the projects they
/// founded and the projects they have contributed to.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub created_projects: Vec<ProjectId>,
    pub funded_projects: Vec<ProjectId>,
    pub created_at: DateTime<Utc>,
}

impl UserView {
    /// Assemble a view from the domain user and their project id sets.
    #[must_use]
    pub fn new(user: User, created: Vec<ProjectId>, funded: Vec<ProjectId>) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_projects: created,
            funded_projects: funded,
            created_at: user.created_at,
        }
    }
}
