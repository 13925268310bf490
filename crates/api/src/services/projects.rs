//! Project service: campaign CRUD and the funding workflow.
//!
//! Ownership checks and input validation live here; atomicity of the
//! funding step lives in the repository transaction.

use std::collections::HashMap;

use sqlx::PgPool;
use thiserror::Error;

use crowdlocal_core::{Category, Money, ProjectId, ProjectStatus, UserId};

use crate::db::projects::{FundOutcome, NewProject, ProjectPatch, ProjectRepository};
use crate::db::users::UserRepository;
use crate::db::RepositoryError;
use crate::models::project::{Project, ProjectDetail, ProjectView};
use crate::models::user::PublicUser;

/// Errors that can occur during project operations.
#[derive(Debug, Error)]
pub enum ProjectError {
    /// Missing or malformed input.
    #[error("{0}")]
    Validation(String),

    /// No such project.
    #[error("project not found")]
    NotFound,

    /// Authenticated but not the founder.
    #[error("only the founder may modify this project")]
    Forbidden,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Campaign creation input. Fields are explicit `Option`s so a missing JSON
/// field is reported as a validation failure, not a deserialization error.
#[derive(Debug, Default)]
pub struct CreateProjectInput {
    pub title: Option<String>,
    pub tagline: Option<String>,
    pub description: Option<String>,
    pub goal: Option<Money>,
    pub days_remaining: Option<i32>,
    pub category: Option<Category>,
}

/// Campaign update input. Absent fields keep their stored value; present
/// values are applied even when falsy (empty string, zero days).
#[derive(Debug, Default)]
pub struct UpdateProjectInput {
    pub title: Option<String>,
    pub tagline: Option<String>,
    pub description: Option<String>,
    pub days_remaining: Option<i32>,
    pub category: Option<Category>,
    pub status: Option<ProjectStatus>,
}

/// Project service.
pub struct ProjectService<'a> {
    projects: ProjectRepository<'a>,
    users: UserRepository<'a>,
}

impl<'a> ProjectService<'a> {
    /// Create a new project service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            projects: ProjectRepository::new(pool),
            users: UserRepository::new(pool),
        }
    }

    /// All active campaigns, newest first, with founders resolved and
    /// contributor id sets attached.
    ///
    /// # Errors
    ///
    /// Returns `ProjectError::Repository` if a database operation fails.
    pub async fn list_active(&self) -> Result<Vec<ProjectView>, ProjectError> {
        let projects = self.projects.list_active().await?;

        let project_ids: Vec<ProjectId> = projects.iter().map(|p| p.id).collect();
        let mut contributors: HashMap<ProjectId, Vec<UserId>> = HashMap::new();
        for (project_id, user_id) in self.projects.contributor_ids(&project_ids).await? {
            contributors.entry(project_id).or_default().push(user_id);
        }

        let mut founders: HashMap<UserId, PublicUser> = HashMap::new();
        let mut views = Vec::with_capacity(projects.len());
        for project in projects {
            let founder = match founders.get(&project.founder_id) {
                Some(founder) => founder.clone(),
                None => {
                    let founder = self.resolve_founder(project.founder_id).await?;
                    founders.insert(project.founder_id, founder.clone());
                    founder
                }
            };
            let contributor_ids = contributors.remove(&project.id).unwrap_or_default();
            views.push(ProjectView::new(project, founder, contributor_ids));
        }

        Ok(views)
    }

    /// A single campaign with founder and contributors resolved.
    ///
    /// # Errors
    ///
    /// Returns `ProjectError::NotFound` if no such project exists.
    pub async fn get(&self, id: ProjectId) -> Result<ProjectDetail, ProjectError> {
        let project = self.projects.get(id).await?.ok_or(ProjectError::NotFound)?;
        self.detail(project).await
    }

    /// Create a campaign founded by `actor`.
    ///
    /// # Errors
    ///
    /// Returns `ProjectError::Validation` if a required field is missing or
    /// out of range.
    pub async fn create(
        &self,
        actor: UserId,
        input: CreateProjectInput,
    ) -> Result<ProjectDetail, ProjectError> {
        let valid = validate_create(&input)?;

        let project = self
            .projects
            .create(NewProject {
                title: valid.title,
                tagline: valid.tagline,
                description: valid.description,
                founder_id: actor,
                goal: valid.goal,
                days_remaining: valid.days_remaining,
                category: valid.category,
            })
            .await?;

        self.detail(project).await
    }

    /// Apply a founder-only partial update.
    ///
    /// # Errors
    ///
    /// Returns `ProjectError::NotFound` if no such project exists.
    /// Returns `ProjectError::Forbidden` if `actor` is not the founder.
    /// Returns `ProjectError::Validation` for out-of-range values.
    pub async fn update(
        &self,
        actor: UserId,
        id: ProjectId,
        input: UpdateProjectInput,
    ) -> Result<ProjectDetail, ProjectError> {
        let existing = self.projects.get(id).await?.ok_or(ProjectError::NotFound)?;
        if existing.founder_id != actor {
            return Err(ProjectError::Forbidden);
        }

        validate_update(&input)?;

        let patch = ProjectPatch {
            title: input.title,
            tagline: input.tagline,
            description: input.description,
            days_remaining: input.days_remaining,
            category: input.category,
            status: input.status,
        };

        let project = self
            .projects
            .update(id, &patch)
            .await?
            .ok_or(ProjectError::NotFound)?;

        self.detail(project).await
    }

    /// Delete a campaign; founder only.
    ///
    /// # Errors
    ///
    /// Returns `ProjectError::NotFound` if no such project exists.
    /// Returns `ProjectError::Forbidden` if `actor` is not the founder.
    pub async fn remove(&self, actor: UserId, id: ProjectId) -> Result<(), ProjectError> {
        let existing = self.projects.get(id).await?.ok_or(ProjectError::NotFound)?;
        if existing.founder_id != actor {
            return Err(ProjectError::Forbidden);
        }

        if !self.projects.delete(id).await? {
            return Err(ProjectError::NotFound);
        }

        Ok(())
    }

    /// Contribute `amount` to a campaign.
    ///
    /// # Errors
    ///
    /// Returns `ProjectError::Validation` unless the amount is a positive
    /// number and the project accepts funding.
    /// Returns `ProjectError::NotFound` if no such project exists.
    pub async fn fund(
        &self,
        actor: UserId,
        id: ProjectId,
        amount: Option<Money>,
    ) -> Result<ProjectDetail, ProjectError> {
        let amount = validate_amount(amount)?;

        match self.projects.fund(id, actor, amount).await? {
            FundOutcome::Funded(project) => self.detail(project).await,
            FundOutcome::NotFound => Err(ProjectError::NotFound),
            FundOutcome::NotAccepting => Err(ProjectError::Validation(
                "project is not accepting funding".to_owned(),
            )),
        }
    }

    async fn detail(&self, project: Project) -> Result<ProjectDetail, ProjectError> {
        let founder = self.resolve_founder(project.founder_id).await?;
        let contributors = self.projects.contributors(project.id).await?;
        Ok(ProjectDetail::new(project, founder, contributors))
    }

    async fn resolve_founder(&self, founder_id: UserId) -> Result<PublicUser, ProjectError> {
        // The foreign key makes a missing founder a data problem, not a 404.
        self.users
            .get_public(founder_id)
            .await?
            .ok_or_else(|| {
                ProjectError::Repository(RepositoryError::DataCorruption(format!(
                    "founder {founder_id} missing"
                )))
            })
    }
}

struct ValidCreate<'i> {
    title: &'i str,
    tagline: &'i str,
    description: &'i str,
    goal: Money,
    days_remaining: i32,
    category: Category,
}

fn validate_create(input: &CreateProjectInput) -> Result<ValidCreate<'_>, ProjectError> {
    let (
        Some(title),
        Some(tagline),
        Some(description),
        Some(goal),
        Some(days_remaining),
        Some(category),
    ) = (
        input.title.as_deref().filter(|s| !s.trim().is_empty()),
        input.tagline.as_deref().filter(|s| !s.trim().is_empty()),
        input.description.as_deref().filter(|s| !s.trim().is_empty()),
        input.goal,
        input.days_remaining,
        input.category,
    )
    else {
        return Err(ProjectError::Validation(
            "please provide all required fields".to_owned(),
        ));
    };

    if !goal.is_positive() {
        return Err(ProjectError::Validation(
            "goal must be a positive amount".to_owned(),
        ));
    }
    if days_remaining < 0 {
        return Err(ProjectError::Validation(
            "daysRemaining must not be negative".to_owned(),
        ));
    }

    Ok(ValidCreate {
        title,
        tagline,
        description,
        goal,
        days_remaining,
        category,
    })
}

fn validate_update(input: &UpdateProjectInput) -> Result<(), ProjectError> {
    if input.title.as_deref().is_some_and(|s| s.trim().is_empty()) {
        return Err(ProjectError::Validation("title cannot be empty".to_owned()));
    }
    if input.tagline.as_deref().is_some_and(|s| s.trim().is_empty()) {
        return Err(ProjectError::Validation(
            "tagline cannot be empty".to_owned(),
        ));
    }
    if input
        .description
        .as_deref()
        .is_some_and(|s| s.trim().is_empty())
    {
        return Err(ProjectError::Validation(
            "description cannot be empty".to_owned(),
        ));
    }
    if input.days_remaining.is_some_and(|d| d < 0) {
        return Err(ProjectError::Validation(
            "daysRemaining must not be negative".to_owned(),
        ));
    }

    Ok(())
}

fn validate_amount(amount: Option<Money>) -> Result<Money, ProjectError> {
    match amount {
        Some(amount) if amount.is_positive() => Ok(amount),
        _ => Err(ProjectError::Validation(
            "please provide a valid amount".to_owned(),
        )),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn money(n: i64) -> Money {
        Money::new(Decimal::from(n))
    }

    fn complete_input() -> CreateProjectInput {
        CreateProjectInput {
            title: Some("EcoTech Solar".to_owned()),
            tagline: Some("Affordable solar energy for homes".to_owned()),
            description: Some("Panels and installation for local households".to_owned()),
            goal: Some(money(50_000)),
            days_remaining: Some(30),
            category: Some(Category::Tech),
        }
    }

    #[test]
    fn test_validate_create_accepts_complete_input() {
        assert!(validate_create(&complete_input()).is_ok());
    }

    #[test]
    fn test_validate_create_rejects_missing_field() {
        let input = CreateProjectInput {
            tagline: None,
            ..complete_input()
        };
        assert!(matches!(
            validate_create(&input),
            Err(ProjectError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_create_rejects_blank_title() {
        let input = CreateProjectInput {
            title: Some("   ".to_owned()),
            ..complete_input()
        };
        assert!(validate_create(&input).is_err());
    }

    #[test]
    fn test_validate_create_rejects_non_positive_goal() {
        for goal in [0, -500] {
            let input = CreateProjectInput {
                goal: Some(money(goal)),
                ..complete_input()
            };
            assert!(validate_create(&input).is_err());
        }
    }

    #[test]
    fn test_validate_update_accepts_empty_patch() {
        assert!(validate_update(&UpdateProjectInput::default()).is_ok());
    }

    #[test]
    fn test_validate_update_accepts_zero_days() {
        // Zero is a legitimate present value, not an absence.
        let input = UpdateProjectInput {
            days_remaining: Some(0),
            ..UpdateProjectInput::default()
        };
        assert!(validate_update(&input).is_ok());
    }

    #[test]
    fn test_validate_update_rejects_blank_title() {
        let input = UpdateProjectInput {
            title: Some(String::new()),
            ..UpdateProjectInput::default()
        };
        assert!(validate_update(&input).is_err());
    }

    #[test]
    fn test_validate_amount_rejects_zero_and_negative() {
        assert!(validate_amount(Some(money(0))).is_err());
        assert!(validate_amount(Some(money(-10))).is_err());
        assert!(validate_amount(None).is_err());
    }

    #[test]
    fn test_validate_amount_accepts_positive() {
        assert_eq!(validate_amount(Some(money(100))).unwrap(), money(100));
    }
}
