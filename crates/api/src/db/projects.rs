//! Project repository: campaign CRUD and the funding transaction.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crowdlocal_core::{Category, Email, Money, ProjectId, ProjectStatus, UserId};

use super::RepositoryError;
use crate::models::project::Project;
use crate::models::user::PublicUser;

/// Row shape shared by the project queries.
#[derive(sqlx::FromRow)]
struct ProjectRow {
    id: ProjectId,
    title: String,
    tagline: String,
    description: String,
    founder_id: UserId,
    goal: Money,
    current_funding: Money,
    days_remaining: i32,
    category: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProjectRow {
    fn into_domain(self) -> Result<Project, RepositoryError> {
        let category: Category = self.category.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid category in database: {e}"))
        })?;
        let status: ProjectStatus = self.status.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid status in database: {e}"))
        })?;

        Ok(Project {
            id: self.id,
            title: self.title,
            tagline: self.tagline,
            description: self.description,
            founder_id: self.founder_id,
            goal: self.goal,
            current_funding: self.current_funding,
            days_remaining: self.days_remaining,
            category,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const PROJECT_COLUMNS: &str = "id, title, tagline, description, founder_id, goal, \
     current_funding, days_remaining, category, status, created_at, updated_at";

/// Fields required to insert a new campaign.
pub struct NewProject<'a> {
    pub title: &'a str,
    pub tagline: &'a str,
    pub description: &'a str,
    pub founder_id: UserId,
    pub goal: Money,
    pub days_remaining: i32,
    pub category: Category,
}

/// Partial update: `None` leaves the stored value untouched; a present value
/// overwrites, even if it is empty. Founder, goal, and funding totals are
/// deliberately absent.
#[derive(Debug, Default)]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub tagline: Option<String>,
    pub description: Option<String>,
    pub days_remaining: Option<i32>,
    pub category: Option<Category>,
    pub status: Option<ProjectStatus>,
}

/// Result of attempting to fund a project.
pub enum FundOutcome {
    /// Funding applied; the refreshed project is returned.
    Funded(Project),
    /// No project with that ID exists.
    NotFound,
    /// The project exists but its status does not accept funding.
    NotAccepting,
}

/// Repository for project database operations.
pub struct ProjectRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProjectRepository<'a> {
    /// Create a new project repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All active campaigns, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` on an unparseable row.
    pub async fn list_active(&self) -> Result<Vec<Project>, RepositoryError> {
        let rows: Vec<ProjectRow> = sqlx::query_as(&format!(
            r"
            SELECT {PROJECT_COLUMNS}
            FROM projects
            WHERE status = 'active'
            ORDER BY created_at DESC
            "
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(ProjectRow::into_domain).collect()
    }

    /// Get a single campaign by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` on an unparseable row.
    pub async fn get(&self, id: ProjectId) -> Result<Option<Project>, RepositoryError> {
        let row: Option<ProjectRow> = sqlx::query_as(&format!(
            r"
            SELECT {PROJECT_COLUMNS}
            FROM projects
            WHERE id = $1
            "
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(ProjectRow::into_domain).transpose()
    }

    /// Insert a new campaign with zero funding and active status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, new: NewProject<'_>) -> Result<Project, RepositoryError> {
        let row: ProjectRow = sqlx::query_as(&format!(
            r"
            INSERT INTO projects
                (title, tagline, description, founder_id, goal, days_remaining, category)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {PROJECT_COLUMNS}
            "
        ))
        .bind(new.title)
        .bind(new.tagline)
        .bind(new.description)
        .bind(new.founder_id)
        .bind(new.goal)
        .bind(new.days_remaining)
        .bind(new.category.to_string())
        .fetch_one(self.pool)
        .await?;

        row.into_domain()
    }

    /// Apply a partial update. Absent fields keep their stored value.
    ///
    /// Returns `None` if no project with that ID exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update(
        &self,
        id: ProjectId,
        patch: &ProjectPatch,
    ) -> Result<Option<Project>, RepositoryError> {
        let row: Option<ProjectRow> = sqlx::query_as(&format!(
            r"
            UPDATE projects SET
                title = COALESCE($2, title),
                tagline = COALESCE($3, tagline),
                description = COALESCE($4, description),
                days_remaining = COALESCE($5, days_remaining),
                category = COALESCE($6, category),
                status = COALESCE($7, status),
                updated_at = now()
            WHERE id = $1
            RETURNING {PROJECT_COLUMNS}
            "
        ))
        .bind(id)
        .bind(patch.title.as_deref())
        .bind(patch.tagline.as_deref())
        .bind(patch.description.as_deref())
        .bind(patch.days_remaining)
        .bind(patch.category.map(|c| c.to_string()))
        .bind(patch.status.map(|s| s.to_string()))
        .fetch_optional(self.pool)
        .await?;

        row.map(ProjectRow::into_domain).transpose()
    }

    /// Delete a campaign. The contribution ledger rows cascade.
    ///
    /// Returns `true` if a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: ProjectId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Apply one contribution as a single unit of work.
    ///
    /// The increment and the ledger insert commit together or not at all, so
    /// `current_funding` can never drift from the recorded contributions.
    /// The guarded `UPDATE` takes the row lock, which serializes concurrent
    /// contributions to the same project: N concurrent calls of amount A
    /// always add exactly N*A.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails; the
    /// transaction rolls back.
    pub async fn fund(
        &self,
        project_id: ProjectId,
        user_id: UserId,
        amount: Money,
    ) -> Result<FundOutcome, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row: Option<ProjectRow> = sqlx::query_as(&format!(
            r"
            UPDATE projects
            SET current_funding = current_funding + $2, updated_at = now()
            WHERE id = $1 AND status = 'active'
            RETURNING {PROJECT_COLUMNS}
            "
        ))
        .bind(project_id)
        .bind(amount)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            // Distinguish a missing project from one that stopped accepting
            // funding.
            let status: Option<String> =
                sqlx::query_scalar("SELECT status FROM projects WHERE id = $1")
                    .bind(project_id)
                    .fetch_optional(&mut *tx)
                    .await?;

            return Ok(match status {
                None => FundOutcome::NotFound,
                Some(_) => FundOutcome::NotAccepting,
            });
        };

        sqlx::query(
            r"
            INSERT INTO contributions (project_id, user_id, amount)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(project_id)
        .bind(user_id)
        .bind(amount)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(FundOutcome::Funded(row.into_domain()?))
    }

    /// Contributors of a project as public views, each user at most once,
    /// ordered by first contribution.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored email is invalid.
    pub async fn contributors(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<PublicUser>, RepositoryError> {
        let rows: Vec<(UserId, String, String)> = sqlx::query_as(
            r"
            SELECT u.id, u.name, u.email
            FROM users u
            JOIN (
                SELECT user_id, MIN(created_at) AS first_contribution
                FROM contributions
                WHERE project_id = $1
                GROUP BY user_id
            ) c ON c.user_id = u.id
            ORDER BY c.first_contribution
            ",
        )
        .bind(project_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter()
            .map(|(id, name, email)| {
                let email = Email::parse(&email).map_err(|e| {
                    RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
                })?;
                Ok(PublicUser { id, name, email })
            })
            .collect()
    }

    /// Contributor IDs for a batch of projects, for list assembly.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn contributor_ids(
        &self,
        project_ids: &[ProjectId],
    ) -> Result<Vec<(ProjectId, UserId)>, RepositoryError> {
        if project_ids.is_empty() {
            return Ok(Vec::new());
        }

        let raw_ids: Vec<Uuid> = project_ids.iter().map(|id| id.as_uuid()).collect();

        let rows: Vec<(ProjectId, UserId)> = sqlx::query_as(
            r"
            SELECT project_id, user_id
            FROM contributions
            WHERE project_id = ANY($1)
            GROUP BY project_id, user_id
            ORDER BY project_id, MIN(created_at)
            ",
        )
        .bind(&raw_ids)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }
}
