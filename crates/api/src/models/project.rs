//! Project domain types and API views.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crowdlocal_core::{Category, Money, ProjectId, ProjectStatus, UserId};

use super::user::PublicUser;

/// A campaign (domain type). Founder is an unresolved reference here; the
/// view types resolve it.
#[derive(Debug, Clone)]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    pub tagline: String,
    pub description: String,
    pub founder_id: UserId,
    /// Fixed at creation.
    pub goal: Money,
    /// Monotonically non-decreasing; moves only through the funding
    /// transaction.
    pub current_funding: Money,
    pub days_remaining: i32,
    pub category: Category,
    pub status: ProjectStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// List-item view: founder resolved, contributors as IDs.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectView {
    pub id: ProjectId,
    pub title: String,
    pub tagline: String,
    pub description: String,
    pub founder: PublicUser,
    pub goal: Money,
    pub current_funding: Money,
    pub funding_percent: Decimal,
    pub days_remaining: i32,
    pub category: Category,
    pub status: ProjectStatus,
    pub contributors: Vec<UserId>,
    pub created_at: DateTime<Utc>,
}

impl ProjectView {
    /// Assemble a list-item view.
    #[must_use]
    pub fn new(project: Project, founder: PublicUser, contributors: Vec<UserId>) -> Self {
        let funding_percent = project.current_funding.percent_of(project.goal);
        Self {
            id: project.id,
            title: project.title,
            tagline: project.tagline,
            description: project.description,
            founder,
            goal: project.goal,
            current_funding: project.current_funding,
            funding_percent,
            days_remaining: project.days_remaining,
            category: project.category,
            status: project.status,
            contributors,
            created_at: project.created_at,
        }
    }
}

/// Detail view: founder and contributors both resolved to public views.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetail {
    pub id: ProjectId,
    pub title: String,
    pub tagline: String,
    pub description: String,
    pub founder: PublicUser,
    pub goal: Money,
    pub current_funding: Money,
    pub funding_percent: Decimal,
    pub days_remaining: i32,
    pub category: Category,
    pub status: ProjectStatus,
    pub contributors: Vec<PublicUser>,
    pub created_at: DateTime<Utc>,
}

impl ProjectDetail {
    /// Assemble a detail view.
    #[must_use]
    pub fn new(project: Project, founder: PublicUser, contributors: Vec<PublicUser>) -> Self {
        let funding_percent = project.current_funding.percent_of(project.goal);
        Self {
            id: project.id,
            title: project.title,
            tagline: project.tagline,
            description: project.description,
            founder,
            goal: project.goal,
            current_funding: project.current_funding,
            funding_percent,
            days_remaining: project.days_remaining,
            category: project.category,
            status: project.status,
            contributors,
            created_at: project.created_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crowdlocal_core::Email;
    use rust_decimal::Decimal;

    fn sample_project(goal: i64, funding: i64) -> Project {
        Project {
            id: ProjectId::generate(),
            title: "EcoTech Solar".to_owned(),
            tagline: "Affordable solar energy for homes".to_owned(),
            description: "Panels and installation for local households".to_owned(),
            founder_id: UserId::generate(),
            goal: Money::new(Decimal::from(goal)),
            current_funding: Money::new(Decimal::from(funding)),
            days_remaining: 30,
            category: Category::Tech,
            status: ProjectStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn sample_founder() -> PublicUser {
        PublicUser {
            id: UserId::generate(),
            name: "Ada".to_owned(),
            email: Email::parse("ada@example.com").unwrap(),
        }
    }

    #[test]
    fn test_view_computes_funding_percent() {
        let view = ProjectView::new(sample_project(50_000, 32_400), sample_founder(), vec![]);
        assert_eq!(view.funding_percent, "64.8".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_view_wire_format_is_camel_case() {
        let view = ProjectView::new(sample_project(50_000, 0), sample_founder(), vec![]);
        let value = serde_json::to_value(view).unwrap();

        assert!(value.get("currentFunding").is_some());
        assert!(value.get("daysRemaining").is_some());
        assert!(value.get("fundingPercent").is_some());
        assert!(value.get("current_funding").is_none());
        // Founder is resolved, never a bare id
        assert!(value["founder"].get("name").is_some());
    }

    #[test]
    fn test_detail_resolves_contributors() {
        let contributor = sample_founder();
        let detail = ProjectDetail::new(
            sample_project(50_000, 100),
            sample_founder(),
            vec![contributor.clone()],
        );
        let value = serde_json::to_value(detail).unwrap();
        assert_eq!(value["contributors"][0]["name"], contributor.name);
    }
}
