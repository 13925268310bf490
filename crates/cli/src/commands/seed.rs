//! Seed the database with demo users and campaigns.
//!
//! Goes through the same services the API uses, so seeded rows carry real
//! password hashes and the funding ledger stays consistent with the
//! campaign totals.
//!
//! # Usage
//!
//! ```bash
//! crowdlocal-cli seed
//! ```

use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use tracing::info;

use crowdlocal_api::services::auth::{AuthError, AuthService};
use crowdlocal_api::services::projects::{CreateProjectInput, ProjectService};
use crowdlocal_core::{Category, Money};

use super::{CommandError, database_url};

/// Demo founder account. The password is only for local development.
const FOUNDER_EMAIL: &str = "founder@crowdlocal.dev";
const BACKER_EMAIL: &str = "backer@crowdlocal.dev";
const DEMO_PASSWORD: &str = "local-dev-only";

struct DemoCampaign {
    title: &'static str,
    tagline: &'static str,
    description: &'static str,
    goal: i64,
    funded: i64,
    days_remaining: i32,
    category: Category,
}

/// The campaigns the original prototype shipped as mock data.
const DEMO_CAMPAIGNS: &[DemoCampaign] = &[
    DemoCampaign {
        title: "EcoTech Solar",
        tagline: "Affordable solar energy for homes",
        description: "Panels, batteries, and installation for local households.",
        goal: 50_000,
        funded: 30_000,
        days_remaining: 30,
        category: Category::Tech,
    },
    DemoCampaign {
        title: "Local Farming Co",
        tagline: "Community supported agriculture",
        description: "Weekly produce boxes from farms within twenty miles.",
        goal: 35_000,
        funded: 15_750,
        days_remaining: 21,
        category: Category::Community,
    },
    DemoCampaign {
        title: "Tech Education",
        tagline: "Free coding bootcamp for youth",
        description: "A twelve-week evening program with donated laptops.",
        goal: 40_000,
        funded: 30_000,
        days_remaining: 45,
        category: Category::Tech,
    },
    DemoCampaign {
        title: "Community Center",
        tagline: "Revitalize local gathering space",
        description: "Repairs, accessibility upgrades, and a shared workshop.",
        goal: 60_000,
        funded: 33_000,
        days_remaining: 60,
        category: Category::Design,
    },
];

/// Seed demo data. Refuses to run twice.
///
/// # Errors
///
/// Returns an error if the database is unreachable or already seeded.
pub async fn run() -> Result<(), CommandError> {
    dotenvy::dotenv().ok();

    let database_url = database_url()?;

    info!("Connecting to database...");
    let pool = PgPool::connect(database_url.expose_secret()).await?;

    seed(&pool).await
}

async fn seed(pool: &PgPool) -> Result<(), CommandError> {
    let auth = AuthService::new(pool);

    let founder = match auth.signup("Demo Founder", FOUNDER_EMAIL, DEMO_PASSWORD).await {
        Ok(user) => user,
        Err(AuthError::EmailTaken) => {
            return Err(CommandError::Seed(
                "database already seeded (demo founder exists)".to_owned(),
            ));
        }
        Err(e) => return Err(CommandError::Seed(e.to_string())),
    };
    let backer = auth
        .signup("Demo Backer", BACKER_EMAIL, DEMO_PASSWORD)
        .await
        .map_err(|e| CommandError::Seed(e.to_string()))?;

    info!(founder = %founder.email, backer = %backer.email, "Demo users created");

    let projects = ProjectService::new(pool);

    for campaign in DEMO_CAMPAIGNS {
        let input = CreateProjectInput {
            title: Some(campaign.title.to_owned()),
            tagline: Some(campaign.tagline.to_owned()),
            description: Some(campaign.description.to_owned()),
            goal: Some(Money::new(Decimal::from(campaign.goal))),
            days_remaining: Some(campaign.days_remaining),
            category: Some(campaign.category),
        };

        let created = projects
            .create(founder.id, input)
            .await
            .map_err(|e| CommandError::Seed(e.to_string()))?;

        if campaign.funded > 0 {
            projects
                .fund(
                    backer.id,
                    created.id,
                    Some(Money::new(Decimal::from(campaign.funded))),
                )
                .await
                .map_err(|e| CommandError::Seed(e.to_string()))?;
        }

        info!(title = campaign.title, "Campaign seeded");
    }

    info!("Seeding complete!");
    Ok(())
}
