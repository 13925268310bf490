//! Project route handlers: campaign CRUD and funding.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use crowdlocal_core::{Category, Money, ProjectId, ProjectStatus};

use crate::error::ApiResult;
use crate::middleware::AuthUser;
use crate::models::project::{ProjectDetail, ProjectView};
use crate::services::projects::{CreateProjectInput, ProjectService, UpdateProjectInput};
use crate::state::AppState;

/// Campaign creation body. All fields are required; they are `Option`s so a
/// missing one yields a 400 with a message rather than a deserialization
/// error.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub title: Option<String>,
    pub tagline: Option<String>,
    pub description: Option<String>,
    pub goal: Option<Money>,
    pub days_remaining: Option<i32>,
    pub category: Option<Category>,
}

/// Campaign update body: a patch. A field absent from the JSON leaves the
/// stored value untouched; a present field overwrites it. Founder, goal, and
/// funding totals are not patchable and have no field here.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    pub title: Option<String>,
    pub tagline: Option<String>,
    pub description: Option<String>,
    pub days_remaining: Option<i32>,
    pub category: Option<Category>,
    pub status: Option<ProjectStatus>,
}

/// Funding body.
#[derive(Debug, Deserialize)]
pub struct FundRequest {
    pub amount: Option<Money>,
}

/// Mutation responses carry a message plus the refreshed project.
#[derive(Debug, Serialize)]
pub struct ProjectEnvelope {
    pub message: String,
    pub project: ProjectDetail,
}

/// Bare message response (delete).
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// All active campaigns, newest first. Unrestricted read.
///
/// # Errors
///
/// Returns 500 if a database operation fails.
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<ProjectView>>> {
    let projects = ProjectService::new(state.pool()).list_active().await?;
    Ok(Json(projects))
}

/// A single campaign with founder and contributors resolved.
///
/// # Errors
///
/// Returns 404 if no such project exists.
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<ProjectId>,
) -> ApiResult<Json<ProjectDetail>> {
    let project = ProjectService::new(state.pool()).get(id).await?;
    Ok(Json(project))
}

/// Create a campaign founded by the authenticated user.
///
/// # Errors
///
/// Returns 400 for missing/invalid fields, 401 without a valid token.
pub async fn create(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Json(body): Json<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<ProjectEnvelope>)> {
    let input = CreateProjectInput {
        title: body.title,
        tagline: body.tagline,
        description: body.description,
        goal: body.goal,
        days_remaining: body.days_remaining,
        category: body.category,
    };

    let project = ProjectService::new(state.pool()).create(actor, input).await?;

    Ok((
        StatusCode::CREATED,
        Json(ProjectEnvelope {
            message: "Project created successfully".to_owned(),
            project,
        }),
    ))
}

/// Update a campaign; founder only.
///
/// # Errors
///
/// Returns 403 if the authenticated user is not the founder, 404 if the
/// project does not exist.
pub async fn update(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<ProjectId>,
    Json(body): Json<UpdateProjectRequest>,
) -> ApiResult<Json<ProjectEnvelope>> {
    let input = UpdateProjectInput {
        title: body.title,
        tagline: body.tagline,
        description: body.description,
        days_remaining: body.days_remaining,
        category: body.category,
        status: body.status,
    };

    let project = ProjectService::new(state.pool())
        .update(actor, id, input)
        .await?;

    Ok(Json(ProjectEnvelope {
        message: "Project updated successfully".to_owned(),
        project,
    }))
}

/// Delete a campaign; founder only.
///
/// # Errors
///
/// Returns 403 if the authenticated user is not the founder, 404 if the
/// project does not exist.
pub async fn remove(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<ProjectId>,
) -> ApiResult<Json<MessageResponse>> {
    ProjectService::new(state.pool()).remove(actor, id).await?;

    Ok(Json(MessageResponse {
        message: "Project deleted successfully".to_owned(),
    }))
}

/// Contribute to a campaign.
///
/// # Errors
///
/// Returns 400 for a non-positive amount or a campaign that is not
/// accepting funding, 404 if the project does not exist.
pub async fn fund(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<ProjectId>,
    Json(body): Json<FundRequest>,
) -> ApiResult<Json<ProjectEnvelope>> {
    let project = ProjectService::new(state.pool())
        .fund(actor, id, body.amount)
        .await?;

    Ok(Json(ProjectEnvelope {
        message: "Funding successful".to_owned(),
        project,
    }))
}
