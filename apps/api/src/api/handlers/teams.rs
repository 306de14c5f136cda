use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::AppState;
use crate::domain::team::{Team, TeamMember, TeamOrigin, TeamScope};
use crate::services::{ExcludedEntry, GenerationOutcome, ValidationResult};

/// Request body for team generation
#[derive(Debug, Deserialize)]
pub struct GenerateTeamsRequest {
    pub club_id: Uuid,
    pub discipline_id: Uuid,
    pub season: i32,
    /// Return the proposal without replacing stored teams
    #[serde(default)]
    pub dry_run: bool,
}

/// Request body for creating a manual team
#[derive(Debug, Deserialize)]
pub struct CreateTeamRequest {
    pub club_id: Uuid,
    pub discipline_id: Uuid,
    pub season: i32,
    #[serde(default)]
    pub member_ids: Vec<Uuid>,
}

/// Request body for checking a membership without saving it
#[derive(Debug, Deserialize)]
pub struct ValidateMembershipRequest {
    pub team_id: Option<Uuid>,
    pub member_ids: Vec<Uuid>,
    pub discipline_id: Uuid,
    pub season: i32,
}

#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    pub shooter_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct ListTeamsQuery {
    pub discipline_id: Uuid,
    pub season: i32,
    pub club_id: Option<Uuid>,
}

/// Team as returned by every endpoint
#[derive(Debug, Serialize)]
pub struct TeamResponse {
    pub id: Uuid,
    pub club_id: Uuid,
    pub discipline_id: Uuid,
    pub season: i32,
    pub number: i32,
    pub origin: TeamOrigin,
    pub complete: bool,
    pub total_score: Decimal,
    pub members: Vec<TeamMember>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Team> for TeamResponse {
    fn from(team: &Team) -> Self {
        Self {
            id: team.id(),
            club_id: team.club_id(),
            discipline_id: team.discipline_id(),
            season: team.season(),
            number: team.number(),
            origin: team.origin(),
            complete: team.is_complete(),
            total_score: team.total_score(),
            members: team.members().to_vec(),
            created_at: team.created_at(),
            updated_at: team.updated_at(),
        }
    }
}

/// Response from team generation
#[derive(Debug, Serialize)]
pub struct GenerationResponse {
    pub club_id: Uuid,
    pub discipline_id: Uuid,
    pub season: i32,
    pub persisted: bool,
    pub teams: Vec<TeamResponse>,
    pub excluded: Vec<ExcludedEntry>,
}

impl From<GenerationOutcome> for GenerationResponse {
    fn from(outcome: GenerationOutcome) -> Self {
        Self {
            club_id: outcome.scope.club_id,
            discipline_id: outcome.scope.discipline_id,
            season: outcome.scope.season,
            persisted: outcome.persisted,
            teams: outcome.teams.iter().map(TeamResponse::from).collect(),
            excluded: outcome.excluded,
        }
    }
}

/// Generate teams for one club, discipline and season
///
/// POST /api/teams/generate
pub async fn generate_teams(
    State(state): State<AppState>,
    Json(req): Json<GenerateTeamsRequest>,
) -> Result<Json<GenerationResponse>, ApiError> {
    let scope = TeamScope::new(req.club_id, req.discipline_id, req.season);
    let outcome = state.service.generate_teams(scope, !req.dry_run).await?;

    Ok(Json(GenerationResponse::from(outcome)))
}

/// Check a proposed membership
///
/// POST /api/teams/validate
pub async fn validate_membership(
    State(state): State<AppState>,
    Json(req): Json<ValidateMembershipRequest>,
) -> Result<Json<ValidationResult>, ApiError> {
    let result = state
        .service
        .validate_membership(req.team_id, &req.member_ids, req.discipline_id, req.season)
        .await?;

    Ok(Json(result))
}

/// Create a manual team
///
/// POST /api/teams
pub async fn create_team(
    State(state): State<AppState>,
    Json(req): Json<CreateTeamRequest>,
) -> Result<(StatusCode, Json<TeamResponse>), ApiError> {
    let scope = TeamScope::new(req.club_id, req.discipline_id, req.season);
    let team = state.service.create_team(scope, &req.member_ids).await?;

    Ok((StatusCode::CREATED, Json(TeamResponse::from(&team))))
}

/// List teams of a discipline and season
///
/// GET /api/teams?discipline_id=..&season=..&club_id=..
pub async fn list_teams(
    State(state): State<AppState>,
    Query(query): Query<ListTeamsQuery>,
) -> Result<Json<Vec<TeamResponse>>, ApiError> {
    let teams = state
        .service
        .list_teams(query.discipline_id, query.season, query.club_id)
        .await?;

    Ok(Json(teams.iter().map(TeamResponse::from).collect()))
}

/// Get a team by ID
///
/// GET /api/teams/:id
pub async fn get_team(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TeamResponse>, ApiError> {
    let team = state.service.get_team(id).await?;

    Ok(Json(TeamResponse::from(&team)))
}

/// Delete a team
///
/// DELETE /api/teams/:id
pub async fn delete_team(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.service.delete_team(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Add a shooter to a team
///
/// POST /api/teams/:id/members
pub async fn add_member(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AddMemberRequest>,
) -> Result<Json<TeamResponse>, ApiError> {
    let team = state.service.add_member(id, req.shooter_id).await?;

    Ok(Json(TeamResponse::from(&team)))
}

/// Remove a shooter from a team
///
/// DELETE /api/teams/:id/members/:shooter_id
pub async fn remove_member(
    State(state): State<AppState>,
    Path((id, shooter_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<TeamResponse>, ApiError> {
    let team = state.service.remove_member(id, shooter_id).await?;

    Ok(Json(TeamResponse::from(&team)))
}
