/**
 * Assessment and Progress Handlers
 *
 * POST /api/assessments  - save a completed career assessment
 * POST /api/progress     - record that a learning resource was viewed
 * GET  /api/user/data    - latest assessment plus per-user counts
 */

use axum::{extract::State, http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};

use crate::backend::error::BackendResult;
use crate::backend::middleware::{AuthUser, JsonBody};
use crate::backend::server::state::AppState;
use crate::backend::store::{Assessment, LearningProgress, NewAssessment, NewProgress, RecordKind};
use crate::shared::SharedError;

#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct SaveAssessmentRequest {
    /// Answers keyed by question id; must be a JSON object
    pub answers: serde_json::Value,
    pub career_path: String,
}

impl SaveAssessmentRequest {
    fn validate(self) -> Result<(serde_json::Value, String), SharedError> {
        if !self.answers.is_object() {
            return Err(SharedError::validation("answers", "Answers must be an object"));
        }
        let career_path = self.career_path.trim().to_string();
        if career_path.is_empty() {
            return Err(SharedError::validation("careerPath", "Career path is required"));
        }
        Ok((self.answers, career_path))
    }
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SaveAssessmentResponse {
    pub success: bool,
    pub assessment_id: String,
    pub data: Assessment,
}

#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ProgressRequest {
    pub resource_id: String,
    pub resource_type: String,
    pub title: String,
    pub url: Option<String>,
    pub completed: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub assessment_count: u64,
    pub chat_session_count: u64,
    pub resources_viewed_count: u64,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UserDataResponse {
    pub latest_assessment: Option<Assessment>,
    pub stats: UserStats,
}

/// POST /api/assessments
pub async fn save_assessment(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    JsonBody(request): JsonBody<SaveAssessmentRequest>,
) -> BackendResult<(StatusCode, Json<SaveAssessmentResponse>)> {
    let (answers, career_path) = request.validate()?;

    let assessment = state
        .store
        .insert_assessment(NewAssessment {
            user_id: identity.id,
            answers,
            career_path,
        })
        .await?;
    tracing::info!("Assessment {} saved for user {}", assessment.id, identity.id);

    Ok((
        StatusCode::CREATED,
        Json(SaveAssessmentResponse {
            success: true,
            assessment_id: assessment.id.to_string(),
            data: assessment,
        }),
    ))
}

/// POST /api/progress
pub async fn record_progress(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    JsonBody(request): JsonBody<ProgressRequest>,
) -> BackendResult<(StatusCode, Json<LearningProgress>)> {
    let resource_id = request.resource_id.trim().to_string();
    if resource_id.is_empty() {
        return Err(SharedError::validation("resourceId", "Resource id is required").into());
    }
    let resource_type = request.resource_type.trim().to_string();
    if resource_type.is_empty() {
        return Err(SharedError::validation("resourceType", "Resource type is required").into());
    }

    let progress = state
        .store
        .record_progress(NewProgress {
            user_id: identity.id,
            resource_id,
            resource_type,
            title: request.title.trim().to_string(),
            url: request.url.filter(|u| !u.trim().is_empty()),
            completed: request.completed,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(progress)))
}

/// GET /api/user/data
///
/// The four reads run concurrently; the first failure fails the request.
pub async fn user_data(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> BackendResult<Json<UserDataResponse>> {
    let store = &state.store;
    let user_id = identity.id;

    let (latest_assessment, assessment_count, chat_session_count, resources_viewed_count) = tokio::try_join!(
        store.latest_assessment(user_id),
        store.count_by_user(RecordKind::Assessments, user_id),
        store.count_by_user(RecordKind::ChatSessions, user_id),
        store.count_by_user(RecordKind::LearningProgress, user_id),
    )?;

    Ok(Json(UserDataResponse {
        latest_assessment,
        stats: UserStats {
            assessment_count,
            chat_session_count,
            resources_viewed_count,
        },
    }))
}
