//! API Handlers

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use formgate_core::{Account, FormPayload};
use formgate_workflow::{
    AccountService, FormService, FormSummary, FormView, NewSubmission, StageActionProcessor,
    SummaryScope, SummaryService, TierActionOutcome, TierActionRequest,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the caller's role token
pub const ROLE_TOKEN_HEADER: &str = "x-key";

// ============ Response Types ============

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
        })
    }

    pub fn error(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: false,
            data: None,
            error: Some(message.into()),
        })
    }
}

pub type ApiResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

fn ok<T: Serialize>(data: T) -> ApiResult<T> {
    Ok((StatusCode::OK, ApiResponse::success(data)))
}

fn created<T: Serialize>(data: T) -> ApiResult<T> {
    Ok((StatusCode::CREATED, ApiResponse::success(data)))
}

fn role_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(ROLE_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
}

// ============ Request Types ============

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub user_name: String,
    pub phone_number: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub phone_number: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct SubmitFormRequest {
    pub phone_number: String,
    pub form_type: Option<String>,
    #[serde(default)]
    pub form_data: FormPayload,
    pub enter_date_and_time: Option<String>,
}

#[derive(Deserialize)]
pub struct TierActionBody {
    pub decision: Option<String>,
    pub reason: Option<String>,
    pub last_action_done: Option<String>,
    pub next_step: Option<String>,
}

impl From<TierActionBody> for TierActionRequest {
    fn from(body: TierActionBody) -> Self {
        Self {
            decision: body.decision,
            reason: body.reason,
            last_action_done: body.last_action_done,
            next_step: body.next_step,
        }
    }
}

// ============ Handlers ============

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Register a citizen account
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<Account> {
    let account = AccountService::new(&state.ctx)
        .register(&payload.user_name, &payload.phone_number, &payload.password)
        .await?;
    created(account)
}

/// Verify phone number + password
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Account> {
    let account = AccountService::new(&state.ctx)
        .login(&payload.phone_number, &payload.password)
        .await?;
    ok(account)
}

/// Submit a new form for the account behind `phone_number`
pub async fn submit_form(
    State(state): State<AppState>,
    Json(payload): Json<SubmitFormRequest>,
) -> ApiResult<FormView> {
    let forms = FormService::new(&state.ctx);
    let submission = NewSubmission::new(payload.form_type, payload.form_data)
        .with_enter_date_and_time(payload.enter_date_and_time);

    let form = forms.submit_by_phone(&payload.phone_number, submission).await?;
    created(forms.get(form.id).await?)
}

/// Get one form by ID
pub async fn get_form(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<FormView> {
    ok(FormService::new(&state.ctx).get(id).await?)
}

/// Forms and counts for one citizen
pub async fn list_user_forms(
    State(state): State<AppState>,
    Path(phone): Path<String>,
) -> ApiResult<FormSummary> {
    let summary = SummaryService::new(&state.ctx)
        .summarize(SummaryScope::OwnerPhone(phone))
        .await?;
    ok(summary)
}

/// All forms and counts, for any tier
pub async fn dashboard(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<FormSummary> {
    let summary = SummaryService::new(&state.ctx)
        .dashboard(role_token(&headers))
        .await?;
    ok(summary)
}

/// Approve or cancel a form as the caller's tier
pub async fn act_on_form(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<TierActionBody>,
) -> ApiResult<TierActionOutcome> {
    let outcome = StageActionProcessor::new(&state.ctx)
        .act_with_token(role_token(&headers), id, body.into())
        .await?;
    ok(outcome)
}
