//! Registration wizard session handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{
    AddressInput, ContractInput, PersonalInfoInput, RegistrationDraft, StoredRegistration,
    ValidationContext,
};
use registration_service_lib::{StepDescriptor, StepMarker, StepPlan, Wizard, WizardState};

use crate::extractors::AppJson;
use crate::state::AppState;

/// Session creation request
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    /// Include the contract step (defaults to the server setting)
    #[schema(example = true)]
    pub show_contract_step: Option<bool>,
}

/// Snapshot of a wizard session. Passwords are never included.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub id: Uuid,
    /// `{"status":"step","index":0,"kind":"personalInfo"}`,
    /// `{"status":"submitted"}` or `{"status":"failed","reason":"..."}`
    #[schema(value_type = Object)]
    pub state: WizardState,
    pub steps: Vec<StepDescriptor>,
    pub progress: Vec<StepMarker>,
    pub draft: RegistrationDraft,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration: Option<StoredRegistration>,
}

impl SessionView {
    fn new(id: Uuid, wizard: &Wizard) -> Self {
        Self {
            id,
            state: wizard.state(),
            steps: wizard.plan().steps().to_vec(),
            progress: wizard.progress(),
            draft: wizard.draft().clone(),
            registration: wizard.submitted().cloned(),
        }
    }
}

/// Create registration session routes
pub fn registration_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_session))
        .route("/:id", get(get_session).delete(delete_session))
        .route("/:id/personal-info", put(bind_personal_info))
        .route("/:id/address", put(bind_address))
        .route("/:id/contract", put(bind_contract))
        .route("/:id/advance", post(advance))
        .route("/:id/retreat", post(retreat))
}

/// Start a registration wizard
#[utoipa::path(
    post,
    path = "/registrations/sessions",
    tag = "Registration",
    request_body(content = CreateSessionRequest, description = "Optional; `{}` uses defaults"),
    responses(
        (status = 201, description = "Session created", body = SessionView),
        (status = 503, description = "Too many live sessions")
    )
)]
pub async fn create_session(
    State(state): State<AppState>,
    body: Option<Json<CreateSessionRequest>>,
) -> AppResult<(StatusCode, Json<SessionView>)> {
    let request = body.map(|Json(request)| request).unwrap_or_default();
    let show_contract_step = request
        .show_contract_step
        .unwrap_or(state.config.registration.show_contract_step);

    let wizard = Wizard::new(
        StepPlan::standard(show_contract_step),
        state.registrations.clone(),
    );
    let (id, wizard) = state.sessions.insert(wizard).await?;
    info!(%id, show_contract_step, "Registration session started");

    let wizard = wizard.lock().await;
    Ok((StatusCode::CREATED, Json(SessionView::new(id, &wizard))))
}

/// Get a registration session
#[utoipa::path(
    get,
    path = "/registrations/sessions/{id}",
    tag = "Registration",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    responses(
        (status = 200, description = "Session state", body = SessionView),
        (status = 404, description = "Session not found")
    )
)]
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SessionView>> {
    let wizard = state.sessions.get(id).await?;
    let wizard = wizard.lock().await;
    Ok(Json(SessionView::new(id, &wizard)))
}

/// Enter personal information
#[utoipa::path(
    put,
    path = "/registrations/sessions/{id}/personal-info",
    tag = "Registration",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    request_body = PersonalInfoInput,
    responses(
        (status = 200, description = "Draft updated", body = SessionView),
        (status = 400, description = "Malformed body or session already submitted"),
        (status = 404, description = "Session not found")
    )
)]
pub async fn bind_personal_info(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(input): AppJson<PersonalInfoInput>,
) -> AppResult<Json<SessionView>> {
    let wizard = state.sessions.get(id).await?;
    let mut wizard = wizard.lock().await;
    wizard.bind_personal_info(input)?;
    Ok(Json(SessionView::new(id, &wizard)))
}

/// Enter the postal address
#[utoipa::path(
    put,
    path = "/registrations/sessions/{id}/address",
    tag = "Registration",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    request_body = AddressInput,
    responses(
        (status = 200, description = "Draft updated", body = SessionView),
        (status = 400, description = "Malformed body or session already submitted"),
        (status = 404, description = "Session not found")
    )
)]
pub async fn bind_address(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(input): AppJson<AddressInput>,
) -> AppResult<Json<SessionView>> {
    let wizard = state.sessions.get(id).await?;
    let mut wizard = wizard.lock().await;
    wizard.bind_address(input)?;
    Ok(Json(SessionView::new(id, &wizard)))
}

/// Select a contract and accept the terms
#[utoipa::path(
    put,
    path = "/registrations/sessions/{id}/contract",
    tag = "Registration",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    request_body = ContractInput,
    responses(
        (status = 200, description = "Draft updated", body = SessionView),
        (status = 400, description = "Malformed body or session already submitted"),
        (status = 404, description = "Session not found")
    )
)]
pub async fn bind_contract(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(input): AppJson<ContractInput>,
) -> AppResult<Json<SessionView>> {
    let wizard = state.sessions.get(id).await?;
    let mut wizard = wizard.lock().await;
    wizard.bind_contract(input)?;
    Ok(Json(SessionView::new(id, &wizard)))
}

/// Validate the current step and move on (submits on the last step)
#[utoipa::path(
    post,
    path = "/registrations/sessions/{id}/advance",
    tag = "Registration",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    responses(
        (status = 200, description = "Advanced or submitted", body = SessionView),
        (status = 400, description = "Session already submitted"),
        (status = 403, description = "Data store rejected the insert"),
        (status = 404, description = "Session not found"),
        (status = 409, description = "Registration already exists"),
        (status = 422, description = "Step has invalid fields"),
        (status = 503, description = "Data store unavailable")
    )
)]
pub async fn advance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SessionView>> {
    let wizard = state.sessions.get(id).await?;
    let mut wizard = wizard.lock().await;
    wizard
        .advance(&ValidationContext::now())
        .await
        .map_err(AppError::from)?;
    Ok(Json(SessionView::new(id, &wizard)))
}

/// Go back one step
#[utoipa::path(
    post,
    path = "/registrations/sessions/{id}/retreat",
    tag = "Registration",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    responses(
        (status = 200, description = "Moved back", body = SessionView),
        (status = 404, description = "Session not found")
    )
)]
pub async fn retreat(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SessionView>> {
    let wizard = state.sessions.get(id).await?;
    let mut wizard = wizard.lock().await;
    wizard.retreat();
    Ok(Json(SessionView::new(id, &wizard)))
}

/// Abandon a session and discard its draft
#[utoipa::path(
    delete,
    path = "/registrations/sessions/{id}",
    tag = "Registration",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    responses(
        (status = 204, description = "Session discarded"),
        (status = 404, description = "Session not found")
    )
)]
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if !state.sessions.remove(id).await {
        return Err(AppError::NotFound);
    }
    info!(%id, "Registration session discarded");
    Ok(StatusCode::NO_CONTENT)
}
