//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::handlers::health_handler::{HealthResponse, ServiceHealth, ServiceStatus};
use crate::handlers::registration_handler::{CreateSessionRequest, SessionView};
use domain::{AddressInput, ContractInput, PersonalInfoInput, RegistrationDraft, StoredRegistration};
use registration_service_lib::{StepDescriptor, StepKind, StepMarker, StepStatus};

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health_handler::health_check,
        crate::handlers::registration_handler::create_session,
        crate::handlers::registration_handler::get_session,
        crate::handlers::registration_handler::bind_personal_info,
        crate::handlers::registration_handler::bind_address,
        crate::handlers::registration_handler::bind_contract,
        crate::handlers::registration_handler::advance,
        crate::handlers::registration_handler::retreat,
        crate::handlers::registration_handler::delete_session,
    ),
    components(
        schemas(
            HealthResponse,
            ServiceStatus,
            ServiceHealth,
            CreateSessionRequest,
            SessionView,
            PersonalInfoInput,
            AddressInput,
            ContractInput,
            RegistrationDraft,
            StoredRegistration,
            StepDescriptor,
            StepKind,
            StepMarker,
            StepStatus,
        )
    ),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Registration", description = "Multi-step registration wizard"),
    )
)]
pub struct ApiDoc;
