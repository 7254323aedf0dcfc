pub mod availability;
pub mod booking;

use std::sync::Arc;

use salonsync_core::errors::EngineError;
use salonsync_core::models::service::Service;
use salonsync_core::models::settings::EngineSettings;
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

/// Loads the engine settings row and converts it to the domain type.
/// Unparseable stored values (bad timezone, unknown scope) are configuration
/// errors, not storage errors.
pub(crate) async fn load_settings(state: &Arc<ApiState>) -> Result<EngineSettings, AppError> {
    let row = salonsync_db::repositories::settings::get_settings(&state.db_pool)
        .await
        .map_err(EngineError::Storage)?;

    row.into_domain()
        .map_err(|e| AppError(EngineError::Configuration(e.to_string())))
}

/// Resolves a service id to an active service, failing with ServiceNotFound
/// for absent and inactive services alike.
pub(crate) async fn load_active_service(
    state: &Arc<ApiState>,
    service_id: Uuid,
) -> Result<Service, AppError> {
    let service = salonsync_db::repositories::service::get_service_by_id(&state.db_pool, service_id)
        .await
        .map_err(EngineError::Storage)?
        .ok_or_else(|| EngineError::ServiceNotFound(format!("Service {service_id} not found")))?
        .into_domain();

    if !service.active {
        return Err(AppError(EngineError::ServiceNotFound(format!(
            "Service {service_id} is inactive"
        ))));
    }

    Ok(service)
}
