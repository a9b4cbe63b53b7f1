use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Json,
};
use std::sync::Arc;
use tracing::info;

use crate::auth::verify_webhook_source;
use crate::client::CalendarConnector;
use crate::error::{Result, SyncError};
use crate::models::calendar::SyncResponse;
use crate::models::reservation::Reservation;
use crate::services::calendar_sync::sync_reservation;

/// Header the sheet automation sets on every call
pub const WEBHOOK_SOURCE_HEADER: &str = "x-webhook-source";

// AppState struct containing shared resources
pub struct AppState {
    pub connector: Arc<dyn CalendarConnector>,
    pub header_source_to_pass: String,
    pub central_calendar_id: String,
}

// Reservation webhook handler
pub async fn handle_reservation_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<SyncResponse>)> {
    let source = headers
        .get(WEBHOOK_SOURCE_HEADER)
        .and_then(|value| value.to_str().ok());

    if !verify_webhook_source(source, &state.header_source_to_pass) {
        return Err(SyncError::Unauthorized);
    }

    let reservation = Reservation::from_webhook_body(&body)?;
    info!(
        "Received reservation webhook for {} ({}, status '{}')",
        reservation.name, reservation.box_name, reservation.status
    );

    let calendars = state.connector.connect().await?;
    let response =
        sync_reservation(calendars.as_ref(), &state.central_calendar_id, &reservation).await?;

    info!("Reservation for {} synced: {:?}", reservation.name, response);
    Ok((StatusCode::OK, Json(response)))
}
