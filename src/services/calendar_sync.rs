use tracing::{debug, info};

use crate::client::CalendarApi;
use crate::error::{Result, SyncError};
use crate::models::calendar::{Event, SyncResponse};
use crate::models::reservation::Reservation;
use crate::services::directory::CalendarDirectory;
use crate::services::event_builder::{build_event, EventCategory};

/// Update the event when an id from an earlier call is known, otherwise insert one.
///
/// Returns the id Google reports for the stored event.
pub async fn upsert_event(
    api: &dyn CalendarApi,
    calendar_id: &str,
    existing_id: Option<&str>,
    event: &Event,
) -> Result<String> {
    let stored = match existing_id {
        Some(event_id) => api.update_event(calendar_id, event_id, event).await?,
        None => api.insert_event(calendar_id, event).await?,
    };

    stored.id.ok_or_else(|| SyncError::CalendarApi {
        status: 200,
        message: "event response carried no id".to_string(),
    })
}

/// Push one reservation into Google Calendar.
///
/// Categories are applied in order and the first failure aborts the call;
/// events already written stay written.
pub async fn sync_reservation(
    api: &dyn CalendarApi,
    central_calendar_id: &str,
    reservation: &Reservation,
) -> Result<SyncResponse> {
    let directory = CalendarDirectory::from_entries(api.list_calendars().await?);
    debug!("Calendar directory holds {} names", directory.len());

    let mut response = SyncResponse::default();

    for category in EventCategory::ALL {
        if !category.is_eligible(reservation) {
            info!(
                "Skipping {} event for {} (status '{}')",
                category, reservation.name, reservation.status
            );
            continue;
        }

        let calendar_id = match category {
            EventCategory::Box => directory
                .resolve(&reservation.box_name)
                .ok_or_else(|| SyncError::CalendarNotFound(reservation.box_name.clone()))?,
            EventCategory::Collect | EventCategory::Return => central_calendar_id,
        };

        let existing_id = category.existing_event_id(reservation);
        let event = build_event(category, reservation);
        let event_id = upsert_event(api, calendar_id, existing_id, &event).await?;

        info!(
            "{} {} event {} for {}",
            if existing_id.is_some() { "Updated" } else { "Inserted" },
            category,
            event_id,
            reservation.name
        );

        match category {
            EventCategory::Collect => response.collect_calendar_id = Some(event_id),
            EventCategory::Return => response.return_calendar_id = Some(event_id),
            EventCategory::Box => response.box_cal_id = Some(event_id),
        }
    }

    Ok(response)
}

#[cfg(test)]
#[path = "calendar_sync_test.rs"]
mod calendar_sync_test;
