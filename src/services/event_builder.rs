use std::fmt;

use crate::models::calendar::{Event, EventDateTime, Reminders};
use crate::models::reservation::Reservation;

/// Reservation statuses that put a booking on the calendars
pub const ACTIVE_STATUSES: [&str; 3] = ["Confirmed", "On Loan", "Returned"];

/// The three kinds of calendar entry kept per reservation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventCategory {
    Collect,
    Return,
    Box,
}

impl EventCategory {
    /// Processing order for a webhook call
    pub const ALL: [EventCategory; 3] = [
        EventCategory::Collect,
        EventCategory::Return,
        EventCategory::Box,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::Collect => "Collect",
            EventCategory::Return => "Return",
            EventCategory::Box => "Box",
        }
    }

    /// Id of the event created for this category on an earlier call
    pub fn existing_event_id<'a>(&self, reservation: &'a Reservation) -> Option<&'a str> {
        match self {
            EventCategory::Collect => reservation.collect_calendar_id.as_deref(),
            EventCategory::Return => reservation.return_calendar_id.as_deref(),
            EventCategory::Box => reservation.box_cal_id.as_deref(),
        }
    }

    /// Whether this reservation should have an event of this category.
    ///
    /// Collect and Return appointments additionally need the customer to
    /// have agreed the slot.
    pub fn is_eligible(&self, reservation: &Reservation) -> bool {
        if !ACTIVE_STATUSES.contains(&reservation.status.as_str()) {
            return false;
        }

        let agreed = match self {
            EventCategory::Collect => reservation.collect_agreed.as_deref(),
            EventCategory::Return => reservation.return_agreed.as_deref(),
            EventCategory::Box => return true,
        };
        agreed == Some("Y")
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn event_summary(category: EventCategory, r: &Reservation) -> String {
    format!(
        "{} Appointment - {} - {} - {} - {}",
        category, r.name, r.box_name, r.bars_needed, r.car
    )
}

pub fn event_description(r: &Reservation) -> String {
    let lines = [
        ("Name", r.name.clone()),
        ("Box", r.box_name.clone()),
        ("Status", r.status.clone()),
        ("Collect Date", r.pick_up_date.clone()),
        ("Collection Appointment", r.collection_appointment.clone()),
        ("Return Date", r.return_date.clone()),
        ("Return Appointment", r.return_appointment.clone()),
        ("Duration", format!("{} days", r.duration)),
        ("Car", r.car.clone()),
        ("Phone", r.phone.clone()),
        ("Contact", r.contact.clone()),
        ("Price", r.price.clone()),
        ("Deposit", r.deposit.clone()),
        ("Price/day", r.price_per_day.clone()),
        ("Bars", r.bars_needed.clone()),
    ];

    lines
        .iter()
        .map(|(label, value)| format!("{}: {}", label, value))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the event body for one category.
///
/// Box events span the loan as whole days. Collect and Return events are
/// pinned to the appointment instant, with the end equal to the start.
pub fn build_event(category: EventCategory, r: &Reservation) -> Event {
    let (start, end) = match category {
        EventCategory::Box => (
            EventDateTime::all_day(&r.pick_up_date),
            EventDateTime::all_day(&r.return_date),
        ),
        EventCategory::Collect => (
            EventDateTime::timed(&r.collection_appointment),
            EventDateTime::timed(&r.collection_appointment),
        ),
        EventCategory::Return => (
            EventDateTime::timed(&r.return_appointment),
            EventDateTime::timed(&r.return_appointment),
        ),
    };

    Event {
        id: None,
        summary: event_summary(category, r),
        description: event_description(r),
        start,
        end,
        reminders: Some(Reminders::standard()),
        transparency: Some("opaque".to_string()),
    }
}
