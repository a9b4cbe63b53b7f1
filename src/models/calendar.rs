//! Google Calendar v3 resource shapes, limited to the fields we read or write.

use serde::{Deserialize, Serialize};

/// Entry from `users/me/calendarList`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarListEntry {
    pub id: String,
    #[serde(default)]
    pub summary: String,
}

/// One page of the calendar list
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarListPage {
    #[serde(default)]
    pub items: Vec<CalendarListEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

/// Start or end of an event: either a whole day or an instant, never both
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl EventDateTime {
    pub fn all_day(date: &str) -> Self {
        Self {
            date: Some(date.to_string()),
            date_time: None,
            time_zone: None,
        }
    }

    pub fn timed(date_time: &str) -> Self {
        Self {
            date: None,
            date_time: Some(date_time.to_string()),
            time_zone: Some("UTC".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderOverride {
    pub method: String,
    pub minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminders {
    pub use_default: bool,
    #[serde(default)]
    pub overrides: Vec<ReminderOverride>,
}

impl Reminders {
    /// Pop-up three hours and thirty minutes ahead, plus an email three hours ahead.
    pub fn standard() -> Self {
        let item = |method: &str, minutes| ReminderOverride {
            method: method.to_string(),
            minutes,
        };

        Self {
            use_default: false,
            overrides: vec![item("popup", 180), item("popup", 30), item("email", 180)],
        }
    }
}

/// Event resource, used both as request body and response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: String,
    pub start: EventDateTime,
    pub end: EventDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminders: Option<Reminders>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transparency: Option<String>,
}

/// Event ids produced by one webhook call
#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncResponse {
    #[serde(rename = "CollectCalendarID", skip_serializing_if = "Option::is_none")]
    pub collect_calendar_id: Option<String>,
    #[serde(rename = "ReturnCalendarID", skip_serializing_if = "Option::is_none")]
    pub return_calendar_id: Option<String>,
    #[serde(rename = "BoxCalID", skip_serializing_if = "Option::is_none")]
    pub box_cal_id: Option<String>,
}
