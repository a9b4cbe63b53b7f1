use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

use crate::error::{Result, SyncError};

/// Render any JSON scalar as the text the sheet showed.
fn value_to_text(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    }
}

fn free_form<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(value_to_text)
}

// Empty ids mean "no event yet", same as a missing key
fn optional_id<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = Option::<Value>::deserialize(deserializer)?.map(value_to_text);
    Ok(text.filter(|s| !s.is_empty()))
}

fn optional_free_form<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.map(value_to_text))
}

/// One row of the rental sheet, as posted by the webhook caller
#[derive(Debug, Clone, Deserialize)]
pub struct Reservation {
    #[serde(deserialize_with = "free_form")]
    pub name: String,
    #[serde(rename = "box", deserialize_with = "free_form")]
    pub box_name: String,
    #[serde(rename = "bars needed", deserialize_with = "free_form")]
    pub bars_needed: String,
    #[serde(deserialize_with = "free_form")]
    pub car: String,
    #[serde(deserialize_with = "free_form")]
    pub status: String,
    #[serde(rename = "pick up date", deserialize_with = "free_form")]
    pub pick_up_date: String,
    #[serde(rename = "return date", deserialize_with = "free_form")]
    pub return_date: String,
    #[serde(deserialize_with = "free_form")]
    pub phone: String,
    #[serde(deserialize_with = "free_form")]
    pub contact: String,
    #[serde(deserialize_with = "free_form")]
    pub price: String,
    #[serde(rename = "Deposit", alias = "deposit", deserialize_with = "free_form")]
    pub deposit: String,
    #[serde(rename = "price/day", deserialize_with = "free_form")]
    pub price_per_day: String,
    #[serde(deserialize_with = "free_form")]
    pub duration: String,
    #[serde(rename = "Collection Appointment", deserialize_with = "free_form")]
    pub collection_appointment: String,
    #[serde(rename = "Return Appointment", deserialize_with = "free_form")]
    pub return_appointment: String,
    #[serde(rename = "Collect Agreed", default, deserialize_with = "optional_free_form")]
    pub collect_agreed: Option<String>,
    #[serde(rename = "Return Agreed", default, deserialize_with = "optional_free_form")]
    pub return_agreed: Option<String>,
    #[serde(rename = "BoxCalID", default, deserialize_with = "optional_id")]
    pub box_cal_id: Option<String>,
    #[serde(rename = "CollectCalendarID", default, deserialize_with = "optional_id")]
    pub collect_calendar_id: Option<String>,
    #[serde(rename = "ReturnCalendarID", default, deserialize_with = "optional_id")]
    pub return_calendar_id: Option<String>,
}

impl Reservation {
    /// Parse the webhook body: a JSON array whose first element is the reservation.
    ///
    /// Any further elements are ignored.
    pub fn from_webhook_body(body: &[u8]) -> Result<Self> {
        let rows: Vec<Value> = serde_json::from_slice(body)
            .map_err(|e| SyncError::Validation(format!("body is not a JSON array: {}", e)))?;

        debug!("Webhook payload carried {} row(s)", rows.len());

        let first = rows
            .into_iter()
            .next()
            .ok_or_else(|| SyncError::Validation("payload array is empty".to_string()))?;

        serde_json::from_value(first)
            .map_err(|e| SyncError::Validation(format!("invalid reservation: {}", e)))
    }
}
