use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, info};

use crate::auth::{fetch_access_token, ServiceAccountKey};
use crate::error::{Result, SyncError};
use crate::models::calendar::{CalendarListEntry, CalendarListPage, Event};

/// Default base URL of the Google Calendar v3 API
pub const DEFAULT_CALENDAR_ENDPOINT: &str = "https://www.googleapis.com/calendar/v3";

/// Calendar operations the sync needs
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CalendarApi: Send + Sync {
    /// Every calendar visible to the authenticated account, across all pages
    async fn list_calendars(&self) -> Result<Vec<CalendarListEntry>>;

    async fn insert_event(&self, calendar_id: &str, event: &Event) -> Result<Event>;

    async fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        event: &Event,
    ) -> Result<Event>;
}

/// Produces an authenticated calendar handle for a single request
#[async_trait]
pub trait CalendarConnector: Send + Sync {
    async fn connect(&self) -> Result<Arc<dyn CalendarApi>>;
}

/// Client for the Google Calendar API, bound to one access token
pub struct GoogleCalendarClient {
    client: Client,
    endpoint: String,
    access_token: String,
}

impl GoogleCalendarClient {
    pub fn new(client: Client, endpoint: &str, access_token: String) -> Self {
        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            access_token,
        }
    }

    fn events_url(&self, calendar_id: &str) -> String {
        format!(
            "{}/calendars/{}/events",
            self.endpoint,
            urlencoding::encode(calendar_id)
        )
    }

    async fn parse<T: DeserializeOwned>(res: Response) -> Result<T> {
        let status = res.status();
        info!("Response received with status: {}", status);

        if !status.is_success() {
            let message = res.text().await.unwrap_or_default();
            return Err(SyncError::CalendarApi {
                status: status.as_u16(),
                message,
            });
        }

        Ok(res.json::<T>().await?)
    }
}

#[async_trait]
impl CalendarApi for GoogleCalendarClient {
    async fn list_calendars(&self) -> Result<Vec<CalendarListEntry>> {
        let url = format!("{}/users/me/calendarList", self.endpoint);
        let mut entries = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self.client.get(&url).bearer_auth(&self.access_token);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }

            debug!("API URL: {}", url);
            let page: CalendarListPage = Self::parse(request.send().await?).await?;
            entries.extend(page.items);

            page_token = page.next_page_token;
            if page_token.is_none() {
                break;
            }
        }

        info!("Calendar list returned {} calendars", entries.len());
        Ok(entries)
    }

    async fn insert_event(&self, calendar_id: &str, event: &Event) -> Result<Event> {
        let url = self.events_url(calendar_id);
        info!("Inserting event '{}' into calendar {}", event.summary, calendar_id);
        debug!("API URL: {}", url);

        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(event)
            .send()
            .await?;

        Self::parse(res).await
    }

    async fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        event: &Event,
    ) -> Result<Event> {
        let url = format!(
            "{}/{}",
            self.events_url(calendar_id),
            urlencoding::encode(event_id)
        );
        info!("Updating event {} in calendar {}", event_id, calendar_id);
        debug!("API URL: {}", url);

        let res = self
            .client
            .put(&url)
            .bearer_auth(&self.access_token)
            .json(event)
            .send()
            .await?;

        Self::parse(res).await
    }
}

/// Mints a new service-account token on every `connect`
pub struct ServiceAccountConnector {
    client: Client,
    key: ServiceAccountKey,
    endpoint: String,
}

impl ServiceAccountConnector {
    pub fn new(key: ServiceAccountKey, endpoint: &str) -> Self {
        Self {
            client: Client::new(),
            key,
            endpoint: endpoint.to_string(),
        }
    }
}

#[async_trait]
impl CalendarConnector for ServiceAccountConnector {
    async fn connect(&self) -> Result<Arc<dyn CalendarApi>> {
        let access_token = fetch_access_token(&self.client, &self.key).await?;
        Ok(Arc::new(GoogleCalendarClient::new(
            self.client.clone(),
            &self.endpoint,
            access_token,
        )))
    }
}
