//! Box Rental Calendar Sync
//!
//! This library provides a webhook service that mirrors box rental
//! reservations into Google Calendar. Each box has its own calendar for
//! the loan period, and a shared central calendar collects the agreed
//! collection and return appointments.
//!
//! # Modules
//!
//! - `client`: GoogleCalendarClient and the `CalendarApi` seam
//! - `auth`: Service-account token minting and webhook source verification
//! - `services`: Reservation to event mapping and the upsert logic
//! - `handlers` / `routes`: The axum HTTP surface
//!
//! # Authentication
//!
//! Calls to Google use a service-account JWT assertion exchanged for a
//! bearer token on every webhook request. Callers of the webhook prove
//! themselves with a shared `x-webhook-source` header value.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;


// Re-export the main API types for ease of use
pub use client::{CalendarApi, CalendarConnector, GoogleCalendarClient, ServiceAccountConnector};
pub use config::Config;
pub use error::SyncError;
pub use handlers::api::AppState;
pub use routes::create_router;
