pub mod calendar_sync;
pub mod directory;
pub mod event_builder;
