pub mod calendar;
pub mod reservation;
