pub mod availability;
pub mod backend;
pub mod calendar;
pub mod configuration;
pub mod configuration_handler;
pub mod date_key;
pub mod local_availability;
pub mod remote_availability;
pub mod reservation;
pub mod schedule;
#[cfg(test)]
mod testutils;
pub mod time_slots;
pub mod types;
pub mod workload;
