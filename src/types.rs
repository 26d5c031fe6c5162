use crate::{date_key::DateKey, time_slots::TimeSlot};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;
use uuid::Uuid;

pub const DEFAULT_DURATION_MINUTES: u32 = 60;
pub const DEFAULT_DURATION_DAYS: u32 = 1;
/// Upper bound for a multi-day service; longer upstream values are clamped.
pub const MAX_DURATION_DAYS: u32 = 366;

pub type ServiceIndex = HashMap<Uuid, Service>;

/// Catalog entry as delivered by the service collaborator. Durations are
/// optional upstream and fall back to the defaults when missing or zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub duration_days: Option<u32>,
}

impl Service {
    pub fn new(name: impl Into<String>, duration_minutes: u32, duration_days: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            duration_minutes: Some(duration_minutes),
            duration_days: Some(duration_days),
        }
    }

    pub fn duration_days(&self) -> u32 {
        match self.duration_days {
            Some(0) => {
                warn!(service = %self.id, "Service has a zero day duration, using default");
                DEFAULT_DURATION_DAYS
            }
            Some(days) if days > MAX_DURATION_DAYS => {
                warn!(service = %self.id, days, "Service day duration too long, clamping");
                MAX_DURATION_DAYS
            }
            Some(days) => days,
            None => DEFAULT_DURATION_DAYS,
        }
    }

    pub fn duration_minutes(&self) -> u32 {
        match self.duration_minutes {
            Some(0) => {
                warn!(service = %self.id, "Service has a zero minute duration, using default");
                DEFAULT_DURATION_MINUTES
            }
            Some(minutes) => minutes,
            None => DEFAULT_DURATION_MINUTES,
        }
    }

    pub fn is_multi_day(&self) -> bool {
        self.duration_days() > 1
    }
}

pub fn index_services(services: impl IntoIterator<Item = Service>) -> ServiceIndex {
    services
        .into_iter()
        .map(|service| (service.id, service))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Technician {
    pub id: Uuid,
    pub name: String,
}

impl Technician {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

/// Internal booking status. Upstream codes are mapped through
/// [`BookingStatus::from_code`]; anything outside the known set is `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    Unknown,
}

impl BookingStatus {
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "pending" => Self::Pending,
            "confirmed" | "assigned" => Self::Confirmed,
            "in_progress" => Self::InProgress,
            "completed" => Self::Completed,
            "cancelled" | "canceled" | "rejected" => Self::Cancelled,
            _ => Self::Unknown,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Unknown => "unknown",
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<String> for BookingStatus {
    fn from(code: String) -> Self {
        let status = Self::from_code(&code);
        if status == Self::Unknown {
            warn!(code = %code, "Unknown upstream booking status");
        }
        status
    }
}

impl From<BookingStatus> for String {
    fn from(status: BookingStatus) -> Self {
        status.code().into()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub service_id: Uuid,
    pub start_date: DateKey,
    pub end_date: DateKey,
    pub time: TimeSlot,
    #[serde(default)]
    pub technician_id: Option<Uuid>,
    pub status: BookingStatus,
}

impl Booking {
    /// Pending booking whose end date follows from the service's day duration.
    pub fn new(service: &Service, start_date: DateKey, time: TimeSlot) -> Self {
        let dates = start_date.range(service.duration_days());
        Self {
            id: Uuid::new_v4(),
            service_id: service.id,
            start_date,
            end_date: dates.last().copied().unwrap_or(start_date),
            time,
            technician_id: None,
            status: BookingStatus::Pending,
        }
    }

    pub fn assign(mut self, technician: &Technician) -> Self {
        self.technician_id = Some(technician.id);
        self
    }

    pub fn with_status(mut self, status: BookingStatus) -> Self {
        self.status = status;
        self
    }

    pub fn covers(&self, date: DateKey) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    pub fn is_multi_day(&self) -> bool {
        self.end_date > self.start_date
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use test_case::test_case;

    #[test_case("pending", BookingStatus::Pending)]
    #[test_case("CONFIRMED", BookingStatus::Confirmed)]
    #[test_case("assigned", BookingStatus::Confirmed)]
    #[test_case(" in_progress ", BookingStatus::InProgress)]
    #[test_case("completed", BookingStatus::Completed)]
    #[test_case("canceled", BookingStatus::Cancelled)]
    #[test_case("rejected", BookingStatus::Cancelled)]
    #[test_case("cancelled_by_admin", BookingStatus::Unknown ; "no substring matching")]
    #[test_case("", BookingStatus::Unknown ; "empty code")]
    fn test_status_mapping(code: &str, expected: BookingStatus) {
        assert_eq!(BookingStatus::from_code(code), expected);
    }

    #[test]
    fn test_malformed_durations_fall_back_to_defaults() {
        let json = r#"{"id":"8d6f5c8a-5b7e-4a43-9d55-3c1e2f0d9a11","name":"Roof repair","durationMinutes":0}"#;
        let service: Service = serde_json::from_str(json).unwrap();
        assert_eq!(service.duration_minutes(), DEFAULT_DURATION_MINUTES);
        assert_eq!(service.duration_days(), DEFAULT_DURATION_DAYS);
        assert!(!service.is_multi_day());
    }

    #[test]
    fn test_oversized_day_duration_is_clamped() {
        let service = Service::new("Bad data", 60, 1_000_000_000);
        assert_eq!(service.duration_days(), MAX_DURATION_DAYS);

        let booking = Booking::new(
            &service,
            DateKey::from_ymd(2024, 1, 1).unwrap(),
            "09:00".parse().unwrap(),
        );
        assert_eq!(booking.end_date.to_string(), "2024-12-31");
    }

    #[test]
    fn test_booking_end_date_spans_service_days() {
        let service = Service::new("Kitchen renovation", 480, 3);
        let start = DateKey::from_ymd(2024, 6, 10).unwrap();
        let booking = Booking::new(&service, start, "09:00".parse().unwrap());

        assert_eq!(booking.end_date.to_string(), "2024-06-12");
        assert!(booking.is_multi_day());
        assert!(booking.covers(DateKey::from_ymd(2024, 6, 11).unwrap()));
        assert!(!booking.covers(DateKey::from_ymd(2024, 6, 13).unwrap()));
    }

    #[test]
    fn test_booking_deserializes_upstream_status() {
        let json = r#"{
            "id": "0b4d4a57-6a3e-4c1f-8f0e-6a0c1d2e3f40",
            "serviceId": "8d6f5c8a-5b7e-4a43-9d55-3c1e2f0d9a11",
            "startDate": "2024-06-10",
            "endDate": "2024-06-10",
            "time": "10:00",
            "status": "Assigned"
        }"#;
        let booking: Booking = serde_json::from_str(json).unwrap();
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(booking.technician_id, None);
    }
}
