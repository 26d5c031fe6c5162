use crate::availability::Availability;
use serde::{Deserialize, Serialize};
use std::future::Future;
use thiserror::Error;

/// Persistence collaborator for availability. `load` answers `GET
/// availability`, `save` answers `PUT availability` and replaces both sets.
pub trait AvailabilityBackend: Clone + Send + Sync + 'static {
    fn load(&self) -> impl Future<Output = Result<AvailabilityPayload, PersistenceError>> + Send;
    fn save(
        &self,
        payload: AvailabilityPayload,
    ) -> impl Future<Output = Result<(), PersistenceError>> + Send;
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Availability request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Availability service answered with status {0}")]
    Status(u16),
    #[error("Availability service rejected the request: {0}")]
    Rejected(String),
}

/// Wire shape of the availability collaborator. Both lists are optional
/// upstream and default to empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityPayload {
    #[serde(default)]
    pub fully_booked_dates: Vec<String>,
    #[serde(default)]
    pub booked_slots: Vec<String>,
}

impl From<&Availability> for AvailabilityPayload {
    fn from(availability: &Availability) -> Self {
        Self {
            fully_booked_dates: availability
                .fully_booked_dates()
                .iter()
                .map(ToString::to_string)
                .collect(),
            booked_slots: availability
                .booked_slots()
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_missing_lists_default_to_empty() {
        let payload: AvailabilityPayload =
            serde_json::from_str(r#"{"fullyBookedDates":["2024-06-10"]}"#).unwrap();
        assert_eq!(payload.fully_booked_dates, vec!["2024-06-10"]);
        assert!(payload.booked_slots.is_empty());

        let payload: AvailabilityPayload = serde_json::from_str("{}").unwrap();
        assert_eq!(payload, AvailabilityPayload::default());
    }
}
