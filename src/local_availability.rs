use crate::backend::{AvailabilityBackend, AvailabilityPayload, PersistenceError};
use std::sync::{Arc, Mutex};
use tracing::{debug, error};

/// Process-local persistence, used when no availability service is
/// configured. Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct LocalAvailability {
    availability: Arc<Mutex<AvailabilityPayload>>,
}

impl LocalAvailability {
    pub fn new(payload: AvailabilityPayload) -> Self {
        Self {
            availability: Arc::new(Mutex::new(payload)),
        }
    }
}

impl AvailabilityBackend for LocalAvailability {
    async fn load(&self) -> Result<AvailabilityPayload, PersistenceError> {
        debug!("Load local availability");
        match self.availability.lock() {
            Ok(availability) => Ok(availability.clone()),
            Err(err) => {
                let err = format!("Local availability is poisoned: {err}");
                error!("{err}");
                Err(PersistenceError::Rejected(err))
            }
        }
    }

    async fn save(&self, payload: AvailabilityPayload) -> Result<(), PersistenceError> {
        match self.availability.lock() {
            Ok(mut availability) => {
                *availability = payload;
                Ok(())
            }
            Err(err) => {
                let err = format!("Local availability is poisoned: {err}");
                error!("{err}");
                Err(PersistenceError::Rejected(err))
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn test_save_replaces_both_lists() {
        let local_availability = LocalAvailability::new(AvailabilityPayload {
            fully_booked_dates: vec!["2024-06-10".into()],
            booked_slots: vec!["2024-06-11-09:00".into()],
        });

        let payload = AvailabilityPayload {
            fully_booked_dates: vec!["2024-07-01".into()],
            booked_slots: vec![],
        };
        local_availability.save(payload.clone()).await.unwrap();

        assert_eq!(local_availability.load().await.unwrap(), payload);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let local_availability = LocalAvailability::default();
        let clone = local_availability.clone();

        let payload = AvailabilityPayload {
            fully_booked_dates: vec![],
            booked_slots: vec!["2024-06-11-09:00".into()],
        };
        clone.save(payload.clone()).await.unwrap();

        assert_eq!(local_availability.load().await.unwrap(), payload);
    }
}
