use crate::{
    availability::Availability,
    backend::{AvailabilityBackend, AvailabilityPayload, PersistenceError},
};
use futures::StreamExt;
use std::{
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};
use tokio::time::timeout;
use tokio_stream::wrappers::WatchStream;

pub struct MockAvailabilityBackendInner {
    pub success: AtomicBool,
    pub calls_to_load: AtomicU64,
    pub calls_to_save: AtomicU64,
    pub availability: Mutex<AvailabilityPayload>,
}

#[derive(Clone)]
pub struct MockAvailabilityBackend(pub Arc<MockAvailabilityBackendInner>);

impl MockAvailabilityBackendInner {
    fn new() -> Self {
        Self {
            success: AtomicBool::new(true),
            calls_to_load: AtomicU64::default(),
            calls_to_save: AtomicU64::default(),
            availability: Mutex::default(),
        }
    }
}

impl MockAvailabilityBackend {
    pub fn new() -> Self {
        Self(Arc::new(MockAvailabilityBackendInner::new()))
    }

    fn result(&self) -> Result<(), PersistenceError> {
        match self.0.success.load(Ordering::SeqCst) {
            true => Ok(()),
            false => Err(PersistenceError::Rejected("Supposed to fail".into())),
        }
    }
}

impl AvailabilityBackend for MockAvailabilityBackend {
    async fn load(&self) -> Result<AvailabilityPayload, PersistenceError> {
        self.0.calls_to_load.fetch_add(1, Ordering::SeqCst);
        self.result()?;
        Ok(self.0.availability.lock().unwrap().clone())
    }

    async fn save(&self, payload: AvailabilityPayload) -> Result<(), PersistenceError> {
        self.0.calls_to_save.fetch_add(1, Ordering::SeqCst);
        self.result()?;
        *self.0.availability.lock().unwrap() = payload;
        Ok(())
    }
}

pub async fn read_from_availability_stream(stream: &mut WatchStream<Availability>) -> Availability {
    timeout(Duration::from_secs(1), stream.next())
        .await
        .expect("No availability published in time")
        .expect("Availability stream closed")
}
