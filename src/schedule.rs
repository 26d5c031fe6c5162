use crate::types::{index_services, Booking, Service, ServiceIndex, Technician};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use uuid::Uuid;

/// Committed bookings together with the catalog and staff they refer to, as
/// exported by the booking collaborator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Schedule {
    pub services: Vec<Service>,
    pub technicians: Vec<Technician>,
    pub bookings: Vec<Booking>,
}

impl Schedule {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read schedule {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse schedule {}", path.display()))
    }

    pub fn service_index(&self) -> ServiceIndex {
        index_services(self.services.iter().cloned())
    }

    pub fn technician(&self, id: Uuid) -> Option<&Technician> {
        self.technicians.iter().find(|technician| technician.id == id)
    }
}
