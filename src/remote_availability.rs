use crate::backend::{AvailabilityBackend, AvailabilityPayload, PersistenceError};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Availability collaborator reached over HTTP: `GET` and `PUT` on
/// `{base_url}/availability`.
#[derive(Debug, Clone)]
pub struct RemoteAvailability {
    client: Client,
    url: String,
}

impl RemoteAvailability {
    pub fn new(base_url: &str) -> Result<Self, PersistenceError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            url: format!("{}/availability", base_url.trim_end_matches('/')),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl AvailabilityBackend for RemoteAvailability {
    async fn load(&self) -> Result<AvailabilityPayload, PersistenceError> {
        debug!(url = %self.url, "Request availability");
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            error!(%status, "Availability service refused to load");
            return Err(PersistenceError::Status(status.as_u16()));
        }
        Ok(response.json::<AvailabilityPayload>().await?)
    }

    async fn save(&self, payload: AvailabilityPayload) -> Result<(), PersistenceError> {
        debug!(url = %self.url, "Store availability");
        let response = self.client.put(&self.url).json(&payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            error!(%status, "Availability service refused to store");
            return Err(PersistenceError::Status(status.as_u16()));
        }
        Ok(())
    }
}
