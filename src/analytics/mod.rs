use std::thread::JoinHandle;
use std::time::{SystemTime, UNIX_EPOCH};

use reqwest::blocking::Client;
use serde_json::{Value, json};

use crate::config::AnalyticsConfig;

pub struct Beacon {
    client: Client,
    endpoint: String,
    measurement_id: String,
}

impl Beacon {
    pub fn new(config: &AnalyticsConfig) -> Self {
        Self {
            client: Client::new(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            measurement_id: config.measurement_id.clone(),
        }
    }

    pub fn url(&self) -> String {
        format!("{}?measurement_id={}", self.endpoint, self.measurement_id)
    }

    pub fn page_view(client_id: &str, video_id: &str) -> Value {
        json!({
            "client_id": client_id,
            "events": [{
                "name": "page_view",
                "params": {
                    "page_title": "playchrome",
                    "video_id": video_id,
                }
            }]
        })
    }

    pub fn send(&self, client_id: &str, video_id: &str) -> Result<(), reqwest::Error> {
        self.client
            .post(self.url())
            .json(&Self::page_view(client_id, video_id))
            .send()?
            .error_for_status()?;
        Ok(())
    }
}

fn client_id() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("{}.{}", std::process::id(), secs)
}

/// Fires the startup page view on a background thread. Nothing waits for it
/// and failures are only logged. Returns `None` when analytics is disabled.
pub fn initialize(config: &AnalyticsConfig, video_id: &str) -> Option<JoinHandle<()>> {
    if !config.enabled {
        return None;
    }

    let beacon = Beacon::new(config);
    let video_id = video_id.to_string();

    Some(std::thread::spawn(move || {
        match beacon.send(&client_id(), &video_id) {
            Ok(()) => tracing::debug!(measurement_id = %beacon.measurement_id, "analytics beacon sent"),
            Err(err) => tracing::warn!(%err, "analytics beacon failed"),
        }
    }))
}
