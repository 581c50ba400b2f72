use anyhow::{Context, Result};
use reqwest::blocking::Client;
use std::time::Duration;

use crate::chart::point::Ear;

use super::record::PointRecord;

/// Where audiogram points live.
pub trait PointStore {
    fn save(&self, patient: &str, ear: Ear, record: &PointRecord) -> Result<()>;
    fn list(&self, patient: &str, ear: Ear) -> Result<Vec<PointRecord>>;
    fn delete(&self, patient: &str, ear: Ear, id: &str) -> Result<()>;
    fn delete_all(&self, patient: &str, ear: Ear) -> Result<()>;
}

/// Blocking client for the patient service and its sound library.
pub struct ServiceClient {
    http: Client,
    base_url: String,
    sounds_path: String,
}

impl ServiceClient {
    pub fn new(base_url: &str, sounds_path: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            sounds_path: sounds_path.trim_matches('/').to_string(),
        })
    }

    fn audiogram_url(&self, patient: &str, ear: Ear) -> String {
        format!("{}/patients/{}/audiogram/{}", self.base_url, patient, ear)
    }

    /// Names of the clips in the sound library.
    pub fn list_audios(&self) -> Result<Vec<String>> {
        let url = format!("{}/list-audios", self.base_url);
        self.http
            .get(&url)
            .send()
            .and_then(|r| r.error_for_status())
            .with_context(|| format!("GET {} failed", url))?
            .json()
            .context("Sound list is not a JSON array of names")
    }

    /// Raw bytes of a library clip.
    pub fn fetch_audio(&self, name: &str) -> Result<Vec<u8>> {
        let url = if self.sounds_path.is_empty() {
            format!("{}/{}", self.base_url, name)
        } else {
            format!("{}/{}/{}", self.base_url, self.sounds_path, name)
        };
        let bytes = self
            .http
            .get(&url)
            .send()
            .and_then(|r| r.error_for_status())
            .with_context(|| format!("GET {} failed", url))?
            .bytes()
            .with_context(|| format!("Failed to read body of {}", url))?;
        log::info!("Fetched {} ({} bytes)", name, bytes.len());
        Ok(bytes.to_vec())
    }
}

impl PointStore for ServiceClient {
    fn save(&self, patient: &str, ear: Ear, record: &PointRecord) -> Result<()> {
        let url = self.audiogram_url(patient, ear);
        self.http
            .post(&url)
            .json(record)
            .send()
            .and_then(|r| r.error_for_status())
            .with_context(|| format!("POST {} failed", url))?;
        Ok(())
    }

    fn list(&self, patient: &str, ear: Ear) -> Result<Vec<PointRecord>> {
        let url = self.audiogram_url(patient, ear);
        self.http
            .get(&url)
            .send()
            .and_then(|r| r.error_for_status())
            .with_context(|| format!("GET {} failed", url))?
            .json()
            .with_context(|| format!("Unexpected point list from {}", url))
    }

    fn delete(&self, patient: &str, ear: Ear, id: &str) -> Result<()> {
        let url = format!("{}/{}", self.audiogram_url(patient, ear), id);
        self.http
            .delete(&url)
            .send()
            .and_then(|r| r.error_for_status())
            .with_context(|| format!("DELETE {} failed", url))?;
        Ok(())
    }

    fn delete_all(&self, patient: &str, ear: Ear) -> Result<()> {
        let url = format!("{}/patients/{}/delete-all-points/{}", self.base_url, patient, ear);
        self.http
            .delete(&url)
            .send()
            .and_then(|r| r.error_for_status())
            .with_context(|| format!("DELETE {} failed", url))?;
        Ok(())
    }
}
