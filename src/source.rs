use crate::config::Config;
use crate::errors::FetchError;
use crate::models::WageEnvelope;
use crate::wages::{WageDataset, WageRecord};
use reqwest::Client;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, warn};

/// Where wage datasets come from. Every variant resolves to a dataset;
/// failures are logged and replaced by [`sample_dataset`].
#[derive(Debug, Clone)]
pub enum WageSource {
    Remote { client: Client, base_url: String },
    File(PathBuf),
    Sample,
}

impl WageSource {
    pub fn from_config(config: &Config) -> Self {
        if let Some(base_url) = &config.wage_api_url {
            return Self::remote(base_url.clone());
        }
        if let Some(path) = &config.wage_data_path {
            return Self::File(path.clone());
        }
        Self::Sample
    }

    pub fn remote(base_url: impl Into<String>) -> Self {
        Self::Remote {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub async fn load(&self, name: &str) -> WageDataset {
        self.fetch(name).await.into_dataset()
    }

    /// Like [`WageSource::load`], but says whether the sample stood in for
    /// the real data.
    pub async fn fetch(&self, name: &str) -> Loaded {
        let result = match self {
            Self::Remote { client, base_url } => fetch_remote(client, base_url, name).await,
            Self::File(path) => read_file(path, name).await,
            Self::Sample => {
                warn!("no wage source configured, serving sample data");
                return Loaded::Fallback(sample_dataset());
            }
        };

        match result {
            Ok(dataset) => {
                info!(
                    "loaded {} wage records for {name:?}",
                    dataset.records.len()
                );
                Loaded::Fresh(dataset)
            }
            Err(err) => {
                error!("failed to fetch wages for {name:?}: {err}");
                Loaded::Fallback(sample_dataset())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Loaded {
    Fresh(WageDataset),
    Fallback(WageDataset),
}

impl Loaded {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Loaded::Fallback(_))
    }

    pub fn into_dataset(self) -> WageDataset {
        match self {
            Loaded::Fresh(dataset) | Loaded::Fallback(dataset) => dataset,
        }
    }
}

async fn fetch_remote(client: &Client, base_url: &str, name: &str) -> Result<WageDataset, FetchError> {
    let response = client
        .get(format!("{base_url}/api/wages"))
        .query(&[("name", name)])
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status));
    }

    let envelope: WageEnvelope = response.json().await?;
    envelope.into_dataset()
}

/// Accepts either a bare dataset or a `/api/wages` envelope.
async fn read_file(path: &Path, name: &str) -> Result<WageDataset, FetchError> {
    let bytes = fs::read(path).await?;
    let value: Value = serde_json::from_slice(&bytes)?;

    let mut dataset = if value.get("code").is_some() {
        serde_json::from_value::<WageEnvelope>(value)?.into_dataset()?
    } else {
        serde_json::from_value::<WageDataset>(value)?
    };

    if dataset.user_name.is_empty() {
        dataset.user_name = name.to_string();
    }
    Ok(dataset)
}

/// Fixed placeholder used whenever the real source is unavailable. Its dates
/// stay in late 2023 whatever month is displayed.
pub fn sample_dataset() -> WageDataset {
    const RECORDS: [(&str, f64); 14] = [
        ("2023-10-01", 300.0),
        ("2023-10-02", 320.0),
        ("2023-10-05", 300.0),
        ("2023-10-15", 450.0),
        ("2023-11-01", 300.0),
        ("2023-11-02", 280.0),
        ("2023-11-03", 300.0),
        ("2023-11-10", 500.0),
        ("2023-11-20", 300.0),
        ("2023-12-01", 350.0),
        ("2023-12-05", 350.0),
        ("2023-12-12", 600.0),
        ("2023-12-13", 600.0),
        ("2023-12-25", 800.0),
    ];

    WageDataset::new(
        "Zhang San",
        RECORDS
            .iter()
            .map(|(date, wage)| WageRecord::new(*date, *wage))
            .collect(),
    )
}
