// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use serde::Deserialize;
use std::time::Duration;
use tours_app::{TourId, TourRecord, validate_unique_ids};
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "https://course-api.com/react-tours-project";

#[derive(Debug, Clone)]
pub struct Client {
    endpoint: Url,
    timeout: Duration,
    http: HttpClient,
}

impl Client {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let endpoint = parse_endpoint(endpoint)?;
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            endpoint,
            timeout,
            http,
        })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn fetch_tours(&self) -> Result<Vec<TourRecord>> {
        tracing::debug!(endpoint = %self.endpoint, "fetching tours");
        let response = self
            .http
            .get(self.endpoint.clone())
            .send()
            .map_err(|error| connection_error(self.endpoint.as_str(), error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }

        let body = response.text().context("read tours response")?;
        let tours = decode_tours(&body)?;
        tracing::info!(count = tours.len(), "fetched tours");
        Ok(tours)
    }
}

pub fn parse_endpoint(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        bail!("tours endpoint must not be empty");
    }
    let url = Url::parse(trimmed).with_context(|| format!("invalid tours endpoint {trimmed:?}"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!(
            "tours endpoint {trimmed:?} uses scheme {:?}; expected http or https",
            url.scheme()
        );
    }
    Ok(url)
}

/// Decodes and validates a response body. The first malformed record fails
/// the whole batch.
pub fn decode_tours(body: &str) -> Result<Vec<TourRecord>> {
    let wire: Vec<serde_json::Value> = serde_json::from_str(body)
        .context("decode tours response; expected a JSON array of tour objects")?;

    let mut tours = Vec::with_capacity(wire.len());
    for (index, value) in wire.into_iter().enumerate() {
        let record = serde_json::from_value::<WireTour>(value)
            .map(TourRecord::from)
            .with_context(|| format!("decode tour at index {index}"))?;
        record
            .validate()
            .with_context(|| format!("invalid tour at index {index}"))?;
        tours.push(record);
    }
    validate_unique_ids(&tours)?;
    Ok(tours)
}

#[derive(Debug, Deserialize)]
struct WireTour {
    id: StringOrNumber,
    image: String,
    name: String,
    price: StringOrNumber,
    info: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Text(String),
    Number(serde_json::Number),
}

impl StringOrNumber {
    fn into_string(self) -> String {
        match self {
            Self::Text(value) => value,
            Self::Number(value) => value.to_string(),
        }
    }
}

impl From<WireTour> for TourRecord {
    fn from(wire: WireTour) -> Self {
        Self {
            id: TourId::new(wire.id.into_string()),
            image: wire.image,
            name: wire.name,
            price: wire.price.into_string(),
            info: wire.info,
        }
    }
}

fn connection_error(endpoint: &str, error: reqwest::Error) -> anyhow::Error {
    if error.is_timeout() {
        return anyhow!(
            "timed out fetching tours from {endpoint} -- raise [source].timeout or check the network"
        );
    }
    anyhow!(
        "cannot reach {endpoint} -- check the network or set [source].url ({})",
        error
    )
}

fn clean_error_response(status: StatusCode, body: &str) -> anyhow::Error {
    let trimmed = body.trim();
    if !trimmed.is_empty() && trimmed.len() < 100 && !trimmed.contains('{') {
        return anyhow!("server error ({}): {}", status.as_u16(), trimmed);
    }

    anyhow!("server returned {}", status.as_u16())
}
