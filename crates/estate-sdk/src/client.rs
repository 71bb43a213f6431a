//! Estate SDK client.

use anyhow::Result;
use estate_core::models::{
    CreateEstateRequest, CreateTreeRequest, CreatedResponse, DronePlanResponse, ErrorResponse,
    EstateStatsResponse, RouteResponse,
};
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Non-success response from the server.
#[derive(Debug, Error)]
#[error("{operation} failed with {status}: {message}")]
pub struct ApiError {
    pub operation: &'static str,
    pub status: u16,
    pub message: String,
}

/// Client for the estate server.
pub struct EstateClient {
    base_url: String,
    client: reqwest::Client,
}

impl EstateClient {
    /// Create a new client for `base_url` (no trailing slash needed).
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create an estate, returning its ID.
    pub async fn create_estate(&self, width: u32, length: u32) -> Result<String> {
        let url = format!("{}/estate", self.base_url);
        let request = CreateEstateRequest {
            width: width as i64,
            length: length as i64,
        };

        let response = self.client.post(&url).json(&request).send().await?;
        let created: CreatedResponse = read_json("create estate", response).await?;
        tracing::debug!("Created estate {}", created.id);
        Ok(created.id)
    }

    /// Plant a tree, returning its ID. The server recomputes the estate's plan.
    pub async fn plant_tree(&self, estate_id: &str, x: u32, y: u32, height: u32) -> Result<String> {
        let url = format!("{}/estate/{}/tree", self.base_url, estate_id);
        let request = CreateTreeRequest {
            x: x as i64,
            y: y as i64,
            height: height as i64,
        };

        let response = self.client.post(&url).json(&request).send().await?;
        let created: CreatedResponse = read_json("plant tree", response).await?;
        Ok(created.id)
    }

    pub async fn stats(&self, estate_id: &str) -> Result<EstateStatsResponse> {
        let url = format!("{}/estate/{}/stats", self.base_url, estate_id);
        let response = self.client.get(&url).send().await?;
        read_json("read stats", response).await
    }

    /// Patrol distance; with `max_distance` also where the drone comes to rest.
    pub async fn drone_plan(
        &self,
        estate_id: &str,
        max_distance: Option<u64>,
    ) -> Result<DronePlanResponse> {
        let url = format!("{}/estate/{}/drone-plan", self.base_url, estate_id);
        let mut builder = self.client.get(&url);
        if let Some(max_distance) = max_distance {
            builder = builder.query(&[("max_distance", max_distance)]);
        }

        let response = builder.send().await?;
        read_json("read drone plan", response).await
    }

    pub async fn route(&self, estate_id: &str) -> Result<RouteResponse> {
        let url = format!("{}/estate/{}/route", self.base_url, estate_id);
        let response = self.client.get(&url).send().await?;
        read_json("read route", response).await
    }
}

async fn read_json<T: DeserializeOwned>(
    operation: &'static str,
    response: reqwest::Response,
) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map(|err| err.message)
            .unwrap_or(body);
        return Err(ApiError {
            operation,
            status: status.as_u16(),
            message,
        }
        .into());
    }

    Ok(response.json().await?)
}
