use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::{
    config::ClientConfig,
    customer::{Customer, CustomersResponse},
    delivery_backend::DeliveryBackend,
    optimization_request::OptimizationRequest,
    optimization_result::OptimizationResult,
    storage::{Storage, StoragesResponse},
};

#[derive(Debug, Error)]
pub enum OptimizerApiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),
}

pub const CUSTOMERS_API_PATH: &str = "/customers";
pub const STORAGES_API_PATH: &str = "/storages";
pub const OPTIMIZE_API_PATH: &str = "/optimize";

pub struct OptimizerApiClientParams {
    pub base_url: String,
}

pub struct OptimizerApiClient {
    params: OptimizerApiClientParams,
    client: reqwest::Client,
}

impl OptimizerApiClient {
    pub fn new(params: OptimizerApiClientParams) -> Self {
        Self {
            params,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(OptimizerApiClientParams {
            base_url: config.api_url.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.params.base_url.trim_end_matches('/'), path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, OptimizerApiError> {
        let response = self.client.get(self.url(path)).send().await?;

        handle_response(response).await
    }
}

impl DeliveryBackend for OptimizerApiClient {
    #[instrument(skip_all)]
    async fn fetch_customers(&self) -> Result<Vec<Customer>, OptimizerApiError> {
        let response: CustomersResponse = self.get_json(CUSTOMERS_API_PATH).await?;
        debug!("OptimizerApi: fetched {} customers", response.customers.len());

        Ok(response.customers)
    }

    #[instrument(skip_all)]
    async fn fetch_storages(&self) -> Result<Vec<Storage>, OptimizerApiError> {
        let response: StoragesResponse = self.get_json(STORAGES_API_PATH).await?;
        debug!("OptimizerApi: fetched {} storages", response.storages.len());

        Ok(response.storages)
    }

    #[instrument(skip_all, fields(locations = request.locations().len()))]
    async fn optimize(
        &self,
        request: &OptimizationRequest,
    ) -> Result<OptimizationResult, OptimizerApiError> {
        let response = self
            .client
            .post(self.url(OPTIMIZE_API_PATH))
            .json(request)
            .send()
            .await?;

        debug!("OptimizerApi: posted optimization request");

        handle_optimize_response(response).await
    }
}

async fn handle_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, OptimizerApiError> {
    let status = response.status();
    let bytes = response.bytes().await?;

    if status.is_success() {
        Ok(serde_json::from_slice(&bytes)?)
    } else {
        Err(OptimizerApiError::Api {
            status: status.as_u16(),
            message: error_message(&bytes),
        })
    }
}

/// Any JSON answer from the optimizer is its result, whatever the status, so
/// that validation errors such as `{ "error": "Missing required input values" }`
/// reach the caller. Only bodies that are not JSON fail.
async fn handle_optimize_response(
    response: reqwest::Response,
) -> Result<OptimizationResult, OptimizerApiError> {
    let status = response.status();
    let bytes = response.bytes().await?;

    match serde_json::from_slice::<OptimizationResult>(&bytes) {
        Ok(result) => {
            if !status.is_success() {
                warn!("OptimizerApi: optimization answered with status {}", status);
            }
            Ok(result)
        }
        Err(_) if !status.is_success() => Err(OptimizerApiError::Api {
            status: status.as_u16(),
            message: error_message(&bytes),
        }),
        Err(err) => Err(err.into()),
    }
}

/// The backend reports failures as `{ "error": "..." }`; anything else is
/// passed on as text.
fn error_message(body: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("error")?.as_str().map(str::to_owned))
        .unwrap_or_else(|| String::from_utf8_lossy(body).into_owned())
}
