use std::{sync::Mutex, time::Duration};

use serde_json::{Value, json};

use crate::{
    customer::{Customer, CustomerId},
    delivery_backend::DeliveryBackend,
    lat_lng::LatLng,
    optimization_request::OptimizationRequest,
    optimization_result::OptimizationResult,
    optimizer_api::OptimizerApiError,
    storage::{Storage, StorageId},
};

pub fn customer(id: u64, name: &str, address: &str, lat: f64, lng: f64) -> Customer {
    Customer::new(
        CustomerId::new(id),
        name.to_owned(),
        address.to_owned(),
        LatLng::new(lat, lng),
    )
}

pub fn storage(id: u64, name: &str, address: &str, lat: f64, lng: f64) -> Storage {
    Storage::new(
        StorageId::new(id),
        name.to_owned(),
        address.to_owned(),
        LatLng::new(lat, lng),
    )
}

/// In-memory backend answering with canned data, recording every request.
pub struct FakeBackend {
    customers: Vec<Customer>,
    storages: Vec<Storage>,
    customers_failure: Option<u16>,
    storages_failure: Option<u16>,
    optimize_response: Value,
    optimize_delay: Option<Duration>,
    requests: Mutex<Vec<OptimizationRequest>>,
}

impl FakeBackend {
    pub fn new(customers: Vec<Customer>, storages: Vec<Storage>) -> Self {
        Self {
            customers,
            storages,
            customers_failure: None,
            storages_failure: None,
            optimize_response: json!({ "routes": [] }),
            optimize_delay: None,
            requests: Mutex::new(vec![]),
        }
    }

    pub fn with_customers_failure(mut self, status: u16) -> Self {
        self.customers_failure = Some(status);
        self
    }

    pub fn with_storages_failure(mut self, status: u16) -> Self {
        self.storages_failure = Some(status);
        self
    }

    pub fn with_optimize_response(mut self, response: Value) -> Self {
        self.optimize_response = response;
        self
    }

    pub fn with_optimize_delay(mut self, millis: u64) -> Self {
        self.optimize_delay = Some(Duration::from_millis(millis));
        self
    }

    pub fn requests(&self) -> Vec<OptimizationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

fn api_error(status: u16) -> OptimizerApiError {
    OptimizerApiError::Api {
        status,
        message: String::from("fake failure"),
    }
}

impl DeliveryBackend for FakeBackend {
    async fn fetch_customers(&self) -> Result<Vec<Customer>, OptimizerApiError> {
        match self.customers_failure {
            Some(status) => Err(api_error(status)),
            None => Ok(self.customers.clone()),
        }
    }

    async fn fetch_storages(&self) -> Result<Vec<Storage>, OptimizerApiError> {
        match self.storages_failure {
            Some(status) => Err(api_error(status)),
            None => Ok(self.storages.clone()),
        }
    }

    async fn optimize(
        &self,
        request: &OptimizationRequest,
    ) -> Result<OptimizationResult, OptimizerApiError> {
        self.requests.lock().unwrap().push(request.clone());

        if let Some(delay) = self.optimize_delay {
            tokio::time::sleep(delay).await;
        }

        Ok(OptimizationResult::from_value(
            self.optimize_response.clone(),
        ))
    }
}
