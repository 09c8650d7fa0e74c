use std::future::Future;

use crate::{
    customer::Customer, optimization_request::OptimizationRequest,
    optimization_result::OptimizationResult, optimizer_api::OptimizerApiError, storage::Storage,
};

/// The external service a session talks to: two read-only listings and the
/// route optimizer. Every call is a single attempt.
pub trait DeliveryBackend: Send + Sync + 'static {
    fn fetch_customers(
        &self,
    ) -> impl Future<Output = Result<Vec<Customer>, OptimizerApiError>> + Send;

    fn fetch_storages(
        &self,
    ) -> impl Future<Output = Result<Vec<Storage>, OptimizerApiError>> + Send;

    fn optimize(
        &self,
        request: &OptimizationRequest,
    ) -> impl Future<Output = Result<OptimizationResult, OptimizerApiError>> + Send;
}
