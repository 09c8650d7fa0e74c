pub mod config;
pub mod customer;
pub mod delivery_backend;
pub mod entity_cache;
pub mod fleet_params;
pub mod lat_lng;
pub mod map_view;
pub mod optimization_request;
pub mod optimization_result;
pub mod optimizer_api;
pub mod request_builder;
pub mod result_projector;
pub mod selection_model;
pub mod session;
pub mod storage;
mod utils;

#[cfg(test)]
pub(crate) mod test_utils;
