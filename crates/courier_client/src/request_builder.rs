use crate::{
    entity_cache::EntityCache, fleet_params::FleetParams,
    optimization_request::OptimizationRequest, selection_model::SelectionModel,
};

/// Derives the payload for `POST /optimize` from the current selection.
///
/// Locations follow the cache order, not the order customers were picked in.
/// Selected ids missing from the cache are skipped. An unresolved depot gives
/// `depot: null` with an empty address; rejecting that is left to the caller.
pub fn build_optimization_request(
    selection: &SelectionModel,
    cache: &EntityCache,
    fleet: &FleetParams,
) -> OptimizationRequest {
    let locations = cache
        .customers()
        .iter()
        .filter(|customer| selection.is_selected(customer.id()))
        .map(|customer| customer.location())
        .collect();

    let depot = selection
        .active_storage_in(cache)
        .map(|storage| (storage.location(), storage.address().to_owned()));

    OptimizationRequest::new(locations, depot, fleet)
}
