use serde::{Deserialize, Serialize};

use crate::{fleet_params::FleetParams, lat_lng::LatLng};

/// Body of `POST /optimize`. Built once per submission and never mutated.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OptimizationRequest {
    locations: Vec<LatLng>,
    num_vehicles: u32,
    depot: Option<LatLng>,
    storage_address: String,
    daily_customers: u32,
    total_weight: f64,
}

impl OptimizationRequest {
    pub(crate) fn new(
        locations: Vec<LatLng>,
        depot: Option<(LatLng, String)>,
        fleet: &FleetParams,
    ) -> Self {
        let (depot, storage_address) = match depot {
            Some((location, address)) => (Some(location), address),
            None => (None, String::new()),
        };

        Self {
            locations,
            num_vehicles: fleet.num_vehicles,
            depot,
            storage_address,
            daily_customers: fleet.daily_customers,
            total_weight: fleet.total_weight,
        }
    }

    pub fn locations(&self) -> &[LatLng] {
        &self.locations
    }

    pub fn num_vehicles(&self) -> u32 {
        self.num_vehicles
    }

    pub fn depot(&self) -> Option<LatLng> {
        self.depot
    }

    pub fn storage_address(&self) -> &str {
        &self.storage_address
    }

    pub fn daily_customers(&self) -> u32 {
        self.daily_customers
    }

    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }
}
