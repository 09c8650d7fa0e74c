use serde::{Deserialize, Serialize};

use crate::{define_id_newtype, lat_lng::LatLng};

define_id_newtype!(CustomerId);

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Customer {
    id: CustomerId,
    name: String,
    address: String,
    location: LatLng,
}

impl Customer {
    pub fn new(id: CustomerId, name: String, address: String, location: LatLng) -> Self {
        Self {
            id,
            name,
            address,
            location,
        }
    }

    pub fn id(&self) -> CustomerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn location(&self) -> LatLng {
        self.location
    }

    /// `needle` must already be lowercased.
    pub(crate) fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.address.to_lowercase().contains(needle)
    }
}

/// Body of `GET /customers`
#[derive(Deserialize)]
pub(crate) struct CustomersResponse {
    pub customers: Vec<Customer>,
}
