use serde::{Deserialize, Serialize};

use crate::{define_id_newtype, lat_lng::LatLng};

define_id_newtype!(StorageId);

/// A warehouse a route can start from and return to.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Storage {
    id: StorageId,
    name: String,
    address: String,
    location: LatLng,
}

impl Storage {
    pub fn new(id: StorageId, name: String, address: String, location: LatLng) -> Self {
        Self {
            id,
            name,
            address,
            location,
        }
    }

    pub fn id(&self) -> StorageId {
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
}

/// Body of `GET /storages`
#[derive(Deserialize)]
pub(crate) struct StoragesResponse {
    pub storages: Vec<Storage>,
}
