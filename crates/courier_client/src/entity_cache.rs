use tracing::{debug, error};

use crate::{
    customer::{Customer, CustomerId},
    delivery_backend::DeliveryBackend,
    optimizer_api::OptimizerApiError,
    storage::{Storage, StorageId},
};

/// Last fetched customers and storages. A successful fetch swaps a list out
/// entirely; a failed one leaves it untouched.
#[derive(Debug, Default, Clone)]
pub struct EntityCache {
    customers: Vec<Customer>,
    storages: Vec<Storage>,
}

/// Outcome of each fetch of a [`EntityCache::load`], with the number of
/// entities now cached on success.
#[derive(Debug)]
pub struct CacheLoadReport {
    pub customers: Result<usize, OptimizerApiError>,
    pub storages: Result<usize, OptimizerApiError>,
}

impl EntityCache {
    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn storages(&self) -> &[Storage] {
        &self.storages
    }

    pub fn customer(&self, id: CustomerId) -> Option<&Customer> {
        self.customers.iter().find(|customer| customer.id() == id)
    }

    pub fn storage(&self, id: StorageId) -> Option<&Storage> {
        self.storages.iter().find(|storage| storage.id() == id)
    }

    pub fn replace_customers(&mut self, customers: Vec<Customer>) {
        self.customers = customers;
    }

    pub fn replace_storages(&mut self, storages: Vec<Storage>) {
        self.storages = storages;
    }

    pub fn apply_customers(
        &mut self,
        result: Result<Vec<Customer>, OptimizerApiError>,
    ) -> Result<usize, OptimizerApiError> {
        match result {
            Ok(customers) => {
                debug!("EntityCache: replacing {} customers", customers.len());
                self.replace_customers(customers);
                Ok(self.customers.len())
            }
            Err(err) => {
                error!("Error fetching customers: {}", err);
                Err(err)
            }
        }
    }

    pub fn apply_storages(
        &mut self,
        result: Result<Vec<Storage>, OptimizerApiError>,
    ) -> Result<usize, OptimizerApiError> {
        match result {
            Ok(storages) => {
                debug!("EntityCache: replacing {} storages", storages.len());
                self.replace_storages(storages);
                Ok(self.storages.len())
            }
            Err(err) => {
                error!("Error fetching storages: {}", err);
                Err(err)
            }
        }
    }

    /// Fetches both lists concurrently. Each list is updated on its own.
    pub async fn load<B: DeliveryBackend>(&mut self, backend: &B) -> CacheLoadReport {
        let (customers, storages) =
            tokio::join!(backend.fetch_customers(), backend.fetch_storages());

        CacheLoadReport {
            customers: self.apply_customers(customers),
            storages: self.apply_storages(storages),
        }
    }
}
