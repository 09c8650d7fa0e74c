use crate::{
    customer::{Customer, CustomerId},
    entity_cache::EntityCache,
    storage::{Storage, StorageId},
};

/// What the operator picked: customers to visit, the depot, and the text
/// narrowing the customer list on screen.
///
/// Nothing here is checked against the cache. Ids that are not (or no longer)
/// cached are resolved away when the request is built.
#[derive(Debug, Default, Clone)]
pub struct SelectionModel {
    selected_customers: Vec<CustomerId>,
    active_storage: Option<StorageId>,
    filter: String,
}

impl SelectionModel {
    /// Returns whether the customer is selected after the toggle.
    pub fn toggle_customer(&mut self, id: CustomerId) -> bool {
        if let Some(index) = self.selected_customers.iter().position(|&c| c == id) {
            self.selected_customers.remove(index);
            false
        } else {
            self.selected_customers.push(id);
            true
        }
    }

    pub fn is_selected(&self, id: CustomerId) -> bool {
        self.selected_customers.contains(&id)
    }

    /// Selected ids in the order they were picked
    pub fn selected_customers(&self) -> &[CustomerId] {
        &self.selected_customers
    }

    pub fn set_active_storage(&mut self, id: StorageId) {
        self.active_storage = Some(id);
    }

    pub fn active_storage(&self) -> Option<StorageId> {
        self.active_storage
    }

    pub fn active_storage_in<'a>(&self, cache: &'a EntityCache) -> Option<&'a Storage> {
        self.active_storage.and_then(|id| cache.storage(id))
    }

    /// Picks the first cached storage as depot, unless the chosen one is still
    /// in the cache.
    pub fn adopt_default_storage(&mut self, cache: &EntityCache) -> Option<StorageId> {
        if self.active_storage_in(cache).is_none() {
            self.active_storage = cache.storages().first().map(Storage::id);
        }

        self.active_storage
    }

    pub fn set_filter(&mut self, text: impl Into<String>) {
        self.filter = text.into();
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Cached customers whose name or address contains the filter, ignoring
    /// case, in cache order. Only meant for display.
    pub fn filtered_customers<'a>(
        &self,
        cache: &'a EntityCache,
    ) -> impl Iterator<Item = &'a Customer> + use<'a> {
        let needle = self.filter.to_lowercase();
        cache
            .customers()
            .iter()
            .filter(move |customer| customer.matches(&needle))
    }
}
