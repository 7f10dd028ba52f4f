//! Merge graph backed by a product store.

use shopforge_core::Entity;
use shopforge_products::{MergeGraph, Product};

use super::entity_store::{EntityStore, StoreError};

/// Answers master/slave queries with store lookups.
///
/// Slaves come back in the store's collection order.
#[derive(Debug)]
pub struct StoreMergeGraph<'a, S> {
    store: &'a S,
}

impl<'a, S> StoreMergeGraph<'a, S>
where
    S: EntityStore<Entity = Product>,
{
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }
}

impl<S> MergeGraph for StoreMergeGraph<'_, S>
where
    S: EntityStore<Entity = Product>,
{
    type Error = StoreError;

    fn master_of(&self, product: &Product) -> Result<Option<Product>, StoreError> {
        match product.master_id() {
            Some(master_id) => self.store.get(&master_id),
            None => Ok(None),
        }
    }

    fn slaves_of(&self, product: &Product) -> Result<Vec<Product>, StoreError> {
        let id = *product.id();
        self.store.filter(&|p: &Product| p.master_id() == Some(id))
    }
}
