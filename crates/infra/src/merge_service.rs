//! Attaching products to (and detaching them from) master products.

use chrono::Utc;
use thiserror::Error;

use shopforge_core::{DomainError, Entity, ProductId};
use shopforge_products::{Product, descendants};

use crate::store::{EntityStore, StoreError, StoreMergeGraph};

#[derive(Debug, Error)]
pub enum MergeError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Maintains the master/slave relation in a product store.
///
/// Unlike the resolver, which tolerates any shape, this refuses writes that
/// would introduce a cycle.
#[derive(Debug)]
pub struct MergeService<S> {
    store: S,
}

impl<S> MergeService<S>
where
    S: EntityStore<Entity = Product>,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn load(&self, id: ProductId) -> Result<Product, MergeError> {
        self.store
            .get(&id)?
            .ok_or_else(|| MergeError::Domain(DomainError::not_found()))
    }

    /// Merge `slave_id` into `master_id` and persist the slave.
    pub fn merge(&self, slave_id: ProductId, master_id: ProductId) -> Result<Product, MergeError> {
        let mut slave = self.load(slave_id)?;
        let master = self.load(master_id)?;

        let below = descendants(&StoreMergeGraph::new(&self.store), &slave)?;
        if below.contains(master.id()) {
            return Err(DomainError::invariant(
                "product cannot be merged into one of its own descendants",
            )
            .into());
        }

        slave.merge_into(master_id)?;
        slave.touch(Utc::now());
        self.store.save(slave.clone())?;

        tracing::info!(
            slave_id = %slave_id,
            master_id = %master_id,
            "product merged"
        );
        Ok(slave)
    }

    /// Detach a product from its master. A no-op for unmerged products.
    pub fn unmerge(&self, id: ProductId) -> Result<Product, MergeError> {
        let mut product = self.load(id)?;
        let Some(previous) = product.master_id() else {
            return Ok(product);
        };

        product.unmerge();
        product.touch(Utc::now());
        self.store.save(product.clone())?;

        tracing::info!(product_id = %id, master_id = %previous, "product unmerged");
        Ok(product)
    }
}
