//! Supplier offer lookup, broadened across merged products.
//!
//! Suppliers often list a variant rather than the canonical product (or the
//! other way round). When a product has no offer of its own, offers attached
//! to any product in its merge tree stand in for it.

use shopforge_core::{Entity, ProductId};
use shopforge_products::{MergeSet, Product, SupplierProduct, resolve_merged};

use crate::store::{EntityStore, StoreError, StoreMergeGraph};

#[derive(Debug)]
pub struct SupplierLookup<P, O> {
    products: P,
    offers: O,
}

impl<P, O> SupplierLookup<P, O>
where
    P: EntityStore<Entity = Product>,
    O: EntityStore<Entity = SupplierProduct>,
{
    pub fn new(products: P, offers: O) -> Self {
        Self { products, offers }
    }

    /// Every product sharing a merge tree with `product`, ancestors first.
    fn merged_with(&self, product: &Product) -> Result<MergeSet, StoreError> {
        resolve_merged(&StoreMergeGraph::new(&self.products), product, false, true)
    }

    fn offer_of(
        &self,
        product_id: ProductId,
        supplier_code: &str,
    ) -> Result<Option<SupplierProduct>, StoreError> {
        self.offers.find(&|o: &SupplierProduct| {
            o.product_id() == product_id && o.is_from(supplier_code)
        })
    }

    /// The supplier's offer for `product`.
    ///
    /// The product's own offer wins; otherwise merged products are tried in
    /// resolver order and the first offer found is returned.
    pub fn find_offer(
        &self,
        product: &Product,
        supplier_code: &str,
    ) -> Result<Option<SupplierProduct>, StoreError> {
        if let Some(own) = self.offer_of(*product.id(), supplier_code)? {
            return Ok(Some(own));
        }

        for merged in &self.merged_with(product)? {
            if let Some(offer) = self.offer_of(*merged.id(), supplier_code)? {
                tracing::debug!(
                    product_id = %product.id(),
                    via_product_id = %merged.id(),
                    supplier = supplier_code,
                    "supplier offer found through merged product"
                );
                return Ok(Some(offer));
            }
        }

        Ok(None)
    }

    /// All offers for `product` and its merged products, own offers first.
    pub fn offers_for(&self, product: &Product) -> Result<Vec<SupplierProduct>, StoreError> {
        let own_id = *product.id();
        let mut offers = self
            .offers
            .filter(&|o: &SupplierProduct| o.product_id() == own_id)?;

        for merged in &self.merged_with(product)? {
            let merged_id = *merged.id();
            offers.extend(
                self.offers
                    .filter(&|o: &SupplierProduct| o.product_id() == merged_id)?,
            );
        }

        Ok(offers)
    }
}
