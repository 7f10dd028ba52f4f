//! Products domain module.
//!
//! Catalog entities (products, supplier offers) and the merge resolver that
//! walks master/slave product trees. Pure domain logic: storage is reached
//! through the [`MergeGraph`] trait only.

pub mod merge;
pub mod product;
pub mod supplier;

pub use merge::{MergeGraph, MergeSet, descendants, resolve_merged};
pub use product::Product;
pub use supplier::SupplierProduct;
