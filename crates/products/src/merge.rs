//! Merge resolver: transitive closure over master/slave product trees.
//!
//! Slave products defer to a master product. Broadened lookups (supplier
//! offers, search) need every product related to a given one through that
//! relation. The relation should form a forest, but nothing enforces it at the
//! storage level, so every walk here tracks visited ids and terminates on any
//! input, cyclic or not.

use std::collections::HashSet;

use shopforge_core::{Entity, ProductId};

use crate::product::Product;

/// Read access to the master/slave relation.
///
/// Implemented by storage adapters; the resolver only ever reads.
pub trait MergeGraph {
    type Error;

    /// The product named by `product.master_id()`, if it exists.
    fn master_of(&self, product: &Product) -> Result<Option<Product>, Self::Error>;

    /// Products naming `product` as their master, in collection order.
    fn slaves_of(&self, product: &Product) -> Result<Vec<Product>, Self::Error>;
}

impl<G: MergeGraph + ?Sized> MergeGraph for &G {
    type Error = G::Error;

    fn master_of(&self, product: &Product) -> Result<Option<Product>, Self::Error> {
        (**self).master_of(product)
    }

    fn slaves_of(&self, product: &Product) -> Result<Vec<Product>, Self::Error> {
        (**self).slaves_of(product)
    }
}

/// Ordered, id-deduplicated set of products.
///
/// Iteration follows insertion order. Ids marked as excluded are treated as
/// already present and never inserted.
#[derive(Debug, Clone, Default)]
pub struct MergeSet {
    products: Vec<Product>,
    seen: HashSet<ProductId>,
}

impl MergeSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn excluding(id: ProductId) -> Self {
        Self {
            products: Vec::new(),
            seen: HashSet::from([id]),
        }
    }

    /// Insert unless the id was seen before. Returns whether it was inserted.
    pub fn insert(&mut self, product: Product) -> bool {
        if !self.seen.insert(*product.id()) {
            return false;
        }
        self.products.push(product);
        true
    }

    pub fn contains(&self, id: &ProductId) -> bool {
        self.seen.contains(id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Product> {
        self.products.iter()
    }

    pub fn ids(&self) -> Vec<ProductId> {
        self.products.iter().map(|p| *p.id()).collect()
    }

    pub fn into_vec(self) -> Vec<Product> {
        self.products
    }
}

impl IntoIterator for MergeSet {
    type Item = Product;
    type IntoIter = std::vec::IntoIter<Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.products.into_iter()
    }
}

impl<'a> IntoIterator for &'a MergeSet {
    type Item = &'a Product;
    type IntoIter = std::slice::Iter<'a, Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.products.iter()
    }
}

/// Every product reachable from `product` through the slave relation.
///
/// Depth-first, pre-order (a product comes before its own slaves), each id at
/// most once. `product` itself only appears if the data loops back to it.
pub fn descendants<G: MergeGraph>(graph: &G, product: &Product) -> Result<MergeSet, G::Error> {
    let mut out = MergeSet::new();
    collect_descendants(graph, product, &mut out)?;
    Ok(out)
}

/// Pre-order walk with an explicit stack of sibling iterators.
///
/// A product is checked against `out` before its slaves are fetched, so a
/// cycle is cut the second time any of its members is reached.
fn collect_descendants<G: MergeGraph>(
    graph: &G,
    root: &Product,
    out: &mut MergeSet,
) -> Result<(), G::Error> {
    let mut stack = vec![graph.slaves_of(root)?.into_iter()];

    while let Some(siblings) = stack.last_mut() {
        let Some(child) = siblings.next() else {
            stack.pop();
            continue;
        };
        if out.contains(child.id()) {
            continue;
        }
        let grandchildren = graph.slaves_of(&child)?;
        out.insert(child);
        stack.push(grandchildren.into_iter());
    }

    Ok(())
}

/// Resolve the products merged with `product`.
///
/// With `only_descendants` this is [`descendants`]. Otherwise the master chain
/// is walked upwards and the result is the ancestors, most distant first,
/// followed by the product's own descendants. With
/// `include_descendants_of_ascendants` each ancestor is followed by its own
/// descendants. Outside the `only_descendants` mode the result is
/// deduplicated across all parts and never contains `product` itself.
pub fn resolve_merged<G: MergeGraph>(
    graph: &G,
    product: &Product,
    only_descendants: bool,
    include_descendants_of_ascendants: bool,
) -> Result<MergeSet, G::Error> {
    if only_descendants {
        return descendants(graph, product);
    }

    let up = ascendants(graph, product)?;

    let mut out = MergeSet::excluding(*product.id());
    for ascendant in up.into_iter().rev() {
        let walk_from = include_descendants_of_ascendants.then(|| ascendant.clone());
        out.insert(ascendant);
        if let Some(ascendant) = walk_from {
            collect_descendants(graph, &ascendant, &mut out)?;
        }
    }
    collect_descendants(graph, product, &mut out)?;

    Ok(out)
}

/// Master chain of `product`, nearest master first.
fn ascendants<G: MergeGraph>(graph: &G, product: &Product) -> Result<Vec<Product>, G::Error> {
    let mut visited = HashSet::from([*product.id()]);
    let mut up = Vec::new();
    let mut current = graph.master_of(product)?;

    while let Some(master) = current {
        if !visited.insert(*master.id()) {
            tracing::warn!(
                product_id = %product.id(),
                master_id = %master.id(),
                "cyclic master chain, stopping ascent"
            );
            break;
        }
        current = graph.master_of(&master)?;
        up.push(master);
    }

    Ok(up)
}
