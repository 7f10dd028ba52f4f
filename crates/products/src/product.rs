use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopforge_core::record::{
    optional_datetime, optional_integer, optional_text, optional_uuid, required_bool,
    required_integer, required_text, required_uuid,
};
use shopforge_core::{
    DomainError, DomainResult, Entity, FieldDef, FieldKind, FieldValue, ProductId, Record,
};

/// Catalog product.
///
/// A product may be merged into a master product; the master is referenced by
/// id only and never owned. Slaves are not stored on the product: they are the
/// products whose `master_id` names it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    sku: String,
    name: String,
    ean: Option<String>,
    price: Option<i64>, // smallest currency unit
    stock: i64,
    active: bool,
    master_id: Option<ProductId>,
    updated_at: Option<DateTime<Utc>>,
}

const FIELDS: &[FieldDef] = &[
    FieldDef::required("id", FieldKind::Uuid),
    FieldDef::required("sku", FieldKind::Text),
    FieldDef::required("name", FieldKind::Text),
    FieldDef::optional("ean", FieldKind::Text),
    FieldDef::optional("price", FieldKind::Integer),
    FieldDef::required("stock", FieldKind::Integer),
    FieldDef::required("active", FieldKind::Bool),
    FieldDef::optional("master_id", FieldKind::Uuid),
    FieldDef::optional("updated_at", FieldKind::DateTime),
];

impl Product {
    /// Create an active product with no stock.
    pub fn new(sku: impl Into<String>, name: impl Into<String>) -> DomainResult<Self> {
        Self::with_id(ProductId::new(), sku, name)
    }

    pub fn with_id(
        id: ProductId,
        sku: impl Into<String>,
        name: impl Into<String>,
    ) -> DomainResult<Self> {
        let sku = sku.into();
        let name = name.into();

        if sku.trim().is_empty() {
            return Err(DomainError::validation("SKU cannot be empty"));
        }
        if name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }

        Ok(Self {
            id,
            sku,
            name,
            ..Self::blank_with_id(id)
        })
    }

    fn blank_with_id(id: ProductId) -> Self {
        Self {
            id,
            sku: String::new(),
            name: String::new(),
            ean: None,
            price: None,
            stock: 0,
            active: true,
            master_id: None,
            updated_at: None,
        }
    }

    pub fn with_price(mut self, price: i64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_stock(mut self, stock: i64) -> Self {
        self.stock = stock;
        self
    }

    pub fn with_ean(mut self, ean: impl Into<String>) -> Self {
        self.ean = Some(ean.into());
        self
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ean(&self) -> Option<&str> {
        self.ean.as_deref()
    }

    pub fn price(&self) -> Option<i64> {
        self.price
    }

    pub fn stock(&self) -> i64 {
        self.stock
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn master_id(&self) -> Option<ProductId> {
        self.master_id
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Whether this product defers to a master product.
    pub fn is_merged(&self) -> bool {
        self.master_id.is_some()
    }

    /// Point this product at a master.
    ///
    /// Only the self-reference is checked here; deeper cycles need the whole
    /// tree and are checked where the tree is reachable.
    pub fn merge_into(&mut self, master: ProductId) -> DomainResult<()> {
        if master == self.id {
            return Err(DomainError::invariant("product cannot be merged into itself"));
        }
        self.master_id = Some(master);
        Ok(())
    }

    pub fn unmerge(&mut self) {
        self.master_id = None;
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = Some(at);
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Record for Product {
    fn fields() -> &'static [FieldDef] {
        FIELDS
    }

    fn blank() -> Self {
        Self::blank_with_id(ProductId::new())
    }

    fn get(&self, field: &str) -> DomainResult<FieldValue> {
        let value = match field {
            "id" => FieldValue::Uuid(*self.id.as_uuid()),
            "sku" => self.sku.as_str().into(),
            "name" => self.name.as_str().into(),
            "ean" => self.ean.clone().into(),
            "price" => self.price.into(),
            "stock" => self.stock.into(),
            "active" => self.active.into(),
            "master_id" => self.master_id.map(|m| *m.as_uuid()).into(),
            "updated_at" => self.updated_at.into(),
            other => return Err(DomainError::unknown_field(other)),
        };
        Ok(value)
    }

    fn set(&mut self, field: &str, value: FieldValue) -> DomainResult<()> {
        match field {
            "id" => self.id = ProductId::from_uuid(required_uuid(field, value)?),
            "sku" => {
                let sku = required_text(field, value)?;
                if sku.trim().is_empty() {
                    return Err(DomainError::validation("SKU cannot be empty"));
                }
                self.sku = sku;
            }
            "name" => {
                let name = required_text(field, value)?;
                if name.trim().is_empty() {
                    return Err(DomainError::validation("name cannot be empty"));
                }
                self.name = name;
            }
            "ean" => self.ean = optional_text(field, value)?,
            "price" => self.price = optional_integer(field, value)?,
            "stock" => self.stock = required_integer(field, value)?,
            "active" => self.active = required_bool(field, value)?,
            "master_id" => match optional_uuid(field, value)? {
                Some(master) => self.merge_into(ProductId::from_uuid(master))?,
                None => self.unmerge(),
            },
            "updated_at" => self.updated_at = optional_datetime(field, value)?,
            other => return Err(DomainError::unknown_field(other)),
        }
        Ok(())
    }
}
