//! Supplier offers: a supplier's listing of one catalog product.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shopforge_core::record::{optional_integer, required_integer, required_text, required_uuid};
use shopforge_core::{
    DomainError, DomainResult, Entity, FieldDef, FieldKind, FieldValue, ProductId, Record,
    SupplierProductId,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierProduct {
    id: SupplierProductId,
    supplier_code: String,
    product_id: ProductId,
    supplier_sku: String,
    price: Option<i64>,
    stock: i64,
}

const FIELDS: &[FieldDef] = &[
    FieldDef::required("id", FieldKind::Uuid),
    FieldDef::required("supplier_code", FieldKind::Text),
    FieldDef::required("product_id", FieldKind::Uuid),
    FieldDef::required("supplier_sku", FieldKind::Text),
    FieldDef::optional("price", FieldKind::Integer),
    FieldDef::required("stock", FieldKind::Integer),
];

impl SupplierProduct {
    pub fn new(
        supplier_code: impl Into<String>,
        product_id: ProductId,
        supplier_sku: impl Into<String>,
    ) -> DomainResult<Self> {
        let supplier_code = supplier_code.into();
        if supplier_code.trim().is_empty() {
            return Err(DomainError::validation("supplier code cannot be empty"));
        }
        Ok(Self {
            id: SupplierProductId::new(),
            supplier_code,
            product_id,
            supplier_sku: supplier_sku.into(),
            price: None,
            stock: 0,
        })
    }

    pub fn with_price(mut self, price: i64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_stock(mut self, stock: i64) -> Self {
        self.stock = stock;
        self
    }

    pub fn supplier_code(&self) -> &str {
        &self.supplier_code
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn supplier_sku(&self) -> &str {
        &self.supplier_sku
    }

    pub fn price(&self) -> Option<i64> {
        self.price
    }

    pub fn stock(&self) -> i64 {
        self.stock
    }

    pub fn is_from(&self, supplier_code: &str) -> bool {
        self.supplier_code == supplier_code
    }
}

impl Entity for SupplierProduct {
    type Id = SupplierProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Record for SupplierProduct {
    fn fields() -> &'static [FieldDef] {
        FIELDS
    }

    fn blank() -> Self {
        Self {
            id: SupplierProductId::new(),
            supplier_code: String::new(),
            product_id: ProductId::from_uuid(Uuid::nil()),
            supplier_sku: String::new(),
            price: None,
            stock: 0,
        }
    }

    fn get(&self, field: &str) -> DomainResult<FieldValue> {
        let value = match field {
            "id" => FieldValue::Uuid(*self.id.as_uuid()),
            "supplier_code" => self.supplier_code.as_str().into(),
            "product_id" => FieldValue::Uuid(*self.product_id.as_uuid()),
            "supplier_sku" => self.supplier_sku.as_str().into(),
            "price" => self.price.into(),
            "stock" => self.stock.into(),
            other => return Err(DomainError::unknown_field(other)),
        };
        Ok(value)
    }

    fn set(&mut self, field: &str, value: FieldValue) -> DomainResult<()> {
        match field {
            "id" => self.id = SupplierProductId::from_uuid(required_uuid(field, value)?),
            "supplier_code" => {
                let code = required_text(field, value)?;
                if code.trim().is_empty() {
                    return Err(DomainError::validation("supplier code cannot be empty"));
                }
                self.supplier_code = code;
            }
            "product_id" => self.product_id = ProductId::from_uuid(required_uuid(field, value)?),
            "supplier_sku" => self.supplier_sku = required_text(field, value)?,
            "price" => self.price = optional_integer(field, value)?,
            "stock" => self.stock = required_integer(field, value)?,
            other => return Err(DomainError::unknown_field(other)),
        }
        Ok(())
    }
}
