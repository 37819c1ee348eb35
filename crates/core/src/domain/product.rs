use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub i64);

impl ProductId {
    /// Identifiers are assigned from 1 upwards; anything else is malformed.
    pub fn is_valid(self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub brand_name: String,
    pub size: String,
    pub available: bool,
    pub description: String,
    pub price: Decimal,
}

impl Product {
    /// Overwrites every mutable field with the values of `source`. The id is kept.
    pub fn replace_fields(&mut self, source: &Product) {
        self.name.clone_from(&source.name);
        self.brand_name.clone_from(&source.brand_name);
        self.size.clone_from(&source.size);
        self.available = source.available;
        self.description.clone_from(&source.description);
        self.price = source.price;
    }
}

/// Create input. Without an id the store assigns the next free one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewProduct {
    pub id: Option<ProductId>,
    pub name: String,
    pub brand_name: String,
    pub size: String,
    pub available: bool,
    pub description: String,
    pub price: Decimal,
}

impl NewProduct {
    pub fn with_id(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            brand_name: self.brand_name,
            size: self.size,
            available: self.available,
            description: self.description,
            price: self.price,
        }
    }
}
