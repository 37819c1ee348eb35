use serde::{Deserialize, Serialize};

use super::product::{Product, ProductId};

/// Summary of a product as kept by the external catalog service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogProduct {
    pub id: ProductId,
    pub name: String,
    pub brand_name: String,
}

impl From<&Product> for CatalogProduct {
    fn from(product: &Product) -> Self {
        Self { id: product.id, name: product.name.clone(), brand_name: product.brand_name.clone() }
    }
}
