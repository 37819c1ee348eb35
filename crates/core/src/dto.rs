//! Wire shapes of the public product API.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::product::{NewProduct, Product, ProductId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: ProductId,
    pub name: String,
    pub brand_name: String,
    pub size: String,
    pub available: bool,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

/// Body of a create request; `id` may be left out.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProductDto {
    #[serde(default)]
    pub id: Option<ProductId>,
    pub name: String,
    pub brand_name: String,
    pub size: String,
    pub available: bool,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

impl From<ProductDto> for Product {
    fn from(dto: ProductDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            brand_name: dto.brand_name,
            size: dto.size,
            available: dto.available,
            description: dto.description,
            price: dto.price,
        }
    }
}

impl From<NewProductDto> for NewProduct {
    fn from(dto: NewProductDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            brand_name: dto.brand_name,
            size: dto.size,
            available: dto.available,
            description: dto.description,
            price: dto.price,
        }
    }
}
