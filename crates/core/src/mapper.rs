use crate::domain::product::Product;
use crate::dto::ProductDto;

/// Projects stored products onto the public API shape.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProductMapper;

impl ProductMapper {
    pub fn to_dto(&self, product: &Product) -> ProductDto {
        ProductDto::from(product)
    }
}

impl From<&Product> for ProductDto {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            brand_name: product.brand_name.clone(),
            size: product.size.clone(),
            available: product.available,
            description: product.description.clone(),
            price: product.price,
        }
    }
}
