pub mod config;
pub mod domain;
pub mod dto;
pub mod errors;
pub mod mapper;
pub mod notifier;

pub use domain::catalog::CatalogProduct;
pub use domain::product::{NewProduct, Product, ProductId};
pub use dto::{NewProductDto, ProductDto};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use mapper::ProductMapper;
pub use notifier::{CatalogNotifier, NotifyError};
