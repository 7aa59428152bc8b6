pub mod admin;
pub mod catalog;

pub use admin::{AdminError, ContentAdminService, ContentPayload};
pub use catalog::{CatalogError, CatalogService, CategorySection, HomeFeed, Pagination};
