pub use super::categories::Entity as Categories;
pub use super::content::Entity as Content;
pub use super::content_requests::Entity as ContentRequests;
pub use super::site_settings::Entity as SiteSettings;
