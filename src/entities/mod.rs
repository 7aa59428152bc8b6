pub mod prelude;

pub mod categories;
pub mod content;
pub mod content_requests;
pub mod site_settings;
