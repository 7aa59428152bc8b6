pub mod category;
pub mod content;
pub mod request;
pub mod settings;
