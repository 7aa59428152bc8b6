pub mod telegram;
pub mod tmdb;
