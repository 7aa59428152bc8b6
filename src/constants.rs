pub const PLACEHOLDER_POSTER: &str = "https://via.placeholder.com/400x600.png?text=Poster+Not+Found";

/// Fixed quality tiers a movie link entry may use, in display order.
pub const QUALITY_TIERS: &[&str] = &["480p", "720p", "1080p", "BLU-RAY"];

/// Quality label used in notifications when a record carries no links.
pub const DEFAULT_QUALITY_LABEL: &str = "BLU-RAY";

/// Category names that filter by content kind instead of category membership.
pub const LATEST_MOVIES: &str = "Latest Movies";
pub const LATEST_SERIES: &str = "Latest Series";

/// Category surfaced first on the home feed when present and non-empty.
pub const TRENDING_CATEGORY: &str = "Trending";

/// Seeded into an empty categories table on first boot.
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "Bangla",
    "Hindi",
    "English",
    "18+ Adult",
    "Korean",
    "Dual Audio",
    "Bangla Dubbed",
    "Hindi Dubbed",
    "Indonesian",
    "Horror",
    "Action",
    "Thriller",
    "Anime",
    "Romance",
    "Trending",
];

pub mod limits {

    pub const ITEMS_PER_PAGE: u64 = 20;

    pub const HOME_SECTION_SIZE: u64 = 10;

    pub const RELATED_CONTENT_SIZE: u64 = 10;

    pub const MAX_SEARCH_RESULTS: u64 = 10;
}

pub mod timeouts {
    use std::time::Duration;

    pub const TMDB_REQUEST: Duration = Duration::from_secs(10);

    pub const TELEGRAM_REQUEST: Duration = Duration::from_secs(15);
}
