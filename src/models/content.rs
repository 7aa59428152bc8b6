use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_QUALITY_LABEL;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Movie,
    Series,
}

impl ContentKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "series",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "movie" => Some(Self::Movie),
            "series" => Some(Self::Series),
            _ => None,
        }
    }
}

impl Default for ContentKind {
    fn default() -> Self {
        Self::Movie
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One download/watch entry for a fixed quality tier. Exists only when at
/// least one of the URLs is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityLink {
    pub quality: String,
    pub watch_url: Option<String>,
    pub download_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    pub season: i32,
    pub episode_number: i32,
    pub title: Option<String>,
    pub watch_link: String,
}

/// A bundled link covering an entire season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonPack {
    pub season_number: i32,
    pub watch_link: Option<String>,
    pub download_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualLink {
    pub name: String,
    pub url: String,
}

/// Link shape of a record, keyed by content kind. Exactly one variant is
/// stored; switching kind on update replaces the whole shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ContentLinks {
    Movie {
        links: Vec<QualityLink>,
    },
    Series {
        episodes: Vec<Episode>,
        season_packs: Vec<SeasonPack>,
    },
}

impl ContentLinks {
    #[must_use]
    pub const fn kind(&self) -> ContentKind {
        match self {
            Self::Movie { .. } => ContentKind::Movie,
            Self::Series { .. } => ContentKind::Series,
        }
    }

    /// Deduplicated, sorted quality labels for notification captions.
    /// Falls back to a single placeholder label when none are present.
    #[must_use]
    pub fn quality_labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = match self {
            Self::Movie { links } => links.iter().map(|l| l.quality.clone()).collect(),
            Self::Series { .. } => Vec::new(),
        };

        labels.sort();
        labels.dedup();

        if labels.is_empty() {
            labels.push(DEFAULT_QUALITY_LABEL.to_string());
        }
        labels
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub id: i32,
    pub title: String,
    pub poster: String,
    pub backdrop: Option<String>,
    pub overview: String,
    pub screenshots: Vec<String>,
    pub language: Option<String>,
    pub genres: Vec<String>,
    pub categories: Vec<String>,
    pub links: ContentLinks,
    pub manual_links: Vec<ManualLink>,
    pub view_count: i64,
    pub is_completed: bool,
    pub tmdb_id: Option<String>,
    pub release_date: Option<String>,
    pub rating: Option<f32>,
    pub created_at: String,
    pub updated_at: String,
}

impl Content {
    #[must_use]
    pub const fn kind(&self) -> ContentKind {
        self.links.kind()
    }
}
