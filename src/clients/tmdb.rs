use anyhow::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::TmdbConfig;
use crate::constants::timeouts;
use crate::models::content::ContentKind;

const IMAGE_BASE: &str = "https://image.tmdb.org/t/p";
const POSTER_SIZE: &str = "w500";
const BACKDROP_SIZE: &str = "w1280";
const THUMBNAIL_SIZE: &str = "w200";

/// Structured record resolved from a TMDB id, ready to prefill admin fields.
#[derive(Debug, Clone, Serialize)]
pub struct TmdbDetails {
    pub tmdb_id: String,
    pub title: Option<String>,
    pub poster: Option<String>,
    pub backdrop: Option<String>,
    pub overview: Option<String>,
    pub release_date: Option<String>,
    pub genres: Vec<String>,
    pub vote_average: Option<f32>,
    pub kind: ContentKind,
}

#[derive(Debug, Clone, Serialize)]
pub struct TmdbSearchItem {
    pub id: i64,
    pub title: String,
    pub year: String,
    pub poster: String,
    pub media_type: String,
}

#[derive(Debug, Deserialize)]
struct Genre {
    name: String,
}

#[derive(Debug, Deserialize)]
struct DetailResponse {
    title: Option<String>,
    name: Option<String>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    overview: Option<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    genres: Option<Vec<Genre>>,
    vote_average: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct MultiSearchResponse {
    results: Option<Vec<MultiSearchItem>>,
}

#[derive(Debug, Deserialize)]
struct MultiSearchItem {
    id: i64,
    title: Option<String>,
    name: Option<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    poster_path: Option<String>,
    media_type: Option<String>,
}

fn image_url(size: &str, path: Option<&String>) -> Option<String> {
    path.map(|p| format!("{IMAGE_BASE}/{size}{p}"))
}

fn map_details(tmdb_id: &str, kind: ContentKind, data: DetailResponse) -> TmdbDetails {
    TmdbDetails {
        tmdb_id: tmdb_id.to_string(),
        title: data.title.or(data.name),
        poster: image_url(POSTER_SIZE, data.poster_path.as_ref()),
        backdrop: image_url(BACKDROP_SIZE, data.backdrop_path.as_ref()),
        overview: data.overview,
        release_date: data.release_date.or(data.first_air_date),
        genres: data
            .genres
            .unwrap_or_default()
            .into_iter()
            .map(|g| g.name)
            .collect(),
        vote_average: data.vote_average,
        kind,
    }
}

#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl TmdbClient {
    pub fn new(config: &TmdbConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeouts::TMDB_REQUEST)
            .user_agent("Cinedex/1.0")
            .build()?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Resolves a TMDB id into a structured record. A non-2xx response maps
    /// to `Ok(None)`; only transport failures surface as `Err`, and callers
    /// treat those as missing enrichment.
    pub async fn details(&self, tmdb_id: &str, kind: ContentKind) -> Result<Option<TmdbDetails>> {
        let path = match kind {
            ContentKind::Movie => "movie",
            ContentKind::Series => "tv",
        };
        let url = format!(
            "{}/{}/{}?api_key={}",
            self.base_url,
            path,
            urlencoding::encode(tmdb_id),
            self.api_key
        );

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Ok(None);
        }

        let data: DetailResponse = response.json().await?;
        Ok(Some(map_details(tmdb_id, kind, data)))
    }

    /// Multi-search over movies and series, filtered to items with both a
    /// recognized media type and a poster.
    pub async fn search_multi(&self, query: &str) -> Result<Vec<TmdbSearchItem>> {
        let url = format!(
            "{}/search/multi?api_key={}&query={}",
            self.base_url,
            self.api_key,
            urlencoding::encode(query)
        );

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("TMDB API error: {} - {}", status, body));
        }

        let data: MultiSearchResponse = response.json().await?;

        let items = data
            .results
            .unwrap_or_default()
            .into_iter()
            .filter(|item| {
                matches!(item.media_type.as_deref(), Some("movie" | "tv"))
                    && item.poster_path.is_some()
            })
            .map(|item| {
                let date = item
                    .release_date
                    .or(item.first_air_date)
                    .unwrap_or_else(|| "N/A".to_string());
                let year = date.split('-').next().unwrap_or("N/A").to_string();

                TmdbSearchItem {
                    id: item.id,
                    title: item.title.or(item.name).unwrap_or_default(),
                    year,
                    poster: image_url(THUMBNAIL_SIZE, item.poster_path.as_ref())
                        .unwrap_or_default(),
                    media_type: item.media_type.unwrap_or_default(),
                }
            })
            .collect();

        Ok(items)
    }
}
