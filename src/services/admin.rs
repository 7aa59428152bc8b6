use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::clients::telegram::{NotificationKind, TelegramNotifier};
use crate::clients::tmdb::{TmdbClient, TmdbDetails};
use crate::constants::{PLACEHOLDER_POSTER, QUALITY_TIERS};
use crate::db::Store;
use crate::models::content::{
    Content, ContentKind, ContentLinks, Episode, ManualLink, QualityLink, SeasonPack,
};

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("Title must not be empty")]
    EmptyTitle,

    #[error("Content {0} not found")]
    NotFound(i32),

    #[error("Database error: {0}")]
    Database(String),

    #[error("External API error: {service} - {message}")]
    ExternalApi { service: String, message: String },
}

impl From<anyhow::Error> for AdminError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl AdminError {
    pub fn tmdb_error(msg: impl Into<String>) -> Self {
        Self::ExternalApi {
            service: "TMDB".to_string(),
            message: msg.into(),
        }
    }
}

fn non_blank(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Structured admin submission for creating or updating a content record.
/// Link shapes arrive as explicit object arrays rather than the parallel
/// same-named form fields the admin UI zips client-side.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentPayload {
    #[serde(default)]
    pub title: String,
    pub kind: ContentKind,
    #[serde(default)]
    pub poster: String,
    #[serde(default)]
    pub backdrop: String,
    #[serde(default)]
    pub overview: String,
    /// Newline-separated screenshot URLs; blank lines dropped.
    #[serde(default)]
    pub screenshots: String,
    #[serde(default)]
    pub language: String,
    /// Comma-separated genre names.
    #[serde(default)]
    pub genres: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub tmdb_id: Option<String>,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub links: Vec<QualityLinkInput>,
    #[serde(default)]
    pub episodes: Vec<EpisodeInput>,
    #[serde(default)]
    pub season_packs: Vec<SeasonPackInput>,
    #[serde(default)]
    pub manual_links: Vec<ManualLinkInput>,
    /// Update only: opt-in to re-firing the notification channel.
    #[serde(default)]
    pub send_notification: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QualityLinkInput {
    pub quality: String,
    #[serde(default)]
    pub watch_url: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EpisodeInput {
    #[serde(default)]
    pub season: Option<i32>,
    #[serde(default)]
    pub episode_number: Option<i32>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub watch_link: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeasonPackInput {
    #[serde(default)]
    pub season_number: Option<i32>,
    #[serde(default)]
    pub watch_link: Option<String>,
    #[serde(default)]
    pub download_link: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ManualLinkInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

fn parse_genres(raw: &str) -> Vec<String> {
    raw.split(',').filter_map(non_blank).collect()
}

fn parse_screenshots(raw: &str) -> Vec<String> {
    raw.lines().filter_map(non_blank).collect()
}

/// Keeps only entries on a recognized tier with at least one URL, in tier
/// order.
fn build_movie_links(inputs: &[QualityLinkInput]) -> Vec<QualityLink> {
    QUALITY_TIERS
        .iter()
        .filter_map(|tier| {
            let input = inputs.iter().find(|l| l.quality == *tier)?;
            let watch_url = input.watch_url.as_deref().and_then(non_blank);
            let download_url = input.download_url.as_deref().and_then(non_blank);

            if watch_url.is_none() && download_url.is_none() {
                return None;
            }

            Some(QualityLink {
                quality: (*tier).to_string(),
                watch_url,
                download_url,
            })
        })
        .collect()
}

/// Entries missing season, number or watch link are skipped, not rejected.
fn build_episodes(inputs: &[EpisodeInput]) -> Vec<Episode> {
    inputs
        .iter()
        .filter_map(|input| {
            let season = input.season?;
            let episode_number = input.episode_number?;
            let watch_link = input.watch_link.as_deref().and_then(non_blank)?;

            Some(Episode {
                season,
                episode_number,
                title: input.title.as_deref().and_then(non_blank),
                watch_link,
            })
        })
        .collect()
}

/// Entries without a season number are skipped; duplicate season numbers
/// are deduped, first occurrence wins.
fn build_season_packs(inputs: &[SeasonPackInput]) -> Vec<SeasonPack> {
    let mut seen = Vec::new();
    inputs
        .iter()
        .filter_map(|input| {
            let season_number = input.season_number?;
            if seen.contains(&season_number) {
                return None;
            }
            seen.push(season_number);

            Some(SeasonPack {
                season_number,
                watch_link: input.watch_link.as_deref().and_then(non_blank),
                download_link: input.download_link.as_deref().and_then(non_blank),
            })
        })
        .collect()
}

fn build_manual_links(inputs: &[ManualLinkInput]) -> Vec<ManualLink> {
    inputs
        .iter()
        .filter_map(|input| {
            Some(ManualLink {
                name: input.name.as_deref().and_then(non_blank)?,
                url: input.url.as_deref().and_then(non_blank)?,
            })
        })
        .collect()
}

fn build_links(payload: &ContentPayload) -> ContentLinks {
    match payload.kind {
        ContentKind::Movie => ContentLinks::Movie {
            links: build_movie_links(&payload.links),
        },
        ContentKind::Series => ContentLinks::Series {
            episodes: build_episodes(&payload.episodes),
            season_packs: build_season_packs(&payload.season_packs),
        },
    }
}

/// Write-side content curation: validates and maps admin payloads into
/// records, enriches from TMDB, and dispatches channel notifications after
/// the store write lands.
#[derive(Clone)]
pub struct ContentAdminService {
    store: Store,
    tmdb: Arc<TmdbClient>,
    notifier: Arc<TelegramNotifier>,
}

impl ContentAdminService {
    #[must_use]
    pub fn new(store: Store, tmdb: Arc<TmdbClient>, notifier: Arc<TelegramNotifier>) -> Self {
        Self {
            store,
            tmdb,
            notifier,
        }
    }

    fn map_payload(payload: &ContentPayload, now: &str) -> Result<Content, AdminError> {
        let title = non_blank(&payload.title).ok_or(AdminError::EmptyTitle)?;

        Ok(Content {
            id: 0,
            title,
            poster: non_blank(&payload.poster).unwrap_or_else(|| PLACEHOLDER_POSTER.to_string()),
            backdrop: non_blank(&payload.backdrop),
            overview: payload.overview.trim().to_string(),
            screenshots: parse_screenshots(&payload.screenshots),
            language: non_blank(&payload.language),
            genres: parse_genres(&payload.genres),
            categories: payload.categories.clone(),
            links: build_links(payload),
            manual_links: build_manual_links(&payload.manual_links),
            view_count: 0,
            is_completed: payload.is_completed,
            tmdb_id: payload.tmdb_id.as_deref().and_then(non_blank),
            release_date: None,
            rating: None,
            created_at: now.to_string(),
            updated_at: now.to_string(),
        })
    }

    /// TMDB enrichment is best-effort: any failure degrades to empty fields
    /// and the create proceeds.
    async fn enrich(&self, record: &mut Content) {
        let Some(tmdb_id) = record.tmdb_id.clone() else {
            return;
        };

        match self.tmdb.details(&tmdb_id, record.kind()).await {
            Ok(Some(details)) => {
                record.release_date = details.release_date;
                record.rating = details.vote_average;
            }
            Ok(None) => {
                warn!("TMDB has no details for id {}, skipping enrichment", tmdb_id);
            }
            Err(err) => {
                warn!("TMDB enrichment failed for id {}: {:#}", tmdb_id, err);
            }
        }
    }

    async fn dispatch_notification(&self, record: &Content, id: i32, kind: NotificationKind) {
        if let Err(err) = self.notifier.notify(record, id, kind).await {
            warn!(
                "Notification for content {} failed (ignored): {:#}",
                id, err
            );
        }
    }

    pub async fn create(&self, payload: &ContentPayload) -> Result<Content, AdminError> {
        let now = Utc::now().to_rfc3339();
        let mut record = Self::map_payload(payload, &now)?;

        self.enrich(&mut record).await;

        let id = self.store.add_content(&record).await?;
        record.id = id;

        self.dispatch_notification(&record, id, NotificationKind::New)
            .await;

        Ok(record)
    }

    pub async fn update(&self, id: i32, payload: &ContentPayload) -> Result<Content, AdminError> {
        let existing = self
            .store
            .get_content(id)
            .await?
            .ok_or(AdminError::NotFound(id))?;

        let now = Utc::now().to_rfc3339();
        let mut record = Self::map_payload(payload, &now)?;

        // Enrichment fields are managed by create/resync, not the edit form.
        record.tmdb_id = record.tmdb_id.or(existing.tmdb_id);
        record.release_date = existing.release_date;
        record.rating = existing.rating;

        let updated = self
            .store
            .update_content(id, &record)
            .await?
            .ok_or(AdminError::NotFound(id))?;

        if payload.send_notification {
            self.dispatch_notification(&updated, id, NotificationKind::Update)
                .await;
        }

        Ok(updated)
    }

    /// Idempotent: deleting an absent id is not an error.
    pub async fn delete(&self, id: i32) -> Result<(), AdminError> {
        self.store.remove_content(id).await?;
        Ok(())
    }

    pub async fn bulk_delete(&self, ids: &[i32]) -> Result<u64, AdminError> {
        let removed = self.store.remove_content_bulk(ids).await?;
        Ok(removed)
    }

    /// Re-fetches TMDB fields for the caller to apply selectively; does not
    /// touch the store.
    pub async fn resync(
        &self,
        tmdb_id: &str,
        kind: ContentKind,
    ) -> Result<Option<TmdbDetails>, AdminError> {
        self.tmdb
            .details(tmdb_id, kind)
            .await
            .map_err(|err| AdminError::tmdb_error(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie_payload() -> ContentPayload {
        ContentPayload {
            title: "Iron Man".to_string(),
            kind: ContentKind::Movie,
            genres: "Action, Sci-Fi, ".to_string(),
            screenshots: "https://a.example/1.png\n\n  \nhttps://a.example/2.png\n".to_string(),
            categories: vec!["English".to_string()],
            links: vec![
                QualityLinkInput {
                    quality: "720p".to_string(),
                    watch_url: Some("https://example.com/watch".to_string()),
                    download_url: None,
                },
                QualityLinkInput {
                    quality: "1080p".to_string(),
                    watch_url: Some("  ".to_string()),
                    download_url: None,
                },
                QualityLinkInput {
                    quality: "4K".to_string(),
                    watch_url: Some("https://example.com/4k".to_string()),
                    download_url: None,
                },
            ],
            ..ContentPayload::default()
        }
    }

    #[test]
    fn test_map_payload_rejects_blank_title() {
        let payload = ContentPayload {
            title: "   ".to_string(),
            ..movie_payload()
        };
        assert!(matches!(
            ContentAdminService::map_payload(&payload, "now"),
            Err(AdminError::EmptyTitle)
        ));
    }

    #[test]
    fn test_map_payload_defaults_poster() {
        let record = ContentAdminService::map_payload(&movie_payload(), "now").unwrap();
        assert_eq!(record.poster, PLACEHOLDER_POSTER);
        assert_eq!(record.view_count, 0);
        assert_eq!(record.created_at, record.updated_at);
    }

    #[test]
    fn test_genre_and_screenshot_parsing() {
        let record = ContentAdminService::map_payload(&movie_payload(), "now").unwrap();
        assert_eq!(record.genres, vec!["Action", "Sci-Fi"]);
        assert_eq!(
            record.screenshots,
            vec!["https://a.example/1.png", "https://a.example/2.png"]
        );
    }

    #[test]
    fn test_movie_links_drop_blank_and_unknown_tiers() {
        let record = ContentAdminService::map_payload(&movie_payload(), "now").unwrap();
        let ContentLinks::Movie { links } = record.links else {
            panic!("expected movie shape");
        };

        assert_eq!(links.len(), 1);
        assert_eq!(links[0].quality, "720p");
    }

    #[test]
    fn test_series_payload_populates_series_shape_only() {
        let payload = ContentPayload {
            title: "Dark".to_string(),
            kind: ContentKind::Series,
            episodes: vec![
                EpisodeInput {
                    season: Some(1),
                    episode_number: Some(1),
                    title: Some("Secrets".to_string()),
                    watch_link: Some("https://example.com/e1".to_string()),
                },
                EpisodeInput {
                    season: Some(1),
                    episode_number: None,
                    title: None,
                    watch_link: Some("https://example.com/e2".to_string()),
                },
                EpisodeInput {
                    season: Some(1),
                    episode_number: Some(3),
                    title: None,
                    watch_link: Some("   ".to_string()),
                },
            ],
            season_packs: vec![
                SeasonPackInput {
                    season_number: Some(1),
                    watch_link: Some("https://example.com/s1".to_string()),
                    download_link: None,
                },
                SeasonPackInput {
                    season_number: Some(1),
                    watch_link: None,
                    download_link: Some("https://example.com/s1-alt".to_string()),
                },
                SeasonPackInput {
                    season_number: None,
                    watch_link: Some("https://example.com/orphan".to_string()),
                    download_link: None,
                },
            ],
            // Movie links on a series submission must be ignored.
            links: vec![QualityLinkInput {
                quality: "720p".to_string(),
                watch_url: Some("https://example.com/stray".to_string()),
                download_url: None,
            }],
            categories: Vec::new(),
            ..ContentPayload::default()
        };

        let record = ContentAdminService::map_payload(&payload, "now").unwrap();
        let ContentLinks::Series {
            episodes,
            season_packs,
        } = record.links
        else {
            panic!("expected series shape");
        };

        assert_eq!(episodes.len(), 1);
        assert_eq!(episodes[0].episode_number, 1);
        assert_eq!(season_packs.len(), 1);
        assert_eq!(
            season_packs[0].watch_link.as_deref(),
            Some("https://example.com/s1")
        );
    }

    #[test]
    fn test_manual_links_skip_incomplete_pairs() {
        let links = build_manual_links(&[
            ManualLinkInput {
                name: Some("Mirror".to_string()),
                url: Some("https://example.com/m".to_string()),
            },
            ManualLinkInput {
                name: Some("Broken".to_string()),
                url: None,
            },
            ManualLinkInput {
                name: None,
                url: Some("https://example.com/anon".to_string()),
            },
        ]);

        assert_eq!(links.len(), 1);
        assert_eq!(links[0].name, "Mirror");
    }
}
