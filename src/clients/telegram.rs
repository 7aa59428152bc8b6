use anyhow::Result;
use reqwest::Client;
use serde::Deserialize;
use tracing::info;

use crate::config::TelegramConfig;
use crate::constants::timeouts;
use crate::models::content::Content;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    New,
    Update,
}

/// Whether a notification actually went out. Skipped is the normal outcome
/// when the channel is not configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyOutcome {
    Sent,
    Skipped,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    ok: bool,
    description: Option<String>,
}

fn clean_host(site_url: &str) -> String {
    site_url
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_start_matches("www.")
        .trim_end_matches('/')
        .to_string()
}

fn build_caption(content: &Content, kind: NotificationKind, site_url: &str) -> String {
    let quality_str = content.links.quality_labels().join(", ");
    let language_str = content.language.as_deref().unwrap_or("N/A");
    let genres_str = if content.genres.is_empty() {
        "N/A".to_string()
    } else {
        content.genres.join(", ")
    };

    let mut caption = match kind {
        NotificationKind::Update => format!("🔄 **UPDATED : {}**\n", content.title),
        NotificationKind::New => format!("🔥 **NEW ADDED : {}**\n", content.title),
    };

    // A language line with digits in it is usually a resolution typo; skip it.
    if language_str != "N/A" && !language_str.chars().any(|c| c.is_ascii_digit()) {
        caption.push_str(&format!("**{}**\n", language_str.to_uppercase()));
    }

    caption.push_str(&format!("\n🎞️ Quality: **{quality_str}**"));
    caption.push_str(&format!("\n🌐 Language: **{language_str}**"));
    caption.push_str(&format!("\n🎭 Genres: **{genres_str}**"));
    caption.push_str(&format!("\n\n🔗 Visit : **{}**", clean_host(site_url)));
    caption.push_str("\n⚠️ **অবশ্যই লিংকগুলো ক্রোম ব্রাউজারে ওপেন করবেন!!**");

    caption
}

/// Posts photo-with-caption messages to a Telegram channel on content
/// changes. Errors are returned to the caller, which decides whether to
/// swallow them; the content write itself is never affected.
#[derive(Clone)]
pub struct TelegramNotifier {
    client: Client,
    config: TelegramConfig,
}

impl TelegramNotifier {
    pub fn new(config: TelegramConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeouts::TELEGRAM_REQUEST)
            .user_agent("Cinedex/1.0")
            .build()?;

        Ok(Self { client, config })
    }

    pub async fn notify(
        &self,
        content: &Content,
        id: i32,
        kind: NotificationKind,
    ) -> Result<NotifyOutcome> {
        let (Some(bot_token), Some(channel_id), Some(site_url)) = (
            self.config.bot_token.as_deref(),
            self.config.channel_id.as_deref(),
            self.config.site_url.as_deref(),
        ) else {
            info!("Telegram channel not configured, skipping notification");
            return Ok(NotifyOutcome::Skipped);
        };

        let content_url = format!("{}/movie/{}", site_url.trim_end_matches('/'), id);
        let caption = build_caption(content, kind, site_url);

        let keyboard = serde_json::json!({
            "inline_keyboard": [[{ "text": "📥👇 Download Now 👇📥", "url": content_url }]]
        });

        let api_url = format!(
            "{}/bot{}/sendPhoto",
            self.config.api_base_url.trim_end_matches('/'),
            bot_token
        );

        let params = [
            ("chat_id", channel_id.to_string()),
            ("photo", content.poster.clone()),
            ("caption", caption),
            ("parse_mode", "Markdown".to_string()),
            ("reply_markup", keyboard.to_string()),
        ];

        let response = self.client.post(&api_url).form(&params).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Telegram API error: {} - {}", status, body));
        }

        let body: SendResponse = response.json().await?;
        if !body.ok {
            return Err(anyhow::anyhow!(
                "Telegram API rejected message: {}",
                body.description.unwrap_or_default()
            ));
        }

        info!("Telegram notification sent for '{}'", content.title);
        Ok(NotifyOutcome::Sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::content::{ContentLinks, QualityLink};

    fn sample_content(language: Option<&str>) -> Content {
        Content {
            id: 7,
            title: "Iron Man".to_string(),
            poster: "https://example.com/p.jpg".to_string(),
            backdrop: None,
            overview: String::new(),
            screenshots: Vec::new(),
            language: language.map(str::to_string),
            genres: vec!["Action".to_string(), "Sci-Fi".to_string()],
            categories: Vec::new(),
            links: ContentLinks::Movie {
                links: vec![QualityLink {
                    quality: "1080p".to_string(),
                    watch_url: Some("https://example.com/watch".to_string()),
                    download_url: None,
                }],
            },
            manual_links: Vec::new(),
            view_count: 0,
            is_completed: false,
            tmdb_id: None,
            release_date: None,
            rating: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_caption_new_content() {
        let caption = build_caption(
            &sample_content(Some("English")),
            NotificationKind::New,
            "https://www.example.com/",
        );

        assert!(caption.starts_with("🔥 **NEW ADDED : Iron Man**"));
        assert!(caption.contains("**ENGLISH**"));
        assert!(caption.contains("Quality: **1080p**"));
        assert!(caption.contains("Genres: **Action, Sci-Fi**"));
        assert!(caption.contains("Visit : **example.com**"));
    }

    #[test]
    fn test_caption_update_header_and_digit_language() {
        let caption = build_caption(
            &sample_content(Some("Hindi 720p")),
            NotificationKind::Update,
            "https://example.com",
        );

        assert!(caption.starts_with("🔄 **UPDATED : Iron Man**"));
        assert!(!caption.contains("**HINDI 720P**"));
        assert!(caption.contains("Language: **Hindi 720p**"));
    }

    #[test]
    fn test_caption_missing_language_shows_placeholder() {
        let caption = build_caption(&sample_content(None), NotificationKind::New, "https://x.org");
        assert!(caption.contains("Language: **N/A**"));
    }

    #[tokio::test]
    async fn test_notify_skips_when_unconfigured() {
        let notifier = TelegramNotifier::new(TelegramConfig {
            api_base_url: TelegramConfig::DEFAULT_API_BASE_URL.to_string(),
            ..TelegramConfig::default()
        })
        .unwrap();

        let outcome = notifier
            .notify(&sample_content(None), 1, NotificationKind::New)
            .await
            .unwrap();
        assert_eq!(outcome, NotifyOutcome::Skipped);
    }
}
