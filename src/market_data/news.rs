// =============================================================================
// News Items
// =============================================================================

use serde::{Deserialize, Serialize};
use tracing::debug;

/// A headline from the news feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub publisher: String,
    pub link: String,
}

/// Headline as delivered by the feed; every field optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawNewsItem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

/// Drop items without a title or link.  A missing publisher is kept as an
/// empty string.
pub fn sanitize_news(raw: &[RawNewsItem]) -> Vec<NewsItem> {
    raw.iter()
        .filter_map(|item| {
            let title = item.title.as_deref().map(str::trim).unwrap_or_default();
            let link = item.link.as_deref().map(str::trim).unwrap_or_default();
            if title.is_empty() || link.is_empty() {
                debug!(?item, "dropping news item without title or link");
                return None;
            }
            Some(NewsItem {
                title: title.to_string(),
                publisher: item.publisher.clone().unwrap_or_default(),
                link: link.to_string(),
            })
        })
        .collect()
}
