use url::Url;

use crate::domain::errors::CatalogError;

pub const YOUTUBE_FEED_BASE: &str = "https://www.youtube.com/xml/feeds/videos.xml";

/// Identity hints pulled out of a user-supplied channel URL.
///
/// Either, both, or neither may be present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelUrl {
    pub handle: Option<String>,
    pub channel_id: Option<String>,
}

pub fn parse_channel_url(raw: &str) -> Result<ChannelUrl, CatalogError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::Validation("platform URL is empty".to_string()));
    }

    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let url = Url::parse(&with_scheme)
        .map_err(|err| CatalogError::Validation(format!("invalid platform URL: {err}")))?;
    if url.host_str().is_none() {
        return Err(CatalogError::Validation(
            "invalid platform URL: missing host".to_string(),
        ));
    }

    let segments: Vec<&str> = url
        .path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();

    let handle = segments
        .iter()
        .find(|segment| segment.starts_with('@') && segment.len() > 1)
        .map(|segment| segment.to_string());

    let from_path = segments
        .windows(2)
        .find(|pair| pair[0] == "channel")
        .map(|pair| pair[1].to_string());

    let channel_id = from_path.or_else(|| {
        url.query_pairs()
            .find(|(key, value)| key == "channel_id" && !value.trim().is_empty())
            .map(|(_, value)| value.trim().to_string())
    });

    Ok(ChannelUrl { handle, channel_id })
}

/// WebSub topic for a channel's upload feed.
pub fn topic_url(channel_id: &str) -> String {
    format!("{}?channel_id={}", YOUTUBE_FEED_BASE, channel_id)
}
