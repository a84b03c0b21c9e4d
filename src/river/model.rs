//! Wire types for the aggregated river document.
//!
//! The aggregator serializes empty slices as `null` and may emit numeric item
//! ids, so decoding is lenient about both. Every type here is rebuilt wholesale
//! on each successful fetch; nothing is mutated in place.

use serde::{Deserialize, Deserializer, Serialize};

/// Root document returned by the aggregation service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiverPayload {
    pub updated_feeds: UpdatedFeeds,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

/// Wrapper object around the feed list (`{"updatedFeed": [...]}`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedFeeds {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub updated_feed: Vec<Feed>,
}

/// Optional river-level metadata.
///
/// Aggregators attach many bookkeeping keys (`ctBuilds`, `whenGMT`, ...);
/// only the descriptive ones are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub description: Option<String>,
}

/// One polled source's aggregated state at fetch time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feed {
    /// May contain markup.
    #[serde(default)]
    pub feed_title: String,
    #[serde(default)]
    pub feed_url: String,
    #[serde(default)]
    pub website_url: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub feed_description: Option<String>,
    /// Raw timestamp, normalized at display time.
    #[serde(default)]
    pub when_last_update: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub item: Vec<Item>,
}

/// One entry within a feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Render key; unique within the owning feed only.
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub body: Option<String>,
    #[serde(default)]
    pub link: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub perma_link: Option<String>,
    #[serde(default)]
    pub pub_date: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub comments: Option<String>,
}

impl Item {
    /// Title, falling back to the body when the item has none.
    pub fn headline(&self) -> &str {
        self.title
            .as_deref()
            .or(self.body.as_deref())
            .unwrap_or_default()
    }

    /// Link target, falling back to the permalink.
    pub fn target(&self) -> &str {
        if self.link.is_empty() {
            self.perma_link.as_deref().unwrap_or_default()
        } else {
            &self.link
        }
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Option::<Id>::deserialize(deserializer)? {
        Some(Id::Text(s)) => s,
        Some(Id::Int(n)) => n.to_string(),
        Some(Id::Float(n)) => n.to_string(),
        None => String::new(),
    })
}
