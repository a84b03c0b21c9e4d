//! Pure projection from [`RiverState`] to a renderable view tree.
//!
//! Markup in feed titles, item titles and bodies is carried through verbatim.
//! The aggregator is treated as semi-trusted; nothing here escapes or strips
//! it. Terminal rendering flattens it to text separately.

use super::model::{Feed, Item};
use super::state::RiverState;
use super::when::parse_when;
use chrono::{DateTime, Local, TimeZone, Utc};
use serde::Serialize;
use std::fmt::Display;
use url::Url;

/// Host used for the favicon lookup when a feed's website has no host.
pub const DEFAULT_FAVICON_HOST: &str = "example.com";

const FAVICON_SERVICE: &str = "http://www.google.com/s2/favicons?domain=";

/// The whole river as it should appear on screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "feeds", rename_all = "snake_case")]
pub enum RiverView {
    /// Nothing to show yet.
    Loading,
    Feeds(Vec<FeedView>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedView {
    /// Render key: last-update stamp followed by the feed URL.
    pub key: String,
    /// Last update in the absolute short form.
    pub updated: String,
    pub favicon: String,
    pub title_html: String,
    pub website_url: String,
    pub feed_url: String,
    pub items: Vec<ItemView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemView {
    /// Render key, unique within the owning feed only.
    pub key: String,
    /// Item title, or the body when the title is missing.
    pub title_html: String,
    pub body_html: Option<String>,
    pub link: String,
    /// Publication time in the relative form.
    pub when_ago: String,
    pub comments: Option<String>,
}

impl RiverView {
    pub fn is_loading(&self) -> bool {
        matches!(self, RiverView::Loading)
    }
}

/// Project the state for display in the viewer's local zone.
pub fn project(state: &RiverState, now: DateTime<Utc>) -> RiverView {
    project_in(state, now, &Local)
}

/// Project the state, formatting absolute times in `tz`.
pub fn project_in<Tz>(state: &RiverState, now: DateTime<Utc>, tz: &Tz) -> RiverView
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let feeds = state.feeds();
    if feeds.is_empty() {
        return RiverView::Loading;
    }
    RiverView::Feeds(feeds.iter().map(|feed| feed_view(feed, now, tz)).collect())
}

fn feed_view<Tz>(feed: &Feed, now: DateTime<Utc>, tz: &Tz) -> FeedView
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    FeedView {
        key: format!("{}{}", feed.when_last_update, feed.feed_url),
        updated: parse_when(&feed.when_last_update).short_in(tz),
        favicon: favicon_url(&feed.website_url),
        title_html: feed.feed_title.clone(),
        website_url: feed.website_url.clone(),
        feed_url: feed.feed_url.clone(),
        items: feed.item.iter().map(|item| item_view(item, now)).collect(),
    }
}

fn item_view(item: &Item, now: DateTime<Utc>) -> ItemView {
    ItemView {
        key: item.id.clone(),
        title_html: item.headline().to_string(),
        body_html: item.body.clone(),
        link: item.target().to_string(),
        when_ago: parse_when(&item.pub_date).ago(now),
        comments: item.comments.clone(),
    }
}

/// Favicon service URL for a website, keyed on its host.
pub fn favicon_url(website_url: &str) -> String {
    let host = Url::parse(website_url.trim())
        .ok()
        .and_then(|url| url.host_str().map(str::to_owned))
        .filter(|host| !host.is_empty())
        .unwrap_or_else(|| DEFAULT_FAVICON_HOST.to_string());
    format!("{}{}", FAVICON_SERVICE, host)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::river::model::{Metadata, RiverPayload, UpdatedFeeds};
    use pretty_assertions::assert_eq;

    fn state_with(feeds: Vec<Feed>) -> RiverState {
        let mut state = RiverState::new("src");
        let tag = state.begin_fetch();
        state.apply(
            &tag,
            Ok(RiverPayload {
                updated_feeds: UpdatedFeeds {
                    updated_feed: feeds,
                },
                metadata: Some(Metadata::default()),
            }),
        );
        state
    }

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2006-01-02T15:09:05Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn item(id: &str, title: Option<&str>, body: Option<&str>) -> Item {
        Item {
            id: id.to_string(),
            title: title.map(String::from),
            body: body.map(String::from),
            link: format!("https://example.com/{}", id),
            pub_date: "Mon, 02 Jan 2006 15:04:05 GMT".to_string(),
            ..Default::default()
        }
    }

    fn feed(title: &str, website: &str, items: Vec<Item>) -> Feed {
        Feed {
            feed_title: title.to_string(),
            feed_url: format!("{}/rss", website),
            website_url: website.to_string(),
            when_last_update: "Mon, 02 Jan 2006 15:04:05 GMT".to_string(),
            item: items,
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_feeds_render_loading() {
        let state = state_with(vec![]);
        assert_eq!(project_in(&state, now(), &Utc), RiverView::Loading);
        assert!(project_in(&RiverState::new("x"), now(), &Utc).is_loading());
    }

    #[test]
    fn test_feed_header_fields() {
        let state = state_with(vec![feed(
            "<b>Blog</b>",
            "https://blog.example.org",
            vec![item("1", Some("Hi"), None)],
        )]);

        let RiverView::Feeds(feeds) = project_in(&state, now(), &Utc) else {
            panic!("expected feeds");
        };
        assert_eq!(feeds.len(), 1);
        let header = &feeds[0];
        assert_eq!(
            header.key,
            "Mon, 02 Jan 2006 15:04:05 GMThttps://blog.example.org/rss"
        );
        assert_eq!(header.updated, "3:04 PM; 02 Jan");
        assert_eq!(
            header.favicon,
            "http://www.google.com/s2/favicons?domain=blog.example.org"
        );
        assert_eq!(header.title_html, "<b>Blog</b>");
        assert_eq!(header.items[0].when_ago, "5 minutes ago");
    }

    #[test]
    fn test_item_title_falls_back_to_body_and_comments_optional() {
        let mut with_comments = item("2", Some("Titled"), Some("<p>Body</p>"));
        with_comments.comments = Some("https://news.example/c/2".into());
        let state = state_with(vec![feed(
            "f",
            "https://f.example",
            vec![item("1", None, Some("<p>Only body</p>")), with_comments],
        )]);

        let RiverView::Feeds(feeds) = project_in(&state, now(), &Utc) else {
            panic!("expected feeds");
        };
        let items = &feeds[0].items;
        assert_eq!(items[0].title_html, "<p>Only body</p>");
        assert_eq!(items[0].comments, None);
        assert_eq!(items[1].title_html, "Titled");
        assert_eq!(items[1].body_html.as_deref(), Some("<p>Body</p>"));
        assert_eq!(items[1].comments.as_deref(), Some("https://news.example/c/2"));
    }

    #[test]
    fn test_item_ids_are_scoped_per_feed() {
        let state = state_with(vec![
            feed("a", "https://a.example", vec![item("1", Some("A1"), None)]),
            feed("b", "https://b.example", vec![item("1", Some("B1"), None)]),
        ]);

        let RiverView::Feeds(feeds) = project_in(&state, now(), &Utc) else {
            panic!("expected feeds");
        };
        assert_eq!(feeds.len(), 2);
        assert_eq!(feeds[0].items.len(), 1);
        assert_eq!(feeds[1].items.len(), 1);
        assert_eq!(feeds[0].items[0].key, feeds[1].items[0].key);
        assert_eq!(feeds[0].items[0].title_html, "A1");
        assert_eq!(feeds[1].items[0].title_html, "B1");
        assert_ne!(feeds[0].key, feeds[1].key);
    }

    #[test]
    fn test_feed_order_is_preserved() {
        let state = state_with(vec![
            feed("z", "https://z.example", vec![]),
            feed("a", "https://a.example", vec![]),
            feed("m", "https://m.example", vec![]),
        ]);
        let RiverView::Feeds(feeds) = project_in(&state, now(), &Utc) else {
            panic!("expected feeds");
        };
        let titles: Vec<_> = feeds.iter().map(|f| f.title_html.as_str()).collect();
        assert_eq!(titles, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_unparseable_dates_show_raw_text() {
        let mut odd = item("1", Some("x"), None);
        odd.pub_date = "sometime".into();
        let mut f = feed("f", "https://f.example", vec![odd]);
        f.when_last_update = "2006-13-45".into();
        let state = state_with(vec![f]);

        let RiverView::Feeds(feeds) = project_in(&state, now(), &Utc) else {
            panic!("expected feeds");
        };
        assert_eq!(feeds[0].updated, "2006-13-45");
        assert_eq!(feeds[0].items[0].when_ago, "sometime");
    }

    #[test]
    fn test_favicon_default_host() {
        let expected = format!("{}{}", FAVICON_SERVICE, DEFAULT_FAVICON_HOST);
        assert_eq!(favicon_url(""), expected);
        assert_eq!(favicon_url("not a url"), expected);
        assert_eq!(favicon_url("/relative/path"), expected);
        assert_eq!(favicon_url("mailto:someone@example.net"), expected);
    }

    #[test]
    fn test_favicon_uses_host_only() {
        assert_eq!(
            favicon_url("https://www.example.net:8443/blog?x=1"),
            "http://www.google.com/s2/favicons?domain=www.example.net"
        );
    }

    #[test]
    fn test_projection_does_not_mutate_state() {
        let state = state_with(vec![feed("a", "https://a.example", vec![])]);
        let before = state.feeds().clone();
        let _ = project_in(&state, now(), &Utc);
        let _ = project_in(&state, now(), &Utc);
        assert!(std::sync::Arc::ptr_eq(&before, state.feeds()));
    }

    #[test]
    fn test_view_serializes_with_kind_tag() {
        let json = serde_json::to_value(RiverView::Loading).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "loading"}));
    }
}
