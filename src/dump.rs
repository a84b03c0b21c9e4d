//! One-shot mode: fetch a river once and emit its projected view as JSON.

use crate::river::{fetch_river, project_in, FetchError, RiverState, RiverView};
use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use std::fmt::Display;

/// Everything a render of the river would show.
#[derive(Debug, Serialize)]
pub struct RiverDump {
    pub source: String,
    /// Window title derived from the river metadata.
    pub title: String,
    pub view: RiverView,
}

/// Fetch `source` once and project it with absolute times in `tz`.
pub async fn dump_river<Tz>(
    client: &reqwest::Client,
    source: &str,
    now: DateTime<Utc>,
    tz: &Tz,
) -> Result<RiverDump, FetchError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let payload = fetch_river(client, source).await?;

    let mut state = RiverState::new(source);
    let tag = state.begin_fetch();
    state.apply(&tag, Ok(payload));

    Ok(RiverDump {
        source: source.to_string(),
        title: state.document_title(),
        view: project_in(&state, now, tz),
    })
}
