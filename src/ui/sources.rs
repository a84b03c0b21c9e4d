//! Source menu, shown only when more than one river is configured.

use crate::app::App;
use crate::util::truncate_to_width;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::Tabs,
    Frame,
};
use url::Url;

/// Widest a single tab label may get.
const MAX_LABEL_WIDTH: usize = 32;

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let titles: Vec<Line<'static>> = app
        .sources
        .iter()
        .enumerate()
        .map(|(idx, source)| {
            let label = source_label(source);
            let label = truncate_to_width(&label, MAX_LABEL_WIDTH);
            if idx < 9 {
                Line::from(format!("{} {}", idx + 1, label))
            } else {
                Line::from(label.into_owned())
            }
        })
        .collect();

    let tabs = Tabs::new(titles)
        .select(app.active_source)
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .divider("|");
    f.render_widget(tabs, area);
}

/// Short label for a source: host plus path, without scheme or query.
pub(super) fn source_label(source: &str) -> String {
    match Url::parse(source) {
        Ok(url) => {
            let host = url.host_str().unwrap_or_default();
            let path = url.path().trim_end_matches('/');
            format!("{}{}", host, path)
        }
        Err(_) => source.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_label() {
        assert_eq!(
            source_label("https://rivers.example.com/tech/river.js?cb=x"),
            "rivers.example.com/tech/river.js"
        );
        assert_eq!(source_label("http://localhost:1337/"), "localhost");
        assert_eq!(source_label("not a url"), "not a url");
    }
}
