//! River panel: the projected view tree as scrollable terminal lines.

use crate::app::App;
use crate::river::{project, FeedView, ItemView, RiverView};
use crate::util::markup_to_text;
use chrono::Utc;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Placeholder shown until the first successful fetch for a source.
pub(super) const LOADING_TEXT: &str = "Loading…";

pub fn render(f: &mut Frame, app: &mut App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let view = project(app.poller.state(), Utc::now());
    let lines = river_lines(&view);

    // Borders take one cell on each side
    app.river_viewport_width = area.width.saturating_sub(2) as usize;
    app.river_visible_lines = area.height.saturating_sub(2) as usize;
    app.river_line_count = wrapped_line_count(&lines, app.river_viewport_width);

    // Clamp before drawing so a shrinking river never renders past its end
    app.clamp_river_scroll();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", app.mount));

    let mut paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.scroll_offset as u16, 0));
    if view.is_loading() {
        paragraph = paragraph.alignment(Alignment::Center);
    }
    f.render_widget(paragraph, area);
}

/// Flatten a view tree into display lines.
pub(super) fn river_lines(view: &RiverView) -> Vec<Line<'static>> {
    let feeds = match view {
        RiverView::Loading => {
            return vec![Line::from(Span::styled(
                LOADING_TEXT,
                Style::default().fg(Color::DarkGray),
            ))];
        }
        RiverView::Feeds(feeds) => feeds,
    };

    let item_count: usize = feeds.iter().map(|feed| feed.items.len()).sum();
    let mut lines = Vec::with_capacity(feeds.len() * 3 + item_count * 2);
    for (idx, feed) in feeds.iter().enumerate() {
        if idx > 0 {
            lines.push(Line::from(""));
        }
        push_feed(&mut lines, feed);
    }
    lines
}

fn push_feed(lines: &mut Vec<Line<'static>>, feed: &FeedView) {
    let dim = Style::default().fg(Color::DarkGray);

    let mut title = markup_to_text(&feed.title_html);
    if title.is_empty() {
        title = feed.website_url.clone();
    }
    lines.push(Line::from(vec![
        Span::styled(
            title,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  {}", feed.updated), dim),
    ]));
    let mut links = Vec::with_capacity(2);
    if !feed.website_url.is_empty() {
        links.push(Span::styled(feed.website_url.clone(), dim));
    }
    if !feed.feed_url.is_empty() {
        let sep = if links.is_empty() { "" } else { " · " };
        links.push(Span::styled(format!("{}feed {}", sep, feed.feed_url), dim));
    }
    if !links.is_empty() {
        lines.push(Line::from(links));
    }

    for item in &feed.items {
        push_item(lines, item);
    }
}

fn push_item(lines: &mut Vec<Line<'static>>, item: &ItemView) {
    let dim = Style::default().fg(Color::DarkGray);

    let headline = markup_to_text(&item.title_html);
    lines.push(Line::from(vec![
        Span::raw("  • "),
        Span::styled(headline.clone(), Style::default().add_modifier(Modifier::BOLD)),
    ]));

    // The body is only repeated when it is not already the headline
    if let Some(body) = item.body_html.as_deref() {
        let body = markup_to_text(body);
        if !body.is_empty() && body != headline {
            lines.push(Line::from(format!("    {}", body)));
        }
    }

    let mut meta = vec![Span::styled(format!("    {}", item.when_ago), dim)];
    if !item.link.is_empty() {
        meta.push(Span::styled(format!(" · {}", item.link), dim));
    }
    if let Some(comments) = &item.comments {
        meta.push(Span::styled(
            format!(" · comments {}", comments),
            Style::default().fg(Color::Yellow),
        ));
    }
    lines.push(Line::from(meta));
}

/// Display lines occupied by `lines` when word-wrapped at `width` columns,
/// counted with the same wrapper the river paragraph renders with.
pub(super) fn wrapped_line_count(lines: &[Line<'static>], width: usize) -> usize {
    let width = width.clamp(1, u16::MAX as usize) as u16;
    Paragraph::new(lines.to_vec())
        .wrap(Wrap { trim: false })
        .line_count(width)
}
