use crate::app::App;
use crate::river::Phase;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};
use std::borrow::Cow;

const HINTS_SINGLE: &str = "[j/k]scroll [Ctrl+d/u]page [g/G]top/bottom [q]uit";
const HINTS_MULTI: &str =
    "[j/k]scroll [Ctrl+d/u]page [g/G]top/bottom [Tab]next source [1-9]pick [q]uit";

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let text: Cow<'_, str> = if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(msg.as_ref())
    } else if app.scroll_offset > 0 {
        // Refreshes are held back until the reader returns to the top
        Cow::Borrowed("Paused while scrolled, [g] to resume | [q]uit")
    } else if app.has_source_menu() {
        Cow::Borrowed(HINTS_MULTI)
    } else {
        Cow::Borrowed(HINTS_SINGLE)
    };

    let text = match app.poller.state().phase() {
        Phase::Fetching => Cow::Owned(format!("⟳ {}", text)),
        Phase::Idle | Phase::Populated => text,
    };

    let style = Style::default().bg(Color::DarkGray).fg(Color::White);
    f.render_widget(Paragraph::new(text).style(style), area);
}
