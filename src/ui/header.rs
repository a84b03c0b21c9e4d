use crate::app::App;
use crate::util::markup_to_text;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// River title and description, or the mount label before metadata arrives.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let state = app.poller.state();
    let title = state
        .title()
        .map(markup_to_text)
        .unwrap_or_else(|| app.mount.clone());

    let mut spans = vec![Span::styled(
        title,
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if let Some(description) = state.description().map(markup_to_text) {
        spans.push(Span::styled(
            format!("  {}", description),
            Style::default().fg(Color::DarkGray),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
