//! Render dispatch for the TUI.

use crate::app::App;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    widgets::Paragraph,
    Frame,
};

use super::{header, river, sources, status};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 40;
pub(super) const MIN_HEIGHT: u16 = 8;

/// Draw one frame.
///
/// Rows from top: header, source menu (multi-source only), river panel,
/// status bar.
pub(super) fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();

    // Guard against zero-width/height to prevent panics
    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    let menu_height = if app.has_source_menu() { 1 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(menu_height),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    header::render(f, app, chunks[0]);
    if menu_height > 0 {
        sources::render(f, app, chunks[1]);
    }
    river::render(f, app, chunks[2]);
    status::render(f, app, chunks[3]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppEvent;
    use crate::config::Config;
    use ratatui::{backend::TestBackend, Terminal};
    use tokio::sync::mpsc;

    fn app_with(sources: &[&str]) -> (App, mpsc::Receiver<AppEvent>) {
        let config = Config {
            sources: sources.iter().map(|s| s.to_string()).collect(),
            mount: "tech".into(),
            ..Config::default()
        };
        let (tx, rx) = mpsc::channel(8);
        (App::with_client(&config, reqwest::Client::new(), tx), rx)
    }

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer
            .content
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[tokio::test]
    async fn test_render_loading_river() {
        let (mut app, _rx) = app_with(&["http://127.0.0.1:9/a"]);
        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        terminal.draw(|f| render(f, &mut app)).unwrap();

        let text = screen(&terminal);
        assert!(text.contains("tech"));
        assert!(text.contains("Loading"));
        assert!(text.contains("[q]uit"));
        assert_eq!(app.river_visible_lines, 12 - 1 - 1 - 2);
        assert_eq!(app.river_viewport_width, 58);
    }

    #[tokio::test]
    async fn test_render_source_menu_only_for_many_sources() {
        let (mut app, _rx) = app_with(&["http://one.example/r", "http://two.example/r"]);
        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        terminal.draw(|f| render(f, &mut app)).unwrap();
        let text = screen(&terminal);
        assert!(text.contains("1 one.example/r"));
        assert!(text.contains("2 two.example/r"));

        let (mut app, _rx) = app_with(&["http://one.example/r"]);
        terminal.draw(|f| render(f, &mut app)).unwrap();
        assert!(!screen(&terminal).contains("1 one.example/r"));
    }

    #[tokio::test]
    async fn test_render_too_small() {
        let (mut app, _rx) = app_with(&["http://127.0.0.1:9/a"]);
        let mut terminal = Terminal::new(TestBackend::new(30, 6)).unwrap();
        terminal.draw(|f| render(f, &mut app)).unwrap();
        assert!(screen(&terminal).contains("Terminal too small"));
    }
}
