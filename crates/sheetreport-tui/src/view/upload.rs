use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{App, Focus};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let focused = app.focus == Focus::UploadPath;
    let field = &app.upload_path;

    let title = if app.workflow.upload_state().is_uploading() {
        format!(" Upload {} ", super::spinner_char(app.tick))
    } else {
        " Upload ".to_string()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style(focused))
        .title(title);
    let inner = block.inner(area);

    let line = if field.value().is_empty() && !field.is_editing() {
        Line::from(Span::styled(
            "path to a .xlsx or .xls file (Enter to edit)",
            Style::default().fg(theme.dim),
        ))
    } else {
        let shown = super::truncate(field.value(), inner.width as usize);
        let style = if focused {
            theme.highlight_style()
        } else {
            Style::default().fg(theme.text)
        };
        Line::from(Span::styled(shown, style))
    };

    f.render_widget(Paragraph::new(line).block(block), area);

    if focused && field.is_editing() {
        let x = inner.x + field.cursor_column() as u16;
        f.set_cursor_position(Position::new(x.min(inner.right().saturating_sub(1)), inner.y));
    }
}
