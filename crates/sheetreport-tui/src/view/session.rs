use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{App, Focus};
use crate::model::text_field::TextField;

const LABEL_WIDTH: u16 = 10;

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let focused = matches!(app.focus, Focus::Email | Focus::Password);

    let status = if app.workflow.session().is_busy() {
        Span::styled(
            format!("{} please wait", super::spinner_char(app.tick)),
            Style::default().fg(theme.spinner),
        )
    } else if app.workflow.is_authenticated() {
        Span::styled("logged in  (o: logout)", Style::default().fg(theme.ok))
    } else {
        Span::styled("not logged in  (l: login)", Style::default().fg(theme.dim))
    };

    let field_line = |label: &'static str, field: &TextField, shown: String, this: Focus| {
        let style = if app.focus == this {
            theme.highlight_style()
        } else {
            Style::default().fg(theme.text)
        };
        let value = if field.value().is_empty() && !field.is_editing() {
            Span::styled("\u{2014}", Style::default().fg(theme.dim))
        } else {
            Span::styled(shown, style)
        };
        Line::from(vec![
            Span::styled(
                format!("{label:<width$}", width = LABEL_WIDTH as usize),
                Style::default().fg(theme.dim),
            ),
            value,
        ])
    };

    let lines = vec![
        field_line("Email", &app.email, app.email.value().to_string(), Focus::Email),
        field_line("Password", &app.password, app.password.masked(), Focus::Password),
        Line::from(status),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style(focused))
        .title(" Session ");
    let inner = block.inner(area);
    f.render_widget(Paragraph::new(lines).block(block), area);

    // Terminal cursor for the field being edited.
    let editing = match app.focus {
        Focus::Email if app.email.is_editing() => Some((0, &app.email)),
        Focus::Password if app.password.is_editing() => Some((1, &app.password)),
        _ => None,
    };
    if let Some((row, field)) = editing {
        let x = inner.x + LABEL_WIDTH + field.cursor_column() as u16;
        f.set_cursor_position(Position::new(x.min(inner.right().saturating_sub(1)), inner.y + row));
    }
}
