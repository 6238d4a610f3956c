use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use crate::app::App;

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let report = app.workflow.report();

    let mut title = " Report ".to_string();
    if let Some(source) = report.source() {
        let file = app
            .workflow
            .catalog()
            .get(&source.file_id)
            .map(|d| d.display_name())
            .unwrap_or_else(|| source.file_id.to_string());
        title = format!(" Report: {file} / {} ", source.sheet_name);
    }
    if report.is_generating() {
        title.push_str(&format!("{} ", super::spinner_char(app.tick)));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style(false))
        .title(title);

    if report.placeholder_visible() {
        let hint = if app.workflow.gate().generate_enabled {
            "no report yet, press r to generate"
        } else {
            "no report yet"
        };
        let paragraph = Paragraph::new(Line::from(Span::styled(
            hint,
            Style::default().fg(theme.dim),
        )))
        .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("Label"),
        Cell::from(Text::from("Amount").right_aligned()),
    ])
    .style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = report
        .rows()
        .iter()
        .map(|row| {
            Row::new(vec![
                Cell::from(row.label.clone()),
                Cell::from(Text::from(row.formatted_amount()).right_aligned()),
            ])
            .style(Style::default().fg(theme.text))
        })
        .collect();

    let table = Table::new(rows, [Constraint::Min(12), Constraint::Length(18)])
        .header(header)
        .block(block)
        .column_spacing(2);
    f.render_widget(table, area);
}
