use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use sheetreport_core::SheetOptions;

use crate::app::{App, Focus};

const SELECTED_MARK: &str = "\u{25B8} ";
const UNSELECTED_MARK: &str = "  ";

/// The file selector. Row 0 is the "no file" sentinel; the marker shows
/// which row is the actual selection, the highlight shows the cursor.
pub fn render_files(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let focused = app.focus == Focus::Files;
    let catalog = app.workflow.catalog();
    let selected = app.workflow.selection().file_id();

    let title = if catalog.is_loading() {
        format!(" Files {} ", super::spinner_char(app.tick))
    } else if let Some(err) = catalog.last_error() {
        format!(" Files (error: {}) ", super::truncate(err, 24))
    } else if let Some(at) = app.files_refreshed_at {
        format!(" Files ({}) ", at.format("%H:%M:%S"))
    } else {
        " Files ".to_string()
    };

    let width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = catalog
        .options()
        .iter()
        .map(|option| {
            let mark = if option.file_id() == selected {
                SELECTED_MARK
            } else {
                UNSELECTED_MARK
            };
            let style = if option.file_id().is_none() {
                Style::default().fg(theme.dim)
            } else {
                Style::default().fg(theme.text)
            };
            ListItem::new(Line::from(vec![
                Span::styled(mark, Style::default().fg(theme.accent)),
                Span::styled(super::truncate(&option.label(), width.saturating_sub(2)), style),
            ]))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style(focused))
        .title(title);

    let mut list = List::new(items).block(block);
    if focused {
        list = list.highlight_style(theme.highlight_style());
    }
    let mut state = ListState::default().with_selected(Some(app.file_cursor));
    f.render_stateful_widget(list, area, &mut state);
}

/// The sheet selector, disabled until a file is chosen.
pub fn render_sheets(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let focused = app.focus == Focus::Sheets;
    let enabled = app.workflow.gate().sheet_selector_enabled;
    let options = app.workflow.sheets().options();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if enabled {
            theme.border_style(focused)
        } else {
            theme.disabled_style()
        })
        .title(" Sheets ");

    if let Some(placeholder) = options.placeholder() {
        let style = match options {
            SheetOptions::Failed(_) => Style::default().fg(theme.error),
            SheetOptions::NeedsFile => theme.disabled_style(),
            _ => Style::default().fg(theme.dim),
        };
        let mut lines = vec![Line::from(Span::styled(placeholder, style))];
        if matches!(options, SheetOptions::Loading) {
            lines[0].spans.insert(
                0,
                Span::styled(
                    format!("{} ", super::spinner_char(app.tick)),
                    Style::default().fg(theme.spinner),
                ),
            );
        }
        f.render_widget(Paragraph::new(lines).block(block), area);
        return;
    }

    let chosen = app.workflow.selection().sheet_name();
    let width = area.width.saturating_sub(6) as usize;
    let items: Vec<ListItem> = options
        .sheets()
        .iter()
        .map(|name| {
            let mark = if chosen == Some(name.as_str()) {
                SELECTED_MARK
            } else {
                UNSELECTED_MARK
            };
            ListItem::new(Line::from(vec![
                Span::styled(mark, Style::default().fg(theme.accent)),
                Span::styled(super::truncate(name, width), Style::default().fg(theme.text)),
            ]))
        })
        .collect();

    let mut list = List::new(items).block(block);
    if focused {
        list = list.highlight_style(theme.highlight_style());
    }
    let mut state = ListState::default().with_selected(Some(app.sheet_cursor));
    f.render_stateful_widget(list, area, &mut state);
}
