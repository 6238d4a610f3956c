use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{App, InputMode};

/// One-line bar across the top: name, server, session and activity.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let header = theme.header_style();

    let session = if app.workflow.is_authenticated() {
        format!("\u{25CF} {}", app.email.value())
    } else {
        "\u{25CB} not logged in".to_string()
    };

    let mut spans = vec![
        Span::styled(" sheetreport ", header),
        Span::styled(format!(" {} ", app.server_url), Style::default().fg(theme.dim)),
        Span::styled(format!(" {session} "), Style::default().fg(theme.text)),
    ];
    if app.is_busy() {
        spans.push(Span::styled(
            format!(" {} working", super::spinner_char(app.tick)),
            Style::default().fg(theme.spinner),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Key hints for the current mode. Hints for disabled actions are dimmed.
pub fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let key = Style::default().fg(theme.text).add_modifier(Modifier::BOLD);
    let desc = theme.footer_style();
    let off = theme.disabled_style();

    let hint = |k: &'static str, d: &'static str, enabled: bool| -> [Span<'static>; 2] {
        if enabled {
            [Span::styled(k, key), Span::styled(d, desc)]
        } else {
            [Span::styled(k, off), Span::styled(d, off)]
        }
    };

    let line = if app.input_mode == InputMode::TextInput {
        Line::from(
            [
                hint(" Enter", ": save  ", true),
                hint("Esc", ": cancel  ", true),
                hint("Tab", ": save and next", true),
            ]
            .concat(),
        )
    } else {
        let authed = app.workflow.is_authenticated();
        let gate = app.workflow.gate();
        Line::from(
            [
                hint(" Tab", ": focus  ", true),
                hint("Enter", ": edit/select  ", true),
                hint("l", ": login  ", !authed),
                hint("o", ": logout  ", authed),
                hint("r", ": report  ", gate.generate_enabled),
                hint("u", ": upload  ", app.workflow.chosen_upload().is_some()),
                hint("F5", ": refresh  ", true),
                hint("?", ": help  ", true),
                hint("q", ": quit", true),
            ]
            .concat(),
        )
    };

    f.render_widget(
        Paragraph::new(line)
            .style(theme.footer_style())
            .alignment(Alignment::Left),
        area,
    );
}
