use ratatui::Frame;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use sheetreport_core::{Notice, NoticeLevel};

use crate::theme::Theme;

/// Modal for the oldest pending notice. `pending` counts it too.
pub fn render(f: &mut Frame, notice: &Notice, pending: usize, theme: &Theme) {
    let color = theme.notice_color(notice.level);
    let title = match notice.level {
        NoticeLevel::Error => " Error ",
        NoticeLevel::Info => " Notice ",
    };

    let width = (notice.message.chars().count() as u16 + 6).clamp(36, 70);
    let text_rows = notice.message.chars().count() as u16 / width.saturating_sub(4).max(1) + 1;
    let popup = super::centered_rect(width, text_rows + 5, f.area());

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            notice.message.as_str(),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    let mut footer = vec![
        Span::styled("Enter/Esc", Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::styled(": dismiss", Style::default().fg(theme.dim)),
    ];
    if pending > 1 {
        footer.push(Span::styled(
            format!("  (+{} more)", pending - 1),
            Style::default().fg(theme.dim),
        ));
    }
    lines.push(Line::from(footer));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(title),
        )
        .wrap(Wrap { trim: true });

    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}
