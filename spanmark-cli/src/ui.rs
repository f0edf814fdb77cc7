//! Terminal UI rendering

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use spanmark_core::{Highlight, LabelDef, Mode, Palette, Screen, Segment, SessionKind};

// Catppuccin Mocha colors
const BASE: Color = Color::Rgb(30, 30, 46);
const SURFACE0: Color = Color::Rgb(49, 50, 68);
const TEXT: Color = Color::Rgb(205, 214, 244);
const SUBTEXT0: Color = Color::Rgb(166, 173, 200);
const RED: Color = Color::Rgb(243, 139, 168);
const PEACH: Color = Color::Rgb(250, 179, 135);
const YELLOW: Color = Color::Rgb(249, 226, 175);
const GREEN: Color = Color::Rgb(166, 227, 161);
const TEAL: Color = Color::Rgb(148, 226, 213);
const BLUE: Color = Color::Rgb(137, 180, 250);
const MAUVE: Color = Color::Rgb(203, 166, 247);

pub fn draw(frame: &mut Frame, screen: &Screen) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Min(0),    // Text
            Constraint::Length(4), // Prompt
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_title_bar(frame, screen, chunks[0]);
    draw_text(frame, screen, chunks[1]);
    draw_prompt(frame, screen, chunks[2]);
    draw_status_bar(frame, screen, chunks[3]);

    if screen.help {
        draw_help(frame);
    }
}

fn draw_title_bar(frame: &mut Frame, screen: &Screen, area: Rect) {
    let title_text = match screen.kind {
        SessionKind::Annotate => format!(
            " spanmark - annotate [{}/{}] {} spans",
            screen.progress.index, screen.progress.total, screen.span_count
        ),
        SessionKind::Flag => format!(
            " spanmark - flag [{}/{}]",
            screen.progress.index, screen.progress.total
        ),
    };

    let title_bar = Paragraph::new(title_text).style(Style::default().fg(TEXT).bg(SURFACE0));
    frame.render_widget(title_bar, area);
}

fn draw_text(frame: &mut Frame, screen: &Screen, area: Rect) {
    let mode_indicator = match screen.mode {
        Mode::Editing => " [EDITING]",
        Mode::Browsing => "",
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(BLUE))
        .title(format!("Text{}", mode_indicator));

    let paragraph = Paragraph::new(text_lines(&screen.segments, screen.labels))
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}

/// Split styled segments into display lines at embedded newlines
fn text_lines(segments: &[Segment], labels: &[LabelDef]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();

    for segment in segments {
        let style = segment_style(&segment.highlight, labels);
        let mut parts = segment.text.split('\n');
        if let Some(first) = parts.next() {
            if !first.is_empty() {
                current.push(Span::styled(first.to_string(), style));
            }
        }
        for part in parts {
            lines.push(Line::from(std::mem::take(&mut current)));
            if !part.is_empty() {
                current.push(Span::styled(part.to_string(), style));
            }
        }
    }
    lines.push(Line::from(current));
    lines
}

fn segment_style(highlight: &Highlight, labels: &[LabelDef]) -> Style {
    match highlight {
        Highlight::Plain => Style::default().fg(TEXT),
        Highlight::Current => Style::default()
            .fg(palette_color(Palette::CURRENT))
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        Highlight::Label(name) => match labels.iter().find(|def| def.name == *name) {
            Some(def) => Style::default()
                .fg(palette_color(def.color))
                .add_modifier(Modifier::BOLD),
            // labels from the dataset that this session has no key for
            None => Style::default().fg(SUBTEXT0).add_modifier(Modifier::UNDERLINED),
        },
    }
}

fn draw_prompt(frame: &mut Frame, screen: &Screen, area: Rect) {
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(SUBTEXT0));

    let arrow = Span::styled("➡ ", Style::default().fg(MAUVE));

    let mut legend = vec![arrow.clone()];
    match screen.kind {
        SessionKind::Annotate => {
            legend.push(Span::styled("(label) = ", Style::default().fg(SUBTEXT0)));
            for (i, def) in screen.labels.iter().enumerate() {
                if i > 0 {
                    legend.push(Span::raw(" "));
                }
                legend.push(Span::styled(
                    format!("{}-{}", def.key, def.name),
                    Style::default().fg(palette_color(def.color)),
                ));
            }
        }
        SessionKind::Flag => {
            legend.push(Span::styled("Enter", Style::default().fg(GREEN)));
            legend.push(Span::styled(" interesting  ", Style::default().fg(SUBTEXT0)));
            legend.push(Span::styled("Space", Style::default().fg(RED)));
            legend.push(Span::styled(" not interesting", Style::default().fg(SUBTEXT0)));
        }
    }

    let word = Line::from(vec![
        arrow,
        Span::styled("(word) = ", Style::default().fg(SUBTEXT0)),
        Span::styled(screen.word.clone(), Style::default().fg(YELLOW).add_modifier(Modifier::BOLD)),
    ]);

    let paragraph = Paragraph::new(vec![Line::from(legend), word]).block(block);
    frame.render_widget(paragraph, area);
}

fn draw_status_bar(frame: &mut Frame, screen: &Screen, area: Rect) {
    let mode_str = match screen.mode {
        Mode::Browsing => "BROWSING",
        Mode::Editing => "EDITING",
    };

    let help_hint = match screen.kind {
        SessionKind::Annotate => "←/→ word | ↑/↓ widen | -/= narrow | u unset | Enter next | h help | q quit",
        SessionKind::Flag => "←/→ word | Enter keep | Space drop | q quit",
    };

    let status_bar = Paragraph::new(format!(" {} | {}", mode_str, help_hint))
        .style(Style::default().fg(SUBTEXT0).bg(SURFACE0));

    frame.render_widget(status_bar, area);
}

fn draw_help(frame: &mut Frame) {
    let area = centered_rect(60, 18, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(BLUE))
        .style(Style::default().bg(BASE))
        .title("Help (press any key to close)");

    let heading = |text: &'static str| {
        Line::from(Span::styled(text, Style::default().fg(MAUVE).add_modifier(Modifier::BOLD)))
    };

    let help_text = vec![
        heading("Navigation"),
        Line::from("  ←/→      Previous/next word"),
        Line::from("  ↑/↓      Widen selection left/right"),
        Line::from("  -/=      Narrow selection from left/right"),
        Line::from(""),
        heading("Labels"),
        Line::from("  <key>    Label the selection"),
        Line::from("  u        Remove the label under the selection"),
        Line::from("  Space    Drop the current selection"),
        Line::from(""),
        heading("Session"),
        Line::from("  Enter    Save spans and go to the next text"),
        Line::from("  q        Save and quit"),
        Line::from(""),
        Line::from(Span::styled("Press any key to close", Style::default().fg(SUBTEXT0))),
    ];

    let paragraph = Paragraph::new(help_text).block(block);
    frame.render_widget(paragraph, area);
}

fn palette_color(color: Palette) -> Color {
    match color {
        Palette::Red => RED,
        Palette::Peach => PEACH,
        Palette::Yellow => YELLOW,
        Palette::Green => GREEN,
        Palette::Teal => TEAL,
        Palette::Blue => BLUE,
        Palette::Mauve => MAUVE,
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
