use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, Variant, PLACEHOLDER_TEXT};
use crate::config::KEY_HINTS;
use crate::models::ModelDescriptor;

const BG_DARK: Color = Color::Rgb(12, 12, 16);           // Deep background

const SAPPHIRE: Color = Color::Rgb(101, 150, 243);       // #6596F3 - Primary accent
const COPPER: Color = Color::Rgb(138, 72, 38);           // #8A4826 - Copper
const PALE_YELLOW: Color = Color::Rgb(234, 208, 148);    // #EAD094 - Pale yellow

// Text colors
const TEXT_PRIMARY: Color = Color::Rgb(240, 240, 245);   // Near white
const TEXT_SECONDARY: Color = Color::Rgb(180, 180, 190); // Light gray
const TEXT_MUTED: Color = Color::Rgb(105, 116, 133);     // #697485 - Medium gray

const BORDER_DIM: Color = Color::Rgb(45, 50, 60);        // Dim border

const SPINNER: &[&str] = &["|", "/", "-", "\\"];

/// Rows a prompt needs when wrapped to `width` columns, at least one.
fn wrapped_lines(text: &str, width: usize) -> usize {
    if width == 0 {
        return 1;
    }
    text.split('\n')
        .map(|line| UnicodeWidthStr::width(line).max(1).div_ceil(width))
        .sum::<usize>()
        .max(1)
}

/// Height of a bordered prompt box: content clamped to 1..=4 rows
fn prompt_height(text: &str, width: u16) -> u16 {
    let inner_width = width.saturating_sub(4) as usize;
    (wrapped_lines(text, inner_width) as u16).clamp(1, 4) + 2
}

pub fn draw(frame: &mut Frame, app: &mut App) {
    let bg = Block::default().style(Style::default().bg(BG_DARK));
    frame.render_widget(bg, frame.area());

    let area = frame.area();
    let padded = Rect {
        x: area.x + 1,
        y: area.y,
        width: area.width.saturating_sub(2),
        height: area.height,
    };

    let shared_height = match app.variant {
        Variant::Shared => prompt_height(&app.shared_prompt, padded.width) + 1,
        Variant::Independent => 0,
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),             // Title
            Constraint::Length(shared_height), // Shared prompt (if any)
            Constraint::Min(6),                // Model grid
            Constraint::Length(1),             // Status / hints
        ])
        .split(padded);

    draw_title(frame, app, chunks[0]);
    if app.variant == Variant::Shared {
        draw_shared_prompt(frame, app, chunks[1]);
    }
    for (model_id, limit) in draw_grid(frame, app, chunks[2]) {
        app.ui.set_scroll_limit(model_id, limit);
    }
    draw_footer(frame, app, chunks[3]);
}

fn draw_title(frame: &mut Frame, app: &App, area: Rect) {
    let title = Paragraph::new(Line::from(vec![
        Span::styled(
            "LLM Model Comparison",
            Style::default().fg(SAPPHIRE).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  ({})", app.variant.label()),
            Style::default().fg(TEXT_MUTED),
        ),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(title, area);
}

fn draw_shared_prompt(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);

    draw_prompt_box(
        frame,
        app,
        chunks[0],
        None,
        "Enter your prompt for all models...",
        SAPPHIRE,
    );
    draw_submit(frame, app, chunks[1], None, SAPPHIRE);
}

/// Returns each panel's scroll limit for the size it was drawn at.
fn draw_grid(frame: &mut Frame, app: &App, area: Rect) -> Vec<(&'static str, u16)> {
    let models = app.models();
    let mut limits = Vec::with_capacity(models.len());
    if models.is_empty() {
        return limits;
    }

    // Four boxes go 2x2, anything smaller sits in one row
    let cols = if models.len() == 4 { 2 } else { models.len().min(3) };
    let rows = models.len().div_ceil(cols);

    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, rows as u32); rows])
        .split(area);

    for (row, row_area) in row_areas.iter().enumerate() {
        let col_areas = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, cols as u32); cols])
            .split(*row_area);

        for (col, col_area) in col_areas.iter().enumerate() {
            let index = row * cols + col;
            if let Some(model) = models.get(index) {
                limits.push((model.id, draw_model_box(frame, app, *col_area, index, model)));
            }
        }
    }
    limits
}

fn draw_model_box(frame: &mut Frame, app: &App, area: Rect, index: usize, model: &ModelDescriptor) -> u16 {
    let accent = model.accent();
    let focused = app.ui.focus == index;

    let mut border_style = Style::default().fg(accent);
    if focused {
        border_style = border_style.add_modifier(Modifier::BOLD);
    }

    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", model.display_name),
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(if focused { BorderType::Thick } else { BorderType::Rounded })
        .border_style(border_style);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    match app.variant {
        Variant::Independent => {
            let prompt = app.prompt(Some(model.id));
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(prompt_height(prompt, inner.width)),
                    Constraint::Length(1), // Submit
                    Constraint::Min(2),    // Response
                ])
                .split(inner);

            let placeholder = format!("Enter your prompt for {}...", model.display_name);
            draw_prompt_box(frame, app, chunks[0], Some(model.id), &placeholder, accent);
            draw_submit(frame, app, chunks[1], Some(model.id), accent);
            draw_response(frame, app, chunks[2], model)
        }
        Variant::Shared => draw_response(frame, app, inner, model),
    }
}

fn draw_prompt_box(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    model_id: Option<&'static str>,
    placeholder: &str,
    accent: Color,
) {
    let editable = app.prompt_editable(model_id);
    let focused = app.input_target() == model_id;

    let border_color = if focused && editable { accent } else { BORDER_DIM };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let prompt = app.prompt(model_id);
    let paragraph = if prompt.is_empty() {
        Paragraph::new(Span::styled(
            placeholder.to_string(),
            Style::default().fg(TEXT_MUTED).add_modifier(Modifier::ITALIC),
        ))
    } else {
        let color = if editable { TEXT_PRIMARY } else { TEXT_MUTED };
        let cursor = if focused && editable && app.animation_frame % 30 < 15 {
            "|"
        } else {
            ""
        };
        let lines: Vec<Line> = format!("{}{}", prompt, cursor)
            .split('\n')
            .map(|line| Line::from(line.to_string()))
            .collect();
        Paragraph::new(lines).style(Style::default().fg(color))
    };

    // Keep the tail of a long prompt visible
    let rows = wrapped_lines(prompt, inner.width as usize) as u16;
    let scroll = rows.saturating_sub(inner.height);
    frame.render_widget(paragraph.wrap(Wrap { trim: false }).scroll((scroll, 0)), inner);
}

fn draw_submit(frame: &mut Frame, app: &App, area: Rect, model_id: Option<&'static str>, accent: Color) {
    let sending = match model_id {
        Some(id) => app.is_loading(id),
        None => app.any_loading(),
    };
    let label = if sending { "[ Sending... ]" } else { "[ Submit ]" };

    let style = if app.can_submit(model_id) {
        Style::default().fg(BG_DARK).bg(accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(TEXT_MUTED)
    };

    let submit = Paragraph::new(Span::styled(label, style)).alignment(Alignment::Right);
    frame.render_widget(submit, area);
}

fn draw_response(frame: &mut Frame, app: &App, area: Rect, model: &ModelDescriptor) -> u16 {
    let loading = app.is_loading(model.id);

    let mut title = vec![Span::styled(
        "Response:",
        Style::default().fg(TEXT_SECONDARY).add_modifier(Modifier::BOLD),
    )];
    if loading {
        let frame_idx = (app.animation_frame / 8) % SPINNER.len();
        title.push(Span::styled(
            format!(" {}", SPINNER[frame_idx]),
            Style::default().fg(PALE_YELLOW),
        ));
    }

    let block = Block::default()
        .title(Line::from(title))
        .borders(Borders::TOP)
        .border_style(Style::default().fg(BORDER_DIM));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let paragraph = match app.response(model.id) {
        Some(text) => Paragraph::new(text.to_string()).style(Style::default().fg(TEXT_PRIMARY)),
        None => Paragraph::new(PLACEHOLDER_TEXT)
            .style(Style::default().fg(TEXT_MUTED).add_modifier(Modifier::ITALIC)),
    };

    let paragraph = paragraph.wrap(Wrap { trim: false });
    let rows = paragraph.line_count(inner.width).min(u16::MAX as usize) as u16;
    let limit = rows.saturating_sub(inner.height);

    let offset = app.ui.scroll_offset(model.id).min(limit);
    frame.render_widget(paragraph.scroll((offset, 0)), inner);
    limit
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let line = match &app.ui.status_message {
        Some(message) => Line::from(Span::styled(message.clone(), Style::default().fg(PALE_YELLOW))),
        None => {
            let mut spans = Vec::new();
            for (key, desc) in KEY_HINTS {
                spans.push(Span::styled(
                    *key,
                    Style::default().fg(COPPER).add_modifier(Modifier::BOLD),
                ));
                spans.push(Span::styled(format!(" {}  ", desc), Style::default().fg(TEXT_MUTED)));
            }
            Line::from(spans)
        }
    };

    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}
