use std::time::Instant;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Flex, Layout, Rect},
    style::Style,
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::{
    app::state::App,
    player::adapter::{EngineState, PlayerEngine},
    ui::{
        format_duration,
        notifications::NotificationLevel,
        theme::{Theme, get_theme},
    },
    widget::controls::{BUTTONS, Intent, button_label},
};

const ROUNDED_BORDER: border::Set = border::ROUNDED;

fn block_with_title(title: &'_ str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_set(ROUNDED_BORDER)
        .title(title)
}

pub fn render<E: PlayerEngine>(f: &mut Frame, app: &mut App<E>) {
    let theme = get_theme();
    let area = f.area();

    let background = Block::default().style(Style::default().bg(theme.bg));
    f.render_widget(background, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(6),
            Constraint::Length(3),
        ])
        .split(area);

    draw_header(f, chunks[0], app);
    draw_embed(f, chunks[1], app);
    draw_controls(f, chunks[2], app);
    draw_footer(f, chunks[3], app);
    draw_notification(f, chunks[2], app);
}

fn draw_header<E: PlayerEngine>(f: &mut Frame, area: Rect, app: &App<E>) {
    let theme = get_theme();
    let header = Paragraph::new(format!("playchrome · {}", app.widget.video_id()))
        .style(theme.header_style())
        .block(block_with_title(" 󰗃 ").border_style(theme.border_style()))
        .centered();
    f.render_widget(header, area);
}

/// Fixed-size region standing in for the engine's own surface.
fn draw_embed<E: PlayerEngine>(f: &mut Frame, area: Rect, app: &mut App<E>) {
    let theme = get_theme();
    let options = *app.widget.options();

    let [row] = Layout::vertical([Constraint::Length(options.height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [embed] = Layout::horizontal([Constraint::Length(options.width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    app.layout_regions.embed = Some(embed);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(ROUNDED_BORDER)
        .border_style(theme.label_style())
        .style(Style::default().bg(theme.embed_bg));
    let inner = block.inner(embed);
    f.render_widget(block, embed);

    let middle = Rect {
        y: inner.y + inner.height / 2,
        height: inner.height.min(1),
        ..inner
    };

    if !app.widget.is_ready() {
        let text = match app.error_message {
            Some(ref err) => Line::from(Span::styled(err.as_str(), Style::new().fg(theme.error))),
            None => Line::from(vec![
                Span::styled(app.loading.frame_at(Instant::now()), Style::new().fg(theme.accent)),
                Span::styled(" Loading player…", theme.label_style()),
            ]),
        };
        f.render_widget(Paragraph::new(text).alignment(Alignment::Center), middle);
        return;
    }

    let state = app.widget.state();
    let (icon, color) = match app.last_engine_state {
        Some(EngineState::Buffering) => ("󰦖", theme.paused),
        Some(EngineState::Ended) => ("󰑖", theme.fg_dim),
        _ if state.is_playing => ("", theme.playing),
        _ => ("󰏤", theme.paused),
    };
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(icon, Style::new().fg(color)),
            Span::styled(format!("  {}", app.widget.video_id()), theme.value_style()),
        ]))
        .alignment(Alignment::Center),
        middle,
    );

    if options.engine_controls() && inner.height > 2 {
        draw_engine_status(f, inner, app, theme);
    }
}

/// The engine's own minimal chrome, read straight from the engine.
fn draw_engine_status<E: PlayerEngine>(f: &mut Frame, inner: Rect, app: &App<E>, theme: &Theme) {
    let player = app.widget.player();
    let (Ok(time), Ok(duration)) = (player.current_time(), player.duration()) else {
        return;
    };
    let status = Rect {
        y: inner.y + inner.height - 1,
        height: 1,
        ..inner
    };
    f.render_widget(
        Paragraph::new(format!(
            "{} / {}",
            format_duration(time),
            format_duration(duration)
        ))
        .alignment(Alignment::Right)
        .style(theme.label_style()),
        status,
    );
}

fn draw_controls<E: PlayerEngine>(f: &mut Frame, area: Rect, app: &mut App<E>) {
    let theme = get_theme();
    let block = block_with_title(" ● Controls ").border_style(theme.border_style());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    draw_buttons(f, rows[0], app);
    draw_track(f, rows[2], app);
    draw_volume(f, rows[3], app);
}

fn draw_buttons<E: PlayerEngine>(f: &mut Frame, area: Rect, app: &mut App<E>) {
    let theme = get_theme();
    let is_playing = app.widget.state().is_playing;

    let labels: Vec<String> = BUTTONS
        .iter()
        .map(|intent| format!(" {} ", button_label(*intent, is_playing)))
        .collect();
    let constraints = labels
        .iter()
        .map(|label| Constraint::Length(label.chars().count() as u16));
    let rects = Layout::horizontal(constraints)
        .flex(Flex::Center)
        .spacing(2)
        .split(area);

    app.layout_regions.buttons.clear();
    for ((intent, label), rect) in BUTTONS.iter().zip(labels).zip(rects.iter()) {
        let active = *intent == Intent::TogglePlay && is_playing;
        f.render_widget(
            Paragraph::new(label).style(theme.button_style(active)),
            *rect,
        );
        app.layout_regions.buttons.push((*rect, *intent));
    }
}

fn draw_track<E: PlayerEngine>(f: &mut Frame, area: Rect, app: &mut App<E>) {
    let theme = get_theme();
    let state = app.widget.state();

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(8),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(8),
        ])
        .split(area);

    f.render_widget(
        Paragraph::new(format_duration(state.current_time_secs))
            .alignment(Alignment::Right)
            .style(theme.value_style()),
        chunks[0],
    );

    let slider_width = chunks[2].width as usize;
    let filled = ((state.progress_percent / 100.0 * slider_width as f64) as usize).min(slider_width);
    let color = if state.is_scrubbing {
        theme.accent
    } else {
        theme.track_color(state.is_playing)
    };

    let mut slider = String::new();
    for i in 0..slider_width {
        if i < filled.saturating_sub(1) {
            slider.push('━');
        } else if i == filled.saturating_sub(1) || (filled == 0 && i == 0) {
            slider.push('●');
        } else {
            slider.push('─');
        }
    }

    let split = filled.max(1).min(slider_width);
    let slider_spans = vec![
        Span::styled(
            slider.chars().take(split).collect::<String>(),
            Style::new().fg(color),
        ),
        Span::styled(
            slider.chars().skip(split).collect::<String>(),
            Style::new().fg(theme.fg_dim),
        ),
    ];
    f.render_widget(Paragraph::new(Line::from(slider_spans)), chunks[2]);

    f.render_widget(
        Paragraph::new(format_duration(state.duration_secs))
            .alignment(Alignment::Left)
            .style(theme.value_style()),
        chunks[4],
    );

    app.layout_regions.track = Some(chunks[2]);
}

fn draw_volume<E: PlayerEngine>(f: &mut Frame, area: Rect, app: &mut App<E>) {
    let theme = get_theme();
    let volume = app.widget.state().volume_percent;

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(8),
            Constraint::Length(1),
            Constraint::Length(20),
            Constraint::Length(1),
            Constraint::Length(5),
        ])
        .split(area);

    let icon = match volume {
        0 => "󰝟",
        1..=49 => "󰖀",
        _ => "󰕾",
    };
    let icon_style = if volume == 0 {
        Style::new().fg(theme.muted)
    } else {
        theme.label_style()
    };
    f.render_widget(
        Paragraph::new(icon)
            .alignment(Alignment::Right)
            .style(icon_style),
        chunks[0],
    );

    let width = chunks[2].width as usize;
    let filled = (volume as usize * width / 100).min(width);
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("■".repeat(filled), Style::new().fg(theme.accent)),
            Span::styled("·".repeat(width - filled), Style::new().fg(theme.fg_dim)),
        ])),
        chunks[2],
    );
    f.render_widget(
        Paragraph::new(format!("{}%", volume)).style(theme.value_style()),
        chunks[4],
    );

    app.layout_regions.volume = Some(chunks[2]);
}

fn draw_footer<E: PlayerEngine>(f: &mut Frame, area: Rect, app: &App<E>) {
    let theme = get_theme();
    let keybinds = if app.widget.variant().allows_scrubbing() {
        "Space/Click: Play/Pause | s: Stop | ←→/hl: ±2s | +/-: Volume | Drag track: Seek | q: Quit"
    } else {
        "Space/Click: Play/Pause | s: Stop | ←→/hl: ±2s | +/-: Volume | q: Quit"
    };

    f.render_widget(
        Paragraph::new(keybinds)
            .style(theme.label_style())
            .block(block_with_title("").border_style(theme.label_style())),
        area,
    );
}

fn draw_notification<E: PlayerEngine>(f: &mut Frame, controls: Rect, app: &App<E>) {
    let theme = get_theme();
    let Some(notification) = app.notifications.latest() else {
        return;
    };

    let text = format!(" {} {} ", notification.level.prefix(), notification.text);
    let width = (text.chars().count() as u16).min(controls.width.saturating_sub(2));
    let toast = Rect {
        x: controls.x + controls.width.saturating_sub(width + 1),
        y: controls.y,
        width,
        height: 1,
    };
    let color = match notification.level {
        NotificationLevel::Info => theme.accent,
        NotificationLevel::Error => theme.error,
    };

    f.render_widget(Clear, toast);
    f.render_widget(
        Paragraph::new(text).style(Style::new().fg(color).bg(theme.bg)),
        toast,
    );
}
