use crate::app::{App, InputMode};
use crate::detail::{DetailState, DetailView};
use crate::fetch::Catalog;
use crate::toast::ToastKind;
use crate::utils::{format_height, format_name, format_weight, hex_to_rgb, type_rgb};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Span, Spans};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use std::io;
use std::io::Stdout;

pub fn draw_ui<C: Catalog + 'static>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &App<C>,
) -> io::Result<()> {
    terminal.draw(|f| render(f, app)).map(|_| ())
}

/// Lays out the whole screen. Split from [`draw_ui`] so any backend can render it.
pub fn render<B: Backend, C: Catalog + 'static>(f: &mut Frame<B>, app: &App<C>) {
    let size = f.size();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(1)])
        .split(size);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(rows[0]);

    let left_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(chunks[0]);

    render_list(f, app, left_chunks[0]);
    render_search(f, app, left_chunks[1]);

    match &app.detail {
        Some(view) => render_detail(f, app, view, chunks[1]),
        None => render_preview(f, app, chunks[1]),
    }

    render_footer(f, app, rows[1]);

    if app.show_help {
        let popup = centered_rect(60, 50, size);
        f.render_widget(Clear, popup);
        f.render_widget(help(), popup);
    }
}

fn render_list<B: Backend, C: Catalog + 'static>(f: &mut Frame<B>, app: &App<C>, area: Rect) {
    let items: Vec<ListItem> = app
        .list
        .visible()
        .map(|p| {
            ListItem::new(vec![Spans::from(vec![
                Span::styled(format!("#{:03} ", p.id), Style::default().fg(Color::DarkGray)),
                Span::raw(format_name(&p.name)),
            ])])
        })
        .collect();

    let title = if app.list.is_loading() {
        format!("Pokémon ({}) loading…", app.list.items().len())
    } else {
        format!("Pokémon ({})", app.list.items().len())
    };

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = ListState::default();
    if app.list.visible_len() > 0 {
        state.select(Some(app.list.selected_index()));
    }
    f.render_stateful_widget(list, area, &mut state);
}

fn render_search<B: Backend, C: Catalog + 'static>(f: &mut Frame<B>, app: &App<C>, area: Rect) {
    let (title, text) = match app.mode {
        InputMode::Search => ("Search", format!("/{}", app.search_query)),
        InputMode::Goto => ("Go to", format!("name: {}", app.goto_query)),
        InputMode::Normal if !app.list.filter().is_empty() => {
            ("Search", format!("filter: {}", app.list.filter()))
        }
        InputMode::Normal => (
            "Search",
            "Press '/' to search loaded Pokémon, 'g' to look one up by name.".to_string(),
        ),
    };
    let para = Paragraph::new(vec![Spans::from(Span::raw(text))])
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(para, area);
}

fn render_preview<B: Backend, C: Catalog + 'static>(f: &mut Frame<B>, app: &App<C>, area: Rect) {
    let outer = Block::default().borders(Borders::ALL).title("Details");
    let Some(p) = app.list.selected() else {
        let text = if app.list.is_loading() {
            "Loading…"
        } else {
            "No Pokémon match the filter"
        };
        f.render_widget(Paragraph::new(text).block(outer), area);
        return;
    };

    let inner = outer.inner(area);
    f.render_widget(outer, area);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(26), Constraint::Min(10)])
        .split(inner);
    let sprite_rect = Rect {
        height: cols[0].height.min(14),
        ..cols[0]
    };
    f.render_widget(sprite_panel(app, p.id, sprite_rect), sprite_rect);

    let lines = vec![
        Spans::from(Span::styled(
            format!("{} (#{:03})", format_name(&p.name), p.id),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Spans::from(Span::raw("")),
        Spans::from(Span::raw("Press Enter to open details.")),
    ];
    let para = Paragraph::new(lines).wrap(Wrap { trim: true });
    f.render_widget(para, cols[1]);
}

/// Sprite drawn as one background-colored cell per pixel, sized to `rect`.
fn sprite_panel<C: Catalog + 'static>(app: &App<C>, id: u32, rect: Rect) -> Paragraph<'static> {
    let sprite_w = (rect.width.saturating_sub(2) as u32).clamp(1, 48);
    let sprite_h = (rect.height.saturating_sub(2) as u32).clamp(1, 48);
    let para = match app.sprite_pixels(id, sprite_w, sprite_h) {
        Some(pixels) => {
            let stext: Vec<Spans> = pixels
                .iter()
                .map(|row| {
                    Spans::from(
                        row.iter()
                            .map(|&(r, g, b)| {
                                Span::styled(" ", Style::default().bg(Color::Rgb(r, g, b)))
                            })
                            .collect::<Vec<_>>(),
                    )
                })
                .collect();
            Paragraph::new(stext)
        }
        None => Paragraph::new("(no sprite)"),
    };
    para.block(Block::default().borders(Borders::ALL).title("Sprite"))
}

fn render_detail<B: Backend, C: Catalog + 'static>(
    f: &mut Frame<B>,
    app: &App<C>,
    view: &DetailView,
    area: Rect,
) {
    let accent = hex_to_rgb(view.primary_type_color())
        .map(|(r, g, b)| Color::Rgb(r, g, b))
        .unwrap_or(Color::Gray);
    let outer = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent))
        .title(app.detail_title());

    let d = match view.state() {
        DetailState::Loaded(d) => d,
        DetailState::Loading { id } => {
            let para = Paragraph::new(format!("Loading #{:03}…", id)).block(outer);
            f.render_widget(para, area);
            return;
        }
        DetailState::Failed { id } => {
            let para = Paragraph::new(format!("Could not load #{:03}.", id)).block(outer);
            f.render_widget(para, area);
            return;
        }
    };

    let inner = outer.inner(area);
    f.render_widget(outer, area);

    let detail_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(12), Constraint::Min(6)])
        .split(inner);

    let top_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(26), Constraint::Min(10)])
        .split(detail_chunks[0]);

    f.render_widget(sprite_panel(app, d.id, top_chunks[0]), top_chunks[0]);

    let mut info_lines: Vec<Spans> = Vec::new();
    let mut type_spans: Vec<Span> = vec![Span::raw("Types: ")];
    for (i, t) in d.types.iter().enumerate() {
        let (r, g, b) = type_rgb(&t.kind.name);
        // contrasting foreground for the badge
        let lum = 0.2126 * (r as f32) + 0.7152 * (g as f32) + 0.0722 * (b as f32);
        let fg = if lum > 160.0 { Color::Black } else { Color::White };
        type_spans.push(Span::styled(
            format!(" {} ", format_name(&t.kind.name)),
            Style::default().fg(fg).bg(Color::Rgb(r, g, b)),
        ));
        if i + 1 < d.types.len() {
            type_spans.push(Span::raw(" "));
        }
    }
    info_lines.push(Spans::from(type_spans));
    info_lines.push(Spans::from(Span::raw(format!(
        "Height: {} m  Weight: {} kg",
        format_height(d.height),
        format_weight(d.weight)
    ))));
    if let Some(exp) = d.base_experience {
        info_lines.push(Spans::from(Span::raw(format!("Base EXP: {}", exp))));
    }
    if !d.abilities.is_empty() {
        let abilities: Vec<String> = d
            .abilities
            .iter()
            .map(|a| {
                if a.is_hidden {
                    format!("{} (hidden)", format_name(&a.ability.name))
                } else {
                    format_name(&a.ability.name)
                }
            })
            .collect();
        info_lines.push(Spans::from(Span::raw(format!(
            "Abilities: {}",
            abilities.join(", ")
        ))));
    }
    info_lines.push(Spans::from(Span::raw(format!(
        "Species: {}",
        format_name(&d.species.name)
    ))));
    info_lines.push(Spans::from(Span::raw("")));
    info_lines.push(Spans::from(Span::styled(
        "f favorite · s share · Esc back",
        Style::default().fg(Color::DarkGray),
    )));
    let info_para = Paragraph::new(info_lines)
        .block(Block::default().borders(Borders::ALL).title("Info"))
        .wrap(Wrap { trim: true });
    f.render_widget(info_para, top_chunks[1]);

    // NAME | VALUE | bar scaled to the theoretical maximum
    let stats_rect = detail_chunks[1];
    let inner_w = stats_rect.width.saturating_sub(2) as usize;
    let name_w = 10usize;
    let val_w = 4usize;
    let bar_max_w = inner_w.saturating_sub(name_w + val_w + 2);

    let mut stat_lines: Vec<Spans> = view
        .stat_rows()
        .into_iter()
        .map(|row| {
            let bar_len = (row.fraction * bar_max_w as f64).round() as usize;
            Spans::from(vec![
                Span::raw(format!(
                    "{:<name_w$} {:>val_w$} ",
                    row.label,
                    row.value,
                    name_w = name_w,
                    val_w = val_w
                )),
                Span::styled("█".repeat(bar_len), Style::default().fg(accent)),
            ])
        })
        .collect();
    stat_lines.push(Spans::from(Span::styled(
        format!(
            "{:<name_w$} {:>val_w$}",
            "Total",
            view.total_stats(),
            name_w = name_w,
            val_w = val_w
        ),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    let stats_para =
        Paragraph::new(stat_lines).block(Block::default().borders(Borders::ALL).title("Stats"));
    f.render_widget(stats_para, stats_rect);
}

fn render_footer<B: Backend, C: Catalog + 'static>(f: &mut Frame<B>, app: &App<C>, area: Rect) {
    let para = match app.toasts.current() {
        Some(toast) => {
            let color = match toast.kind {
                ToastKind::Info => Color::Cyan,
                ToastKind::Success => Color::Green,
                ToastKind::Muted => Color::Gray,
                ToastKind::Error => Color::Red,
            };
            Paragraph::new(Spans::from(Span::styled(
                toast.message.clone(),
                Style::default().fg(Color::Black).bg(color),
            )))
            .alignment(Alignment::Center)
        }
        None => {
            let status = if app.list.can_load_more() {
                "↑/↓ move · Enter open · n more · r refresh · ? help · q quit"
            } else {
                "End of catalog · r refresh · ? help · q quit"
            };
            Paragraph::new(Spans::from(Span::styled(
                status,
                Style::default().fg(Color::DarkGray),
            )))
        }
    };
    f.render_widget(para, area);
}

fn help() -> Paragraph<'static> {
    let lines = vec![
        Spans::from(Span::styled(
            "Keybindings",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Spans::from(Span::raw("")),
        Spans::from(Span::raw("q          Quit")),
        Spans::from(Span::raw("Up/Down    Navigate list (loads more at the bottom)")),
        Spans::from(Span::raw("Enter      Open details")),
        Spans::from(Span::raw("Esc        Back to the list")),
        Spans::from(Span::raw("/          Search loaded Pokémon")),
        Spans::from(Span::raw("g          Look up a Pokémon by name")),
        Spans::from(Span::raw("n          Load next page")),
        Spans::from(Span::raw("r          Refresh")),
        Spans::from(Span::raw("f / s      Favorite / share (details)")),
        Spans::from(Span::raw("?          Toggle this help")),
    ];
    Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Help"))
        .wrap(Wrap { trim: true })
}

// centered rect for popups
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_w = r.width.saturating_mul(percent_x) / 100;
    let popup_h = r.height.saturating_mul(percent_y) / 100;
    let popup_x = r.x + (r.width.saturating_sub(popup_w) / 2);
    let popup_y = r.y + (r.height.saturating_sub(popup_h) / 2);
    Rect::new(popup_x, popup_y, popup_w, popup_h)
}
