use crate::artwork::SpriteThumb;
use crate::models::{DisplayRecord, StatKind};
use crate::toast::TerminalAlerts;
use crate::utils::{contrast_is_dark, format_id, format_name, format_tenths, type_color};
use crossterm::event::KeyCode;
use ratatui::backend::Backend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Span, Spans};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};

pub const CARD_W: u16 = 22;
pub const CARD_H: u16 = 6;
/// Stat bars are scaled against the highest base stat the catalog uses.
const STAT_SCALE_MAX: f32 = 255.0;
pub const ART_BACKGROUND: (u8, u8, u8) = (24, 24, 32);

/// What the event loop should do after a key press.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    None,
    Quit,
    Reload,
    /// The card at this index was opened; fire the selection alert and load
    /// its artwork.
    Selected(usize),
}

/// Presentation state. The records themselves are shared with the client's
/// list cache.
pub struct App {
    pub records: Arc<Vec<DisplayRecord>>,
    pub loading: bool,
    pub error: Option<String>,
    pub selected: usize,
    pub overlay_open: bool,
    pub show_help: bool,
    /// Cards per row, updated on every draw.
    pub columns: usize,
    pub artwork: Arc<Mutex<HashMap<u32, SpriteThumb>>>,
    pub alerts: Option<Arc<TerminalAlerts>>,
}

impl App {
    pub fn new(alerts: Option<Arc<TerminalAlerts>>) -> Self {
        Self {
            records: Arc::new(Vec::new()),
            loading: false,
            error: None,
            selected: 0,
            overlay_open: false,
            show_help: false,
            columns: 1,
            artwork: Arc::new(Mutex::new(HashMap::new())),
            alerts,
        }
    }

    pub fn begin_loading(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn finish_loading(&mut self, result: Result<Arc<Vec<DisplayRecord>>, String>) {
        self.loading = false;
        match result {
            Ok(records) => {
                self.records = records;
                self.error = None;
                if self.selected >= self.records.len() {
                    self.selected = 0;
                }
            }
            Err(message) => {
                self.error = Some(message);
                self.overlay_open = false;
            }
        }
    }

    pub fn selected_record(&self) -> Option<&DisplayRecord> {
        self.records.get(self.selected)
    }

    pub fn move_by(&mut self, delta: isize) {
        if self.records.is_empty() {
            return;
        }
        let last = self.records.len() as isize - 1;
        let target = self.selected as isize + delta;
        if (0..=last).contains(&target) {
            self.selected = target as usize;
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Action {
        if let Some(alerts) = &self.alerts {
            if alerts.prompt_pending() {
                match code {
                    KeyCode::Char('y') | KeyCode::Char('Y') => {
                        alerts.answer_prompt(true);
                        return Action::None;
                    }
                    KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                        alerts.answer_prompt(false);
                        return Action::None;
                    }
                    _ => {}
                }
            }
        }

        if self.show_help {
            self.show_help = false;
            return Action::None;
        }

        match code {
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Char('h') | KeyCode::Char('?') | KeyCode::F(1) => {
                self.show_help = true;
                Action::None
            }
            KeyCode::Char('r') if !self.loading => Action::Reload,
            KeyCode::Esc if self.overlay_open => {
                self.overlay_open = false;
                Action::None
            }
            _ if self.overlay_open => Action::None,
            KeyCode::Left => {
                self.move_by(-1);
                Action::None
            }
            KeyCode::Right => {
                self.move_by(1);
                Action::None
            }
            KeyCode::Up => {
                self.move_by(-(self.columns.max(1) as isize));
                Action::None
            }
            KeyCode::Down => {
                self.move_by(self.columns.max(1) as isize);
                Action::None
            }
            KeyCode::Enter if self.selected_record().is_some() => {
                self.overlay_open = true;
                Action::Selected(self.selected)
            }
            _ => Action::None,
        }
    }

    /// Artwork rows for `id` sized `w` x `h`, if its thumbnail is loaded.
    pub fn artwork_rows(&self, id: u32, w: u32, h: u32) -> Option<Vec<Vec<(u8, u8, u8)>>> {
        let cache = self.artwork.lock().unwrap_or_else(|e| e.into_inner());
        cache.get(&id).map(|thumb| thumb.rows(w, h))
    }
}

// helper to compute a centered rect for popups
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_w = r.width.saturating_mul(percent_x) / 100;
    let popup_h = r.height.saturating_mul(percent_y) / 100;
    let popup_x = r.x + (r.width.saturating_sub(popup_w) / 2);
    let popup_y = r.y + (r.height.saturating_sub(popup_h) / 2);
    Rect::new(popup_x, popup_y, popup_w, popup_h)
}

fn type_badges(types: &[String]) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for (i, t) in types.iter().enumerate() {
        let (r, g, b) = type_color(t);
        let fg = if contrast_is_dark(r, g, b) {
            Color::Black
        } else {
            Color::White
        };
        spans.push(Span::styled(
            format!(" {} ", format_name(t)),
            Style::default().fg(fg).bg(Color::Rgb(r, g, b)),
        ));
        if i + 1 < types.len() {
            spans.push(Span::raw(" "));
        }
    }
    spans
}

pub fn draw_ui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    terminal.draw(|f| draw_frame(f, app)).map(|_| ())
}

fn draw_frame<B: Backend>(f: &mut Frame<B>, app: &mut App) {
    let size = f.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(size);

    let header = Paragraph::new(Spans::from(vec![
        Span::styled("Pokédex", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!("  {} loaded", app.records.len())),
    ]));
    f.render_widget(header, chunks[0]);

    if let Some(message) = &app.error {
        let body = Paragraph::new(vec![
            Spans::from(Span::styled(message.clone(), Style::default().fg(Color::Red))),
            Spans::from(Span::raw("")),
            Spans::from(Span::raw("Press 'r' to try again.")),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Error"));
        f.render_widget(body, chunks[1]);
    } else if app.records.is_empty() {
        let text = if app.loading {
            "Loading Pokémon..."
        } else {
            "No Pokémon loaded."
        };
        let body = Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(body, chunks[1]);
    } else {
        draw_grid(f, chunks[1], app);
    }

    let footer = Paragraph::new(Spans::from(Span::styled(
        "←↑↓→ move  Enter details  Esc close  r reload  h help  q quit",
        Style::default().fg(Color::DarkGray),
    )));
    f.render_widget(footer, chunks[2]);

    if app.overlay_open {
        let records = Arc::clone(&app.records);
        if let Some(record) = records.get(app.selected) {
            draw_overlay(f, size, app, record);
        }
    }

    if let Some(alerts) = app.alerts.clone() {
        if let Some(toast) = alerts.visible() {
            let w = size.width.min(42);
            let area = Rect::new(size.x + size.width - w, size.y, w, 4.min(size.height));
            let para = Paragraph::new(Spans::from(Span::raw(toast.alert.body)))
                .wrap(Wrap { trim: true })
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Green))
                        .title(toast.alert.title),
                );
            f.render_widget(Clear, area);
            f.render_widget(para, area);
        }
        if alerts.prompt_pending() {
            let area = centered_rect(50, 20, size);
            let para = Paragraph::new("Allow selection alerts? (y/n)")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title("Alerts"));
            f.render_widget(Clear, area);
            f.render_widget(para, area);
        }
    }

    if app.show_help {
        let popup = centered_rect(60, 50, size);
        let help_lines = vec![
            Spans::from(Span::styled(
                "Keybindings",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Spans::from(Span::raw("")),
            Spans::from(Span::raw("q          Quit")),
            Spans::from(Span::raw("Arrows     Move between cards")),
            Spans::from(Span::raw("Enter      Open details")),
            Spans::from(Span::raw("Esc        Close details")),
            Spans::from(Span::raw("r          Reload the catalog")),
            Spans::from(Span::raw("y/n        Answer the alert prompt")),
            Spans::from(Span::raw("h/?        Toggle this help")),
        ];
        let help_para = Paragraph::new(help_lines)
            .block(Block::default().borders(Borders::ALL).title("Help"))
            .wrap(Wrap { trim: true });
        f.render_widget(Clear, popup);
        f.render_widget(help_para, popup);
    }
}

fn draw_grid<B: Backend>(f: &mut Frame<B>, area: Rect, app: &mut App) {
    let cols = ((area.width / CARD_W) as usize).max(1);
    let visible_rows = ((area.height / CARD_H) as usize).max(1);
    app.columns = cols;

    let sel_row = app.selected / cols;
    let first_row = (sel_row + 1).saturating_sub(visible_rows);
    let start = first_row * cols;
    let end = (start + visible_rows * cols).min(app.records.len());

    for (i, p) in app.records[start..end].iter().enumerate() {
        let row = (i / cols) as u16;
        let col = (i % cols) as u16;
        let rect = Rect::new(
            area.x + col * CARD_W,
            area.y + row * CARD_H,
            CARD_W.min(area.width),
            CARD_H.min(area.height),
        );
        let selected = start + i == app.selected;
        let border = if selected {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let lines = vec![
            Spans::from(Span::styled(
                format_name(&p.name),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Spans::from(type_badges(&p.types)),
            Spans::from(Span::raw(format!("Total {}", p.stats.total()))),
        ];
        let card = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(format_id(p.id)),
        );
        f.render_widget(card, rect);
    }
}

fn draw_overlay<B: Backend>(f: &mut Frame<B>, size: Rect, app: &App, p: &DisplayRecord) {
    let popup = centered_rect(80, 80, size);
    f.render_widget(Clear, popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("{} {}", format_name(&p.name), format_id(p.id)));
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(inner);

    // Terminal cells are about twice as tall as wide, so rows are halved.
    let art_rect = halves[0];
    let avail_w = art_rect.width.saturating_sub(2).max(1) as u32;
    let avail_h = art_rect.height.saturating_sub(2).max(1) as u32;
    let art_w = avail_w.min(avail_h * 2).min(64);
    let art_h = (art_w / 2).max(1);
    let art = match app.artwork_rows(p.id, art_w, art_h) {
        Some(rows) => {
            let text: Vec<Spans> = rows
                .into_iter()
                .map(|row| {
                    Spans::from(
                        row.into_iter()
                            .map(|(r, g, b)| Span::styled(" ", Style::default().bg(Color::Rgb(r, g, b))))
                            .collect::<Vec<_>>(),
                    )
                })
                .collect();
            Paragraph::new(text)
        }
        None if p.image.is_none() => Paragraph::new("(no artwork)").alignment(Alignment::Center),
        None => Paragraph::new("(loading artwork...)").alignment(Alignment::Center),
    };
    f.render_widget(art.block(Block::default().borders(Borders::ALL)), art_rect);

    let mut info: Vec<Spans> = Vec::new();
    let mut type_line = vec![Span::raw("Types: ")];
    type_line.extend(type_badges(&p.types));
    info.push(Spans::from(type_line));
    info.push(Spans::from(Span::raw(format!(
        "Height: {} m  Weight: {} kg",
        format_tenths(p.height),
        format_tenths(p.weight)
    ))));
    info.push(Spans::from(Span::raw("")));

    let name_w = 4usize;
    let val_w = 4usize;
    let bar_max_w = (halves[1].width as usize).saturating_sub(name_w + val_w + 2);
    for kind in StatKind::ALL {
        let base = p.stats.get(kind);
        let bar_len = ((base as f32 / STAT_SCALE_MAX).min(1.0) * bar_max_w as f32).round() as usize;
        info.push(Spans::from(Span::raw(format!(
            "{:<name_w$} {:>val_w$} {}",
            kind.label(),
            base,
            "█".repeat(bar_len),
            name_w = name_w,
            val_w = val_w
        ))));
    }
    info.push(Spans::from(Span::styled(
        format!("{:<name_w$} {:>val_w$}", "Tot", p.stats.total(), name_w = name_w, val_w = val_w),
        Style::default().add_modifier(Modifier::BOLD),
    )));

    let info_para = Paragraph::new(info).wrap(Wrap { trim: false });
    f.render_widget(info_para, halves[1]);
}
