// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use std::io;
use std::ops::Range;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use time::{OffsetDateTime, UtcOffset};
use tours_app::{AppCommand, AppEvent, AppState, LoadState, TourCard, TourRecord, format_price};

const SELECTED_MARKER: &str = "▌ ";
const UNSELECTED_MARKER: &str = "  ";
const MARKER_WIDTH: usize = 2;
const STATUS_CLEAR_AFTER: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiOptions {
    pub show_image_urls: bool,
}

impl Default for UiOptions {
    fn default() -> Self {
        Self {
            show_image_urls: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchEvent {
    Finished {
        request_id: u64,
        tours: Vec<TourRecord>,
        fetched_at: OffsetDateTime,
    },
    Failed {
        request_id: u64,
        error: String,
    },
}

impl FetchEvent {
    pub fn from_result(request_id: u64, result: Result<Vec<TourRecord>>) -> Self {
        match result {
            Ok(tours) => Self::Finished {
                request_id,
                tours,
                fetched_at: OffsetDateTime::now_utc(),
            },
            Err(error) => Self::Failed {
                request_id,
                error: format!("{error:#}"),
            },
        }
    }

    const fn request_id(&self) -> u64 {
        match self {
            Self::Finished { request_id, .. } | Self::Failed { request_id, .. } => *request_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
    Fetch(FetchEvent),
}

pub trait AppRuntime {
    fn fetch_tours(&mut self) -> Result<Vec<TourRecord>>;

    /// Starts a fetch whose result is posted back as `InternalEvent::Fetch`.
    /// Runtimes backed by the network override this to run off the UI thread.
    fn spawn_fetch(&mut self, request_id: u64, tx: Sender<InternalEvent>) -> Result<()> {
        let event = FetchEvent::from_result(request_id, self.fetch_tours());
        tx.send(InternalEvent::Fetch(event))
            .map_err(|_| anyhow::anyhow!("fetch event channel closed"))?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
struct ViewData {
    options: UiOptions,
    help_visible: bool,
    status_token: u64,
}

pub fn run_app<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    options: UiOptions,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData {
        options,
        ..ViewData::default()
    };
    let (internal_tx, internal_rx) = mpsc::channel();

    start_load(state, runtime, &mut view_data, &internal_tx);

    let mut result = Ok(());
    loop {
        process_internal_events(state, &mut view_data, &internal_tx, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = match event::poll(Duration::from_millis(120)).context("poll event") {
            Ok(has_event) => has_event,
            Err(error) => {
                result = Err(error);
                break;
            }
        };
        if has_event {
            match event::read().context("read event") {
                Ok(Event::Key(key)) => {
                    if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Ok(_) => {}
                Err(error) => {
                    result = Err(error);
                    break;
                }
            }
        }
    }

    // Dropping the receiver here is what discards fetches still in flight.
    drop(internal_rx);
    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn start_load<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    state.dispatch(AppCommand::BeginLoad);
    let request_id = state.request_id;
    tracing::info!(request_id, "loading tours");

    if let Err(error) = runtime.spawn_fetch(request_id, internal_tx.clone()) {
        let error = format!("{error:#}");
        tracing::warn!(request_id, %error, "could not start fetch");
        let events = state.dispatch(AppCommand::LoadFailed { request_id, error });
        track_status(view_data, internal_tx, &events);
    }
}

fn process_internal_events(
    state: &mut AppState,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
            InternalEvent::Fetch(event) => handle_fetch_event(state, view_data, tx, event),
        }
    }
}

fn handle_fetch_event(
    state: &mut AppState,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    event: FetchEvent,
) {
    let request_id = event.request_id();
    let command = match event {
        FetchEvent::Finished {
            request_id,
            tours,
            fetched_at,
        } => {
            tracing::info!(request_id, count = tours.len(), "tours loaded");
            AppCommand::LoadFinished {
                request_id,
                tours,
                fetched_at,
            }
        }
        FetchEvent::Failed { request_id, error } => {
            tracing::warn!(request_id, %error, "tour fetch failed");
            AppCommand::LoadFailed { request_id, error }
        }
    };

    let events = state.dispatch(command);
    if events.is_empty() {
        tracing::debug!(
            request_id,
            current = state.request_id,
            "dropped stale fetch result"
        );
    }
    track_status(view_data, tx, &events);
}

fn track_status(view_data: &mut ViewData, internal_tx: &Sender<InternalEvent>, events: &[AppEvent]) {
    if events
        .iter()
        .any(|event| matches!(event, AppEvent::StatusUpdated(_)))
    {
        view_data.status_token = view_data.status_token.saturating_add(1);
        schedule_status_clear(internal_tx, view_data.status_token);
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(STATUS_CLEAR_AFTER);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    let events = state.dispatch(AppCommand::SetStatus(message.into()));
    track_status(view_data, internal_tx, &events);
}

fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('q') | KeyCode::Char('c'))
    {
        return true;
    }

    if view_data.help_visible {
        if matches!(
            key.code,
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')
        ) {
            view_data.help_visible = false;
        }
        return false;
    }

    let command = match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Char('?') => {
            view_data.help_visible = true;
            return false;
        }
        KeyCode::Char('r') => {
            start_load(state, runtime, view_data, internal_tx);
            return false;
        }
        KeyCode::Char('j') | KeyCode::Down => AppCommand::SelectNext,
        KeyCode::Char('k') | KeyCode::Up => AppCommand::SelectPrev,
        KeyCode::Char('g') | KeyCode::Home => AppCommand::SelectFirst,
        KeyCode::Char('G') | KeyCode::End => AppCommand::SelectLast,
        KeyCode::Enter | KeyCode::Char(' ') => AppCommand::ToggleSelected,
        KeyCode::Char('x') | KeyCode::Char('d') | KeyCode::Delete => AppCommand::RemoveSelected,
        _ => return false,
    };

    if state.load != LoadState::Ready {
        if state.is_loading() {
            emit_status(state, view_data, internal_tx, "still loading");
        }
        return false;
    }

    let events = state.dispatch(command);
    for event in &events {
        if let AppEvent::TourRemoved { id, remaining } = event {
            tracing::debug!(%id, remaining, "tour marked not interested");
        }
    }
    track_status(view_data, internal_tx, &events);
    false
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CardLineKind {
    Heading,
    Image,
    Body,
    Toggle,
    Remove,
    Spacer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CardLine {
    kind: CardLineKind,
    text: String,
}

impl CardLine {
    fn new(kind: CardLineKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

fn card_lines(card: &TourCard, width: usize, options: UiOptions) -> Vec<CardLine> {
    let display = card.display();
    let mut lines = vec![CardLine::new(
        CardLineKind::Heading,
        heading_line(&card.record.name, &format_price(&card.record.price), width),
    )];

    if options.show_image_urls {
        lines.push(CardLine::new(
            CardLineKind::Image,
            truncate_label(&format!("image: {}", card.record.image), width),
        ));
    }

    lines.extend(
        wrap_text(&display.visible_text, width)
            .into_iter()
            .map(|line| CardLine::new(CardLineKind::Body, line)),
    );

    if let Some(label) = display.toggle_label {
        lines.push(CardLine::new(
            CardLineKind::Toggle,
            format!("[{}]", label.as_str()),
        ));
    }
    lines.push(CardLine::new(CardLineKind::Remove, "[not interested]"));
    lines
}

fn heading_line(name: &str, price: &str, width: usize) -> String {
    let price_width = price.chars().count();
    let name = truncate_label(name, width.saturating_sub(price_width + 1).max(1));
    let gap = width
        .saturating_sub(name.chars().count() + price_width)
        .max(1);
    format!("{name}{}{price}", " ".repeat(gap))
}

/// Lays out every card for a body of `width` columns and returns the
/// line range each card occupies.
fn card_list_lines(
    cards: &[TourCard],
    width: usize,
    options: UiOptions,
) -> (Vec<CardLine>, Vec<Range<usize>>) {
    let card_width = width.saturating_sub(MARKER_WIDTH).max(1);
    let mut lines = Vec::new();
    let mut ranges = Vec::with_capacity(cards.len());
    for card in cards {
        let start = lines.len();
        lines.extend(card_lines(card, card_width, options));
        ranges.push(start..lines.len());
        lines.push(CardLine::new(CardLineKind::Spacer, ""));
    }
    (lines, ranges)
}

fn scroll_offset(selected: &Range<usize>, height: usize) -> usize {
    if selected.end <= height {
        0
    } else {
        selected.start.min(selected.end - height)
    }
}

fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_len = 0;
        for word in paragraph.split_whitespace() {
            let word_len = word.chars().count();
            if current_len > 0 && current_len + 1 + word_len <= width {
                current.push(' ');
                current.push_str(word);
                current_len += 1 + word_len;
                continue;
            }
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
            }

            let mut chars = word.chars().collect::<Vec<char>>();
            while chars.len() > width {
                lines.push(chars.drain(..width).collect());
            }
            current = chars.into_iter().collect();
            current_len = current.chars().count();
        }
        lines.push(current);
    }
    lines
}

fn truncate_label(value: &str, max_chars: usize) -> String {
    let mut chars = value.chars();
    let truncated: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() && max_chars > 0 {
        let mut shortened: String = truncated.chars().take(max_chars - 1).collect();
        shortened.push('…');
        shortened
    } else {
        truncated
    }
}

/// Plain-text rendering of the current list, used by `tours --list`.
pub fn render_plain(state: &AppState, width: usize, options: UiOptions) -> String {
    let mut out = String::new();
    out.push_str(&heading_text(state));
    out.push_str("\n\n");
    let (lines, _) = card_list_lines(&state.cards, width, options);
    for line in lines {
        if line.kind == CardLineKind::Spacer {
            out.push('\n');
        } else {
            out.push_str(UNSELECTED_MARKER);
            out.push_str(line.text.trim_end());
            out.push('\n');
        }
    }
    out
}

fn heading_text(state: &AppState) -> String {
    match &state.load {
        LoadState::Loading => "loading...".to_owned(),
        LoadState::Failed(_) => "our tours | load failed".to_owned(),
        LoadState::Ready => {
            let count = state.cards.len();
            match state.loaded_at {
                Some(at) => format!("our tours ({count}) | loaded {}", format_loaded_at(at)),
                None => format!("our tours ({count})"),
            }
        }
    }
}

fn format_loaded_at(at: OffsetDateTime) -> String {
    at.to_offset(UtcOffset::UTC)
        .format(&time::macros::format_description!(
            "[hour]:[minute]:[second]"
        ))
        .map(|formatted| format!("{formatted} UTC"))
        .unwrap_or_else(|_| "just now".to_owned())
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let heading = Paragraph::new(heading_text(state))
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::default().title("tours").borders(Borders::ALL));
    frame.render_widget(heading, layout[0]);

    render_body(frame, layout[1], state, view_data);

    let status = Paragraph::new(status_text(state))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, layout[2]);

    if view_data.help_visible {
        let area = centered_rect(60, 50, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn render_body(frame: &mut ratatui::Frame<'_>, area: Rect, state: &AppState, view_data: &ViewData) {
    let block = Block::default().borders(Borders::ALL);
    match &state.load {
        LoadState::Loading => {
            frame.render_widget(block, area);
        }
        LoadState::Failed(error) => {
            let body = Paragraph::new(format!(
                "could not load tours\n\n{error}\n\npress r to retry"
            ))
            .style(Style::default().fg(Color::Red))
            .block(block);
            frame.render_widget(body, area);
        }
        LoadState::Ready if state.cards.is_empty() => {
            let body = Paragraph::new("no tours left\n\npress r to refresh").block(block);
            frame.render_widget(body, area);
        }
        LoadState::Ready => {
            let inner_width = usize::from(area.width.saturating_sub(2));
            let inner_height = usize::from(area.height.saturating_sub(2));
            let (lines, ranges) = card_list_lines(&state.cards, inner_width, view_data.options);
            let offset = ranges
                .get(state.selected)
                .map_or(0, |range| scroll_offset(range, inner_height));

            let styled = lines
                .into_iter()
                .enumerate()
                .map(|(index, line)| {
                    let selected = ranges
                        .get(state.selected)
                        .is_some_and(|range| range.contains(&index));
                    styled_card_line(line, selected)
                })
                .collect::<Vec<Line<'static>>>();

            let body = Paragraph::new(styled)
                .block(block)
                .scroll((u16::try_from(offset).unwrap_or(u16::MAX), 0));
            frame.render_widget(body, area);
        }
    }
}

fn styled_card_line(line: CardLine, selected: bool) -> Line<'static> {
    if line.kind == CardLineKind::Spacer {
        return Line::default();
    }

    let marker = if selected {
        Span::styled(SELECTED_MARKER, Style::default().fg(Color::Cyan))
    } else {
        Span::raw(UNSELECTED_MARKER)
    };
    let style = match line.kind {
        CardLineKind::Heading => Style::default().add_modifier(Modifier::BOLD),
        CardLineKind::Image => Style::default().fg(Color::DarkGray),
        CardLineKind::Body | CardLineKind::Spacer => Style::default(),
        CardLineKind::Toggle => Style::default().fg(Color::Blue),
        CardLineKind::Remove => Style::default().fg(Color::Red),
    };
    Line::from(vec![marker, Span::styled(line.text, style)])
}

fn status_text(state: &AppState) -> String {
    let hints = match &state.load {
        LoadState::Loading => "r reload | ? help | q quit".to_owned(),
        LoadState::Failed(_) => "r retry | ? help | q quit".to_owned(),
        LoadState::Ready => {
            let toggle = state
                .selected_card()
                .and_then(|card| card.display().toggle_label)
                .map_or_else(String::new, |label| format!("enter {} | ", label.as_str()));
            format!("j/k move | {toggle}x not interested | r reload | ? help | q quit")
        }
    };
    match &state.status_line {
        Some(status) => format!("{status} | {hints}"),
        None => hints,
    }
}

fn help_overlay_text() -> &'static str {
    "j/k or up/down   move between tours\n\
g/G              first/last tour\n\
enter/space      show more / show less\n\
x/d/delete       not interested (remove)\n\
r                reload (or retry after an error)\n\
?                toggle help\n\
q/esc/ctrl+q     quit"
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
