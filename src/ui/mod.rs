use std::{
    error::Error,
    io,
    time::{Duration, Instant},
};

use crossterm::{
    event::{self, Event as CrosstermEvent, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use rand::{Rng, SeedableRng, rngs::StdRng};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::{
    config, core,
    render::{self, CellSurface},
    types::{Rgb, Word},
};

const ROUND_QUESTION: &str = "Describe this sprint in one word";

// Weighted vocabulary for the simulated participants that stand in for the
// live response feed.
const FEED_VOCABULARY: &[(&str, u32)] = &[
    ("happy", 9),
    ("busy", 7),
    ("focused", 6),
    ("chaotic", 5),
    ("productive", 5),
    ("tired", 4),
    ("fun", 4),
    ("intense", 3),
    ("smooth", 3),
    ("crunchy", 2),
    ("calm", 2),
    ("rushed", 2),
    ("great", 1),
    ("weird", 1),
    ("long", 1),
];

pub fn run() -> Result<(), Box<dyn Error>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new();

    loop {
        while event::poll(Duration::from_millis(0))? {
            if let CrosstermEvent::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => {
                        shutdown_terminal(&mut terminal)?;
                        return Ok(());
                    }
                    KeyCode::Backspace => {
                        app.input.pop();
                    }
                    KeyCode::Enter => {
                        app.submit_input();
                    }
                    KeyCode::Char(ch) => {
                        if !ch.is_control() && app.input.len() < config::INPUT_MAX {
                            app.input.push(ch);
                        }
                    }
                    _ => {}
                }
            }
        }

        if app.last_poll.elapsed() >= Duration::from_secs(config::POLL_INTERVAL_SECS) {
            app.poll_feed();
        }

        terminal.draw(|frame| {
            let size = frame.size();
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(3),
                    Constraint::Min(3),
                    Constraint::Length(3),
                ])
                .split(size);

            let header = Paragraph::new(format!(
                "{} | responses: {} | words: {} | placed: {} | skipped: {}",
                ROUND_QUESTION,
                app.responses.len(),
                app.words.len(),
                app.placed_count,
                app.skipped_count,
            ))
            .block(Block::default().borders(Borders::ALL).title("wordbloom"));
            frame.render_widget(header, chunks[0]);

            let cols = chunks[1].width.saturating_sub(2);
            let rows = chunks[1].height.saturating_sub(2);
            app.ensure_layout(cols, rows);

            let mut lines = Vec::with_capacity(rows as usize);
            for row in 0..rows {
                let mut spans: Vec<Span> = Vec::with_capacity(cols as usize);
                for col in 0..cols {
                    let cell = app.surface.get(col, row);
                    spans.push(Span::styled(
                        cell.ch.to_string(),
                        Style::default().fg(color_for(cell.color)),
                    ));
                }
                lines.push(Line::from(spans));
            }
            let cloud = Paragraph::new(lines)
                .block(Block::default().borders(Borders::ALL).title("Word cloud"));
            frame.render_widget(cloud, chunks[1]);

            let footer = Paragraph::new(format!(
                "input: {} | Enter: respond | q: quit | {}",
                app.input, app.status,
            ))
            .block(Block::default().borders(Borders::ALL).title("Respond"));
            frame.render_widget(footer, chunks[2]);
        })?;

        std::thread::sleep(Duration::from_millis(33));
    }
}

fn shutdown_terminal(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<(), Box<dyn Error>> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

struct App {
    responses: Vec<String>,
    words: Vec<Word>,
    surface: CellSurface,
    input: String,
    status: String,
    placed_count: usize,
    skipped_count: usize,
    dirty: bool,
    last_poll: Instant,
    rng: StdRng,
}

impl App {
    fn new() -> Self {
        let mut app = Self {
            responses: Vec::new(),
            words: Vec::new(),
            surface: CellSurface::new(0, 0),
            input: String::new(),
            status: String::new(),
            placed_count: 0,
            skipped_count: 0,
            dirty: true,
            last_poll: Instant::now(),
            rng: StdRng::from_entropy(),
        };
        // Seed the round so the first frame already shows a cloud.
        for _ in 0..8 {
            let word = weighted_pick(&mut app.rng);
            app.responses.push(word.to_string());
        }
        app
    }

    fn submit_input(&mut self) {
        let raw = std::mem::take(&mut self.input);
        match core::normalize_word(&raw) {
            Some(word) => {
                self.status = format!("you said \"{word}\"");
                self.responses.push(word);
                self.dirty = true;
            }
            None => {
                self.status = "one word only (letters, digits, - or _)".to_string();
            }
        }
    }

    fn poll_feed(&mut self) {
        let batch = self.rng.gen_range(1..=config::FEED_BATCH_MAX);
        for _ in 0..batch {
            let word = weighted_pick(&mut self.rng);
            self.responses.push(word.to_string());
        }
        self.last_poll = Instant::now();
        self.dirty = true;
    }

    /// Re-runs the full pipeline when the word list or the viewport changed.
    /// Each pass fully replaces the previous render.
    fn ensure_layout(&mut self, cols: u16, rows: u16) {
        if self.surface.cols() != cols || self.surface.rows() != rows {
            self.surface.resize(cols, rows);
            self.dirty = true;
        }
        if !self.dirty {
            return;
        }

        self.words = core::tally(&self.responses);
        let outcome = core::layout(
            &self.words,
            self.surface.px_width(),
            self.surface.px_height(),
            &self.surface,
        )
        .and_then(|glyphs| {
            render::render(&glyphs, &mut self.surface)?;
            Ok(glyphs.len())
        });

        match outcome {
            Ok(placed) => {
                self.placed_count = placed;
                self.skipped_count = self.words.len() - placed;
                self.dirty = false;
            }
            Err(err) => {
                // Keep the dirty flag so the next frame retries.
                log::warn!("word cloud pass failed: {err}");
                self.status = format!("cloud unavailable: {err}");
            }
        }
    }
}

fn weighted_pick(rng: &mut StdRng) -> &'static str {
    let total: u32 = FEED_VOCABULARY.iter().map(|(_, weight)| weight).sum();
    let mut roll = rng.gen_range(0..total);
    for (word, weight) in FEED_VOCABULARY {
        if roll < *weight {
            return word;
        }
        roll -= weight;
    }
    FEED_VOCABULARY[0].0
}

fn color_for(color: Rgb) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}
