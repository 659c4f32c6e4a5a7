use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use pricebook::{format_price, CatalogEntry};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;

const PAGE_SIZE: usize = 20;

pub struct App {
    pub entries: Vec<CatalogEntry>,
    pub state: TableState,
    pub source: String,
}

impl App {
    pub fn new(entries: Vec<CatalogEntry>, source: String) -> Self {
        let mut state = TableState::default();
        if !entries.is_empty() {
            state.select(Some(0));
        }

        Self {
            entries,
            state,
            source,
        }
    }

    pub fn selected_entry(&self) -> Option<&CatalogEntry> {
        self.state.selected().and_then(|i| self.entries.get(i))
    }

    pub fn next(&mut self) {
        let len = self.entries.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i >= len - 1 => 0,
            Some(i) => i + 1,
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.entries.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) => len - 1,
            Some(i) => i - 1,
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn page_down(&mut self) {
        let len = self.entries.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => (i + PAGE_SIZE).min(len - 1),
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn page_up(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        let i = self.state.selected().map(|i| i.saturating_sub(PAGE_SIZE)).unwrap_or(0);
        self.state.select(Some(i));
    }

    pub fn first(&mut self) {
        if !self.entries.is_empty() {
            self.state.select(Some(0));
        }
    }

    pub fn last(&mut self) {
        if !self.entries.is_empty() {
            self.state.select(Some(self.entries.len() - 1));
        }
    }

    pub fn total_value(&self) -> f64 {
        self.entries.iter().map(|e| e.price).sum()
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res?;
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::PageDown => app.page_down(),
                KeyCode::PageUp => app.page_up(),
                KeyCode::Home => app.first(),
                KeyCode::End => app.last(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Price table
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_table(f, chunks[0], app);
    render_status_bar(f, chunks[1], app);
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["ID", "Name", "Price"].iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.entries.iter().map(|entry| {
        let cells = vec![
            Cell::from(entry.id.clone()),
            Cell::from(truncate(&entry.name, 40)),
            Cell::from(format_price(entry.price)).style(Style::default().fg(Color::Green)),
        ];
        Row::new(cells).height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Length(42),
            Constraint::Length(14),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(format!(" Prices - {} ", app.source)),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);
    let total = app.entries.len();

    let status_spans = vec![
        Span::styled(
            format!(" Row: {}/{} ", selected, total),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(" | "),
        Span::styled(
            format!("Sum: {:.2}", app.total_value()),
            Style::default().fg(Color::Green),
        ),
        Span::raw(" | "),
        Span::styled("↑/↓", Style::default().fg(Color::Yellow)),
        Span::raw(" Nav | "),
        Span::styled("PgUp/PgDn", Style::default().fg(Color::Yellow)),
        Span::raw(" Fast | "),
        Span::styled("q", Style::default().fg(Color::Red)),
        Span::raw(" Quit"),
    ];

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
