use std::time::Duration;

use anyhow::Result;
use crossterm::{event::{self, Event, KeyCode, KeyEventKind}, execute, terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen}};
use ratatui::{backend::CrosstermBackend, Terminal, widgets::{Block, Borders, List, ListItem, ListState, Paragraph}, layout::{Constraint, Direction, Layout}, style::{Color, Modifier, Style}};

use todo_api::{
    application::{show_service::{PlainShowService, ShowService}, todo_service::{TodoService, TodoServiceImpl}},
    config::{Config, StoreConfig},
    domain::{repository::TodoRepository, todo::{Todo, TodoPayload}},
    infrastructure::{memory_repo::InMemoryTodoRepository, sqlite_repo::SqliteTodoRepository},
};

type Term = Terminal<CrosstermBackend<std::io::Stdout>>;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let config = Config::from_env()?;
    match &config.store {
        StoreConfig::Memory => start(InMemoryTodoRepository::new()).await,
        StoreConfig::Sqlite(url) => start(SqliteTodoRepository::connect(url).await?).await,
    }
}

async fn start<R: TodoRepository>(repo: R) -> Result<()> {
    repo.init().await?;
    let service = TodoServiceImpl::new(repo);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let res = App::new(service, PlainShowService).run(&mut terminal).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    res
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode { View, Create, Rename }

#[derive(Clone, Copy, PartialEq, Eq)]
enum Filter { All, Open, Completed }

impl Filter {
    fn next(self) -> Self {
        match self { Filter::All => Filter::Open, Filter::Open => Filter::Completed, Filter::Completed => Filter::All }
    }

    fn label(self) -> &'static str {
        match self { Filter::All => "all", Filter::Open => "open", Filter::Completed => "completed" }
    }

    fn keeps(self, todo: &Todo) -> bool {
        match self { Filter::All => true, Filter::Open => !todo.completed, Filter::Completed => todo.completed }
    }
}

struct App<S: TodoService, V: ShowService> {
    service: S,
    show: V,
    todos: Vec<Todo>,
    visible: Vec<usize>,
    list_state: ListState,
    mode: Mode,
    filter: Filter,
    draft: String,
    status: String,
}

impl<S: TodoService, V: ShowService> App<S, V> {
    fn new(service: S, show: V) -> Self {
        Self { service, show, todos: Vec::new(), visible: Vec::new(), list_state: ListState::default(), mode: Mode::View, filter: Filter::All, draft: String::new(), status: String::new() }
    }

    async fn reload(&mut self) -> Result<()> {
        self.todos = self.service.list().await?;
        self.visible = self.todos.iter().enumerate().filter(|(_, t)| self.filter.keeps(t)).map(|(i, _)| i).collect();
        let selected = match (self.visible.len(), self.list_state.selected()) {
            (0, _) => None,
            (len, Some(i)) => Some(i.min(len - 1)),
            (_, None) => Some(0),
        };
        self.list_state.select(selected);
        Ok(())
    }

    fn selected(&self) -> Option<&Todo> {
        self.list_state.selected().and_then(|i| self.visible.get(i)).and_then(|&idx| self.todos.get(idx))
    }

    fn step(&mut self, down: bool) {
        let len = self.visible.len();
        if len == 0 { return; }
        let i = self.list_state.selected().unwrap_or(0);
        let next = if down { (i + 1).min(len - 1) } else { i.saturating_sub(1) };
        self.list_state.select(Some(next));
    }

    /// Sends a full payload for the selected todo, as the HTTP PATCH does.
    async fn rewrite_selected(&mut self, edit: impl FnOnce(&mut TodoPayload)) {
        let Some(todo) = self.selected().cloned() else { return };
        let mut payload = TodoPayload { title: todo.title, completed: Some(todo.completed), order: Some(todo.order) };
        edit(&mut payload);
        self.status = match self.service.update(todo.id, payload).await {
            Ok(t) => format!("updated {}", self.show.show(&t)),
            Err(e) => e.to_string(),
        };
    }

    async fn run(mut self, terminal: &mut Term) -> Result<()> {
        self.reload().await?;
        loop {
            terminal.draw(|f| self.draw(f))?;

            if !event::poll(Duration::from_millis(200))? { continue; }
            let Event::Key(key) = event::read()? else { continue };
            if key.kind != KeyEventKind::Press { continue; }

            match self.mode {
                Mode::View => match key.code {
                    KeyCode::Char('q') => break,
                    KeyCode::Up => self.step(false),
                    KeyCode::Down => self.step(true),
                    KeyCode::Enter => self.rewrite_selected(|p| p.completed = p.completed.map(|done| !done)).await,
                    KeyCode::Char('n') => { self.mode = Mode::Create; self.draft.clear(); }
                    KeyCode::Char('e') => {
                        if let Some(title) = self.selected().map(|t| t.title.clone()) {
                            self.draft = title;
                            self.mode = Mode::Rename;
                        }
                    }
                    KeyCode::Char('d') => {
                        if let Some(id) = self.selected().map(|t| t.id) {
                            self.status = match self.service.delete(id).await {
                                Ok(()) => format!("deleted #{id}"),
                                Err(e) => e.to_string(),
                            };
                        }
                    }
                    KeyCode::Char('f') => { self.filter = self.filter.next(); self.list_state.select(None); }
                    _ => {}
                },
                Mode::Create | Mode::Rename => match key.code {
                    KeyCode::Esc => { self.mode = Mode::View; self.draft.clear(); }
                    KeyCode::Enter => {
                        let title = self.draft.trim().to_string();
                        if self.mode == Mode::Create {
                            let payload = TodoPayload { title, ..Default::default() };
                            self.status = match self.service.create(payload).await {
                                Ok(t) => format!("created {}", self.show.show(&t)),
                                Err(e) => e.to_string(),
                            };
                        } else {
                            self.rewrite_selected(|p| p.title = title).await;
                        }
                        self.mode = Mode::View;
                        self.draft.clear();
                    }
                    KeyCode::Backspace => { self.draft.pop(); }
                    KeyCode::Char(c) => self.draft.push(c),
                    _ => {}
                },
            }
            self.reload().await?;
        }
        Ok(())
    }

    fn draw(&mut self, f: &mut ratatui::Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(1), Constraint::Length(3)])
            .split(f.size());

        let header = Paragraph::new("Enter: toggle  n: new  e: rename  d: delete  f: filter  q: quit")
            .block(Block::default().borders(Borders::ALL).title("todos"));
        f.render_widget(header, chunks[0]);

        let items: Vec<ListItem> = self.visible.iter()
            .filter_map(|&idx| self.todos.get(idx))
            .map(|t| ListItem::new(self.show.show(t)))
            .collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(format!("items [{}]", self.filter.label())))
            .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD | Modifier::REVERSED))
            .highlight_symbol(">> ");
        f.render_stateful_widget(list, chunks[1], &mut self.list_state);

        let (title, text) = match self.mode {
            Mode::View => ("status", self.status.clone()),
            Mode::Create => ("new", format!("title: {}_  (Enter to save, Esc to cancel)", self.draft)),
            Mode::Rename => ("rename", format!("title: {}_  (Enter to save, Esc to cancel)", self.draft)),
        };
        f.render_widget(Paragraph::new(text).block(Block::default().borders(Borders::ALL).title(title)), chunks[2]);
    }
}
