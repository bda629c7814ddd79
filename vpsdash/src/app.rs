//! App state and main loop: input handling, shipping requests, applying replies, and drawing.

use std::{io, time::Instant};

use crossterm::{
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures_util::StreamExt;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use tokio::sync::mpsc;

use crate::api::{ApiClient, Reply};
use crate::command::{Command, Tab};
use crate::dashboard::Dashboard;
use crate::screen::Screen;
use crate::types::ServiceAction;
use crate::ui::{
    downloads::draw_downloads,
    footer::{draw_footer, Prompt},
    header::{draw_header, draw_tabs},
    services::draw_services,
    stats::draw_stats,
    tasks::draw_tasks,
};

#[derive(Debug, Clone, PartialEq)]
enum Pending {
    Task { id: String, title: String },
    Download { id: String, filename: String },
}

#[derive(Debug, Clone, PartialEq)]
enum Mode {
    Normal,
    AddTask,
    AddDownload,
    Confirm(Pending),
}

pub struct App {
    dashboard: Dashboard,
    screen: Screen,
    mode: Mode,
    // per-tab row selection
    selected: [usize; 3],
    host: String,
    should_quit: bool,
}

impl App {
    pub fn new(dashboard: Dashboard, host: impl Into<String>) -> Self {
        Self {
            dashboard,
            screen: Screen::new(),
            mode: Mode::Normal,
            selected: [0; 3],
            host: host.into(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self, api: ApiClient) -> anyhow::Result<()> {
        // Terminal setup
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        // Main loop
        let res = self.event_loop(&mut terminal, api).await;

        // Teardown
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        res
    }

    async fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        api: ApiClient,
    ) -> anyhow::Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Reply>();
        let mut events = EventStream::new();
        self.dashboard.start(&mut self.screen, Instant::now());

        loop {
            self.ship_requests(&api, &tx);
            terminal.draw(|f| self.draw(f))?;
            if self.should_quit {
                break;
            }

            let deadline = self.dashboard.next_deadline();
            let timer = async move {
                match deadline {
                    Some(at) => tokio::time::sleep_until(at.into()).await,
                    None => std::future::pending::<()>().await,
                }
            };

            tokio::select! {
                ev = events.next() => match ev {
                    Some(Ok(Event::Key(k))) if k.kind == KeyEventKind::Press => {
                        self.handle_key(k, Instant::now());
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                    None => break,
                },
                Some(reply) = rx.recv() => {
                    self.dashboard.on_reply(reply, &mut self.screen, Instant::now());
                }
                _ = timer => {
                    self.dashboard.fire_due(&mut self.screen, Instant::now());
                }
            }
        }

        self.dashboard.stop();
        Ok(())
    }

    // Every request runs on its own task; the reply comes back through the channel.
    fn ship_requests(&mut self, api: &ApiClient, tx: &mpsc::UnboundedSender<Reply>) {
        for req in self.dashboard.take_requests() {
            let api = api.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let reply = api.execute(req).await;
                if tx.send(reply).is_err() {
                    tracing::debug!("reply dropped; app is shutting down");
                }
            });
        }
    }

    fn dispatch(&mut self, cmd: Command, now: Instant) {
        self.dashboard.dispatch(cmd, &mut self.screen, now);
    }

    fn rows(&self, tab: Tab) -> usize {
        match tab {
            Tab::Dashboard => self.screen.services.len(),
            Tab::Tasks => self.screen.tasks.len(),
            Tab::Downloads => self.screen.downloads.len(),
        }
    }

    fn selection(&self, tab: Tab) -> usize {
        let i = tab as usize;
        self.selected[i].min(self.rows(tab).saturating_sub(1))
    }

    fn move_selection(&mut self, up: bool) {
        let tab = self.dashboard.tab();
        let cur = self.selection(tab);
        let last = self.rows(tab).saturating_sub(1);
        self.selected[tab as usize] = if up { cur.saturating_sub(1) } else { (cur + 1).min(last) };
    }

    pub fn handle_key(&mut self, k: KeyEvent, now: Instant) {
        if k.modifiers.contains(KeyModifiers::CONTROL) && k.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        match self.mode.clone() {
            Mode::Normal => self.normal_key(k, now),
            Mode::AddTask => self.task_input_key(k, now),
            Mode::AddDownload => self.download_input_key(k, now),
            Mode::Confirm(pending) => {
                self.mode = Mode::Normal;
                if matches!(k.code, KeyCode::Char('y') | KeyCode::Char('Y')) {
                    let cmd = match pending {
                        Pending::Task { id, .. } => Command::DeleteTask(id),
                        Pending::Download { id, .. } => Command::DeleteDownload(id),
                    };
                    self.dispatch(cmd, now);
                }
            }
        }
    }

    fn normal_key(&mut self, k: KeyEvent, now: Instant) {
        let tab = self.dashboard.tab();
        match k.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('1') => self.dispatch(Command::SwitchTab(Tab::Dashboard), now),
            KeyCode::Char('2') => self.dispatch(Command::SwitchTab(Tab::Tasks), now),
            KeyCode::Char('3') => self.dispatch(Command::SwitchTab(Tab::Downloads), now),
            KeyCode::Tab => self.dispatch(Command::SwitchTab(tab.next()), now),
            KeyCode::Char('r') => self.dispatch(Command::Refresh, now),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(true),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(false),
            code => match tab {
                Tab::Dashboard => self.dashboard_key(code, now),
                Tab::Tasks => self.tasks_key(code, now),
                Tab::Downloads => self.downloads_key(code, now),
            },
        }
    }

    fn dashboard_key(&mut self, code: KeyCode, now: Instant) {
        let Some(card) = self.screen.services.get(self.selection(Tab::Dashboard)) else {
            return;
        };
        let action = match code {
            KeyCode::Char('s') | KeyCode::Enter => card.primary,
            KeyCode::Char('R') => ServiceAction::Restart,
            _ => return,
        };
        let service = card.id.clone();
        self.dispatch(Command::ServiceAction { service, action }, now);
    }

    fn tasks_key(&mut self, code: KeyCode, now: Instant) {
        let row = self.screen.tasks.get(self.selection(Tab::Tasks));
        match code {
            KeyCode::Char('a') => self.mode = Mode::AddTask,
            KeyCode::Char('f') => {
                let next = self.dashboard.tasks().filter().next();
                self.dispatch(Command::SetTaskFilter(next), now);
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                if let Some(id) = row.map(|t| t.id.clone()) {
                    self.dispatch(Command::ToggleTask(id), now);
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(t) = row {
                    self.mode = Mode::Confirm(Pending::Task {
                        id: t.id.clone(),
                        title: t.title.clone(),
                    });
                }
            }
            _ => {}
        }
    }

    fn downloads_key(&mut self, code: KeyCode, now: Instant) {
        let row = self.screen.downloads.get(self.selection(Tab::Downloads));
        match code {
            KeyCode::Char('a') => self.mode = Mode::AddDownload,
            KeyCode::Char('o') => {
                if let Some(id) = row.map(|d| d.id.clone()) {
                    self.dispatch(Command::SaveArtifact(id), now);
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(d) = row {
                    self.mode = Mode::Confirm(Pending::Download {
                        id: d.id.clone(),
                        filename: d.filename.clone(),
                    });
                }
            }
            _ => {}
        }
    }

    fn task_input_key(&mut self, k: KeyEvent, now: Instant) {
        let form = &mut self.screen.task_form;
        match k.code {
            KeyCode::Esc => self.mode = Mode::Normal,
            KeyCode::Enter => {
                let task = form.to_new_task();
                self.mode = Mode::Normal;
                self.dispatch(Command::CreateTask(task), now);
            }
            KeyCode::Tab => form.priority = form.priority.next(),
            KeyCode::Up => form.prev_category(),
            KeyCode::Down => form.next_category(),
            KeyCode::Backspace => {
                form.title.pop();
            }
            KeyCode::Char(c) => form.title.push(c),
            _ => {}
        }
    }

    fn download_input_key(&mut self, k: KeyEvent, now: Instant) {
        match k.code {
            KeyCode::Esc => self.mode = Mode::Normal,
            KeyCode::Enter => {
                let url = self.screen.download_url.clone();
                self.mode = Mode::Normal;
                self.dispatch(Command::CreateDownload(url), now);
            }
            KeyCode::Backspace => {
                self.screen.download_url.pop();
            }
            KeyCode::Char(c) => self.screen.download_url.push(c),
            _ => {}
        }
    }

    fn prompt(&self) -> Option<Prompt<'_>> {
        match &self.mode {
            Mode::Normal => None,
            Mode::AddTask => Some(Prompt::AddTask(&self.screen.task_form)),
            Mode::AddDownload => Some(Prompt::AddDownload(&self.screen.download_url)),
            Mode::Confirm(Pending::Task { title, .. }) => Some(Prompt::Confirm(title)),
            Mode::Confirm(Pending::Download { filename, .. }) => Some(Prompt::Confirm(filename)),
        }
    }

    pub fn draw(&self, f: &mut ratatui::Frame<'_>) {
        let area = f.area();
        let tab = self.dashboard.tab();

        // Root rows: header, tabs, body, footer
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(2),
                Constraint::Min(5),
                Constraint::Length(2),
            ])
            .split(area);

        draw_header(f, rows[0], &self.host, &self.screen);
        draw_tabs(f, rows[1], tab);

        match tab {
            Tab::Dashboard => {
                let body = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Length(3), Constraint::Min(4)])
                    .split(rows[2]);
                draw_stats(f, body[0], self.screen.stats.as_ref());
                draw_services(f, body[1], &self.screen.services, self.selection(tab));
            }
            Tab::Tasks => draw_tasks(
                f,
                rows[2],
                &self.screen.tasks,
                self.dashboard.tasks().filter(),
                self.screen.task_summary.as_deref(),
                self.selection(tab),
            ),
            Tab::Downloads => {
                draw_downloads(f, rows[2], &self.screen.downloads, self.selection(tab));
            }
        }

        draw_footer(f, rows[3], tab, self.prompt(), self.dashboard.notifier().current());
    }
}
