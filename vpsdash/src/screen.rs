//! Terminal-side view state. Each render call turns the payload it receives
//! into display rows, and the `ui` panels draw only from those rows.

use chrono::{DateTime, Local};

use crate::render::Renderer;
use crate::types::{
    DownloadJob, DownloadStatus, NewTask, Priority, Service, ServiceAction, SystemStats, TaskItem,
    TaskStats, CATEGORIES,
};
use crate::ui::util::{format_bytes, percent_label, service_label, truncate_end};

#[derive(Debug, Clone, PartialEq)]
pub struct GaugeView {
    pub label: String,
    pub ratio: f64,
}

impl GaugeView {
    fn of(percent: f64) -> Self {
        Self {
            label: percent_label(percent),
            ratio: (percent / 100.0).clamp(0.0, 1.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatsView {
    pub cpu: GaugeView,
    pub memory: GaugeView,
    pub disk: GaugeView,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceCard {
    pub id: String,
    pub label: &'static str,
    pub name: String,
    pub running: bool,
    pub status: &'static str,
    pub port: String,
    /// Start or Stop, whichever applies; Restart is always offered too.
    pub primary: ServiceAction,
}

impl ServiceCard {
    fn of(s: &Service) -> Self {
        Self {
            id: s.id.clone(),
            label: service_label(&s.id),
            name: s.name.clone(),
            running: s.running,
            status: if s.running { "Running" } else { "Stopped" },
            port: format!(":{}", s.port),
            primary: if s.running {
                ServiceAction::Stop
            } else {
                ServiceAction::Start
            },
        }
    }

    pub fn primary_label(&self) -> &'static str {
        match self.primary {
            ServiceAction::Stop => "Stop",
            _ => "Start",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskRow {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub priority: Priority,
    pub category: String,
    pub category_color: Option<String>,
}

impl TaskRow {
    fn of(t: &TaskItem) -> Self {
        Self {
            id: t.id.clone(),
            title: t.title.clone(),
            description: t.description.clone().filter(|d| !d.is_empty()),
            completed: t.completed,
            priority: t.priority,
            category: t
                .category_name
                .clone()
                .or_else(|| t.category.clone())
                .unwrap_or_default(),
            category_color: t.category_color.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DownloadRow {
    pub id: String,
    pub status: DownloadStatus,
    pub filename: String,
    pub url: String,
    pub progress: u8,
    /// Progress, final size or error, depending on status.
    pub detail: String,
}

impl DownloadRow {
    fn of(j: &DownloadJob) -> Self {
        let detail = match j.status {
            DownloadStatus::Downloading => format!(
                "{}% - {} / {}",
                j.progress,
                format_bytes(j.downloaded),
                format_bytes(j.size)
            ),
            DownloadStatus::Completed => format_bytes(j.size),
            DownloadStatus::Failed => {
                format!("Error: {}", j.error.as_deref().unwrap_or("unknown"))
            }
            DownloadStatus::Queued => String::new(),
        };
        Self {
            id: j.id.clone(),
            status: j.status,
            filename: j.filename.clone(),
            url: truncate_end(&j.url, 60),
            progress: j.progress,
            detail,
        }
    }
}

/// The add-task form: title text plus cycled priority and category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskForm {
    pub title: String,
    pub priority: Priority,
    category: usize,
}

impl TaskForm {
    pub fn category(&self) -> &'static str {
        CATEGORIES[self.category % CATEGORIES.len()]
    }

    pub fn next_category(&mut self) {
        self.category = (self.category + 1) % CATEGORIES.len();
    }

    pub fn prev_category(&mut self) {
        self.category = (self.category + CATEGORIES.len() - 1) % CATEGORIES.len();
    }

    pub fn to_new_task(&self) -> NewTask {
        NewTask {
            title: self.title.clone(),
            priority: self.priority,
            category: self.category().to_string(),
        }
    }
}

#[derive(Debug, Default)]
pub struct Screen {
    pub stats: Option<StatsView>,
    pub services: Vec<ServiceCard>,
    pub battery: String,
    pub uptime: String,
    pub online: Option<bool>,
    pub last_updated: Option<String>,
    pub tasks: Vec<TaskRow>,
    pub task_summary: Option<String>,
    pub downloads: Vec<DownloadRow>,
    pub task_form: TaskForm,
    pub download_url: String,
}

impl Screen {
    pub fn new() -> Self {
        Self {
            battery: "--".into(),
            uptime: "--".into(),
            ..Self::default()
        }
    }
}

impl Renderer for Screen {
    fn system_stats(&mut self, stats: &SystemStats) {
        self.stats = Some(StatsView {
            cpu: GaugeView::of(stats.cpu_percent),
            memory: GaugeView::of(stats.memory_percent),
            disk: GaugeView::of(stats.disk_percent),
        });
    }

    fn services(&mut self, services: &[Service]) {
        self.services = services.iter().map(ServiceCard::of).collect();
    }

    fn header(&mut self, battery: Option<i64>, uptime: Option<&str>) {
        self.online = Some(true);
        self.battery = battery.map_or_else(|| "--".into(), |b| format!("{b}%"));
        self.uptime = uptime.filter(|u| !u.is_empty()).unwrap_or("--").to_string();
    }

    fn last_updated(&mut self, at: DateTime<Local>) {
        self.last_updated = Some(at.format("%H:%M:%S").to_string());
    }

    fn offline(&mut self) {
        self.online = Some(false);
    }

    fn tasks(&mut self, tasks: &[TaskItem]) {
        self.tasks = tasks.iter().map(TaskRow::of).collect();
    }

    fn task_stats(&mut self, stats: &TaskStats) {
        self.task_summary = Some(format!(
            "{} active | {} done | {} total | {}% complete",
            stats.active, stats.completed, stats.total, stats.completion_rate
        ));
    }

    fn clear_task_input(&mut self) {
        self.task_form.title.clear();
    }

    fn downloads(&mut self, jobs: &[DownloadJob]) {
        self.downloads = jobs.iter().map(DownloadRow::of).collect();
    }

    fn clear_download_input(&mut self) {
        self.download_url.clear();
    }
}
