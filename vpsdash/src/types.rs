//! Types that mirror the dashboard API's JSON schema.

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct SystemStats {
    #[serde(default)]
    pub cpu_percent: f64,
    #[serde(default)]
    pub memory_percent: f64,
    #[serde(default)]
    pub disk_percent: f64,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Battery {
    pub percentage: Option<i64>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Service {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub running: bool,
    #[serde(default)]
    pub port: u16,
}

/// Full snapshot returned by `GET /api/status`; replaces the previous one wholesale.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct StatusResponse {
    #[serde(default)]
    pub system: SystemStats,
    #[serde(default)]
    pub services: Vec<Service>,
    pub battery: Option<Battery>,
    pub uptime: Option<String>,
}

impl StatusResponse {
    pub fn battery_percentage(&self) -> Option<i64> {
        self.battery.as_ref().and_then(|b| b.percentage)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Priority::Low => Priority::Medium,
            Priority::Medium => Priority::High,
            Priority::High => Priority::Low,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskItem {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub category_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct TaskStats {
    pub active: u64,
    pub completed: u64,
    pub total: u64,
    pub completion_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl TaskFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskFilter::All => "all",
            TaskFilter::Active => "active",
            TaskFilter::Completed => "completed",
        }
    }

    pub fn next(self) -> Self {
        match self {
            TaskFilter::All => TaskFilter::Active,
            TaskFilter::Active => TaskFilter::Completed,
            TaskFilter::Completed => TaskFilter::All,
        }
    }
}

// Default category ids seeded by the server.
pub const CATEGORIES: [&str; 5] = ["work", "personal", "shopping", "health", "other"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTask {
    pub title: String,
    pub priority: Priority,
    pub category: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadStatus {
    Queued,
    Downloading,
    Completed,
    Failed,
}

impl DownloadStatus {
    pub fn is_active(self) -> bool {
        matches!(self, DownloadStatus::Queued | DownloadStatus::Downloading)
    }

    pub fn label(self) -> &'static str {
        match self {
            DownloadStatus::Queued => "Queued",
            DownloadStatus::Downloading => "Downloading",
            DownloadStatus::Completed => "Completed",
            DownloadStatus::Failed => "Failed",
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DownloadJob {
    pub id: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub url: String,
    pub status: DownloadStatus,
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub downloaded: u64,
    #[serde(default)]
    pub size: u64,
    pub error: Option<String>,
    pub created_at: Option<String>,
    pub completed_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewDownload {
    pub url: String,
}

/// Acknowledgement returned by every mutating endpoint.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Ack {
    #[serde(default)]
    pub success: bool,
    pub id: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceAction {
    Start,
    Stop,
    Restart,
}

impl ServiceAction {
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceAction::Start => "start",
            ServiceAction::Stop => "stop",
            ServiceAction::Restart => "restart",
        }
    }

    pub fn progressive(self) -> &'static str {
        match self {
            ServiceAction::Start => "Starting",
            ServiceAction::Stop => "Stopping",
            ServiceAction::Restart => "Restarting",
        }
    }

    pub fn past(self) -> &'static str {
        match self {
            ServiceAction::Start => "started",
            ServiceAction::Stop => "stopped",
            ServiceAction::Restart => "restarted",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_tolerates_missing_battery_and_uptime() {
        let s: StatusResponse = serde_json::from_str(
            r#"{"system":{"cpu_percent":42.7,"memory_percent":60,"disk_percent":10},
                "services":[{"id":"ssh","name":"SSH Server","running":true,"port":22}]}"#,
        )
        .unwrap();
        assert_eq!(s.services.len(), 1);
        assert_eq!(s.battery_percentage(), None);
        assert!(s.uptime.is_none());
        assert!((s.system.cpu_percent - 42.7).abs() < f64::EPSILON);
    }

    #[test]
    fn battery_with_null_percentage() {
        let s: StatusResponse =
            serde_json::from_str(r#"{"battery":{"percentage":null,"status":"Unknown"}}"#).unwrap();
        assert_eq!(s.battery_percentage(), None);
    }

    #[test]
    fn task_item_accepts_server_extras() {
        let t: TaskItem = serde_json::from_str(
            r##"{"id":"a1","title":"buy milk","description":"","completed":false,
                "priority":"high","category":"shopping","due_date":null,
                "created_at":"2024-01-01 10:00:00","completed_at":null,"position":3,
                "category_name":"Shopping","category_color":"#f59e0b","category_icon":"x"}"##,
        )
        .unwrap();
        assert_eq!(t.priority, Priority::High);
        assert_eq!(t.position, Some(3));
        assert_eq!(t.category_name.as_deref(), Some("Shopping"));
    }

    #[test]
    fn download_status_activity() {
        assert!(DownloadStatus::Queued.is_active());
        assert!(DownloadStatus::Downloading.is_active());
        assert!(!DownloadStatus::Completed.is_active());
        assert!(!DownloadStatus::Failed.is_active());
    }
}
