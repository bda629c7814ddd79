//! Typed commands produced by input and timers, and the outbox that collects
//! requests for the event loop to execute.

use crate::api::Request;
use crate::types::{NewTask, ServiceAction, TaskFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Dashboard,
    Tasks,
    Downloads,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Dashboard, Tab::Tasks, Tab::Downloads];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Tasks => "Tasks",
            Tab::Downloads => "Downloads",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Tab::Dashboard => Tab::Tasks,
            Tab::Tasks => Tab::Downloads,
            Tab::Downloads => Tab::Dashboard,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Fixed-interval tick; polls only while the dashboard tab is shown.
    DashboardTick,
    PollStatus,
    /// Operator-requested refresh of the current tab.
    Refresh,
    SwitchTab(Tab),
    ServiceAction {
        service: String,
        action: ServiceAction,
    },
    SetTaskFilter(TaskFilter),
    CreateTask(NewTask),
    ToggleTask(String),
    /// Already confirmed by the operator.
    DeleteTask(String),
    RefreshDownloads,
    CreateDownload(String),
    /// Already confirmed by the operator.
    DeleteDownload(String),
    SaveArtifact(String),
}

#[derive(Debug, Default)]
pub struct Outbox {
    pending: Vec<Request>,
}

impl Outbox {
    pub fn push(&mut self, req: Request) {
        self.pending.push(req);
    }

    pub fn drain(&mut self) -> Vec<Request> {
        std::mem::take(&mut self.pending)
    }

    pub fn pending(&self) -> &[Request] {
        &self.pending
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
