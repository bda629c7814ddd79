//! Rendering seam between the stores and whatever draws them.
//!
//! Implementations only read the values handed to them; the stores keep
//! ownership of every snapshot.

use chrono::{DateTime, Local};

use crate::types::{DownloadJob, Service, SystemStats, TaskItem, TaskStats};

pub trait Renderer {
    fn system_stats(&mut self, stats: &SystemStats);
    fn services(&mut self, services: &[Service]);
    /// Battery/uptime header; receiving it also means the API is reachable.
    fn header(&mut self, battery: Option<i64>, uptime: Option<&str>);
    fn last_updated(&mut self, at: DateTime<Local>);
    fn offline(&mut self);

    fn tasks(&mut self, tasks: &[TaskItem]);
    fn task_stats(&mut self, stats: &TaskStats);
    fn clear_task_input(&mut self);

    fn downloads(&mut self, jobs: &[DownloadJob]);
    fn clear_download_input(&mut self);
}

#[cfg(test)]
pub(crate) mod recording {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        SystemStats(SystemStats),
        Services(Vec<Service>),
        Header(Option<i64>, Option<String>),
        LastUpdated,
        Offline,
        Tasks(Vec<TaskItem>),
        TaskStats(TaskStats),
        ClearTaskInput,
        Downloads(Vec<DownloadJob>),
        ClearDownloadInput,
    }

    /// Renderer that records every call for assertions.
    #[derive(Debug, Default)]
    pub struct Recorder {
        pub calls: Vec<Call>,
    }

    impl Recorder {
        pub fn task_renders(&self) -> Vec<&Vec<TaskItem>> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    Call::Tasks(t) => Some(t),
                    _ => None,
                })
                .collect()
        }

        pub fn last_tasks(&self) -> Option<&Vec<TaskItem>> {
            self.task_renders().last().copied()
        }

        pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
            self.calls.iter().filter(|c| pred(c)).count()
        }
    }

    impl Renderer for Recorder {
        fn system_stats(&mut self, stats: &SystemStats) {
            self.calls.push(Call::SystemStats(stats.clone()));
        }
        fn services(&mut self, services: &[Service]) {
            self.calls.push(Call::Services(services.to_vec()));
        }
        fn header(&mut self, battery: Option<i64>, uptime: Option<&str>) {
            self.calls
                .push(Call::Header(battery, uptime.map(str::to_string)));
        }
        fn last_updated(&mut self, _at: DateTime<Local>) {
            self.calls.push(Call::LastUpdated);
        }
        fn offline(&mut self) {
            self.calls.push(Call::Offline);
        }
        fn tasks(&mut self, tasks: &[TaskItem]) {
            self.calls.push(Call::Tasks(tasks.to_vec()));
        }
        fn task_stats(&mut self, stats: &TaskStats) {
            self.calls.push(Call::TaskStats(stats.clone()));
        }
        fn clear_task_input(&mut self) {
            self.calls.push(Call::ClearTaskInput);
        }
        fn downloads(&mut self, jobs: &[DownloadJob]) {
            self.calls.push(Call::Downloads(jobs.to_vec()));
        }
        fn clear_download_input(&mut self) {
            self.calls.push(Call::ClearDownloadInput);
        }
    }
}
