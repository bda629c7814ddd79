//! Owns every store plus the scheduler, notifier and outbox, and routes
//! commands and replies to whichever component owns them.

use std::path::PathBuf;
use std::time::Instant;

use crate::api::{Reply, Request};
use crate::command::{Command, Outbox, Tab};
use crate::config::Timings;
use crate::notifier::Notifier;
use crate::render::Renderer;
use crate::scheduler::{Scheduler, TimerHandle};
use crate::stores::downloads::DownloadStore;
use crate::stores::service::ServiceController;
use crate::stores::status::StatusPoller;
use crate::stores::tasks::TaskStore;
use crate::stores::Ctx;

// Field-level borrows so a store and the context can be borrowed together.
macro_rules! cx {
    ($self:ident, $renderer:ident, $now:ident) => {
        &mut Ctx {
            outbox: &mut $self.outbox,
            notifier: &mut $self.notifier,
            scheduler: &mut $self.scheduler,
            renderer: &mut *$renderer,
            now: $now,
        }
    };
}

pub struct Dashboard {
    status: StatusPoller,
    services: ServiceController,
    tasks: TaskStore,
    downloads: DownloadStore,
    notifier: Notifier,
    scheduler: Scheduler,
    outbox: Outbox,
    tab: Tab,
    dashboard_timer: Option<TimerHandle>,
    timings: Timings,
}

impl Dashboard {
    pub fn new(timings: Timings, save_dir: PathBuf) -> Self {
        Self {
            status: StatusPoller::new(),
            services: ServiceController::new(timings.settle_delay()),
            tasks: TaskStore::new(),
            downloads: DownloadStore::new(timings.downloads_interval(), save_dir),
            notifier: Notifier::new(timings.toast_duration()),
            scheduler: Scheduler::new(),
            outbox: Outbox::default(),
            tab: Tab::default(),
            dashboard_timer: None,
            timings,
        }
    }

    /// Poll once right away and start the fixed dashboard interval.
    pub fn start(&mut self, renderer: &mut dyn Renderer, now: Instant) {
        if self.dashboard_timer.is_none() {
            self.dashboard_timer = Some(self.scheduler.start_interval(
                self.timings.dashboard_interval(),
                Command::DashboardTick,
                now,
            ));
        }
        self.status.poll(cx!(self, renderer, now));
    }

    /// Stop future dashboard ticks. A poll already in flight still lands.
    pub fn stop(&mut self) {
        if let Some(handle) = self.dashboard_timer.take() {
            self.scheduler.cancel(handle);
        }
    }

    pub fn dispatch(&mut self, command: Command, renderer: &mut dyn Renderer, now: Instant) {
        tracing::trace!(?command, "dispatch");
        match command {
            Command::DashboardTick => {
                if self.tab == Tab::Dashboard {
                    self.status.poll(cx!(self, renderer, now));
                }
            }
            Command::PollStatus => {
                self.status.poll(cx!(self, renderer, now));
            }
            Command::Refresh => match self.tab {
                Tab::Dashboard => {
                    self.notifier.info("Refreshing...", now);
                    self.status.poll(cx!(self, renderer, now));
                }
                Tab::Tasks => {
                    self.tasks.refresh(cx!(self, renderer, now));
                    self.tasks.load_stats(cx!(self, renderer, now));
                }
                Tab::Downloads => {
                    self.downloads.refresh(cx!(self, renderer, now));
                }
            },
            Command::SwitchTab(tab) => {
                self.tab = tab;
                match tab {
                    Tab::Dashboard => {
                        self.status.poll(cx!(self, renderer, now));
                    }
                    Tab::Tasks => {
                        self.tasks.refresh(cx!(self, renderer, now));
                        self.tasks.load_stats(cx!(self, renderer, now));
                    }
                    Tab::Downloads => {
                        self.downloads.refresh(cx!(self, renderer, now));
                    }
                }
            }
            Command::ServiceAction { service, action } => {
                self.services
                    .execute(&service, action, cx!(self, renderer, now));
            }
            Command::SetTaskFilter(filter) => {
                self.tasks.set_filter(filter, cx!(self, renderer, now));
            }
            Command::CreateTask(task) => self.tasks.create(task, cx!(self, renderer, now)),
            Command::ToggleTask(id) => self.tasks.toggle(&id, cx!(self, renderer, now)),
            Command::DeleteTask(id) => self.tasks.delete(&id, cx!(self, renderer, now)),
            Command::RefreshDownloads => {
                self.downloads.refresh(cx!(self, renderer, now));
            }
            Command::CreateDownload(url) => self.downloads.create(&url, cx!(self, renderer, now)),
            Command::DeleteDownload(id) => self.downloads.delete(&id, cx!(self, renderer, now)),
            Command::SaveArtifact(id) => {
                self.downloads.save_artifact(&id, cx!(self, renderer, now));
            }
        }
    }

    pub fn on_reply(&mut self, reply: Reply, renderer: &mut dyn Renderer, now: Instant) {
        match reply {
            Reply::Status(result) => self.status.apply(result, cx!(self, renderer, now)),
            Reply::ServiceAction {
                service,
                action,
                result,
            } => self
                .services
                .apply(&service, action, result, cx!(self, renderer, now)),
            Reply::Tasks { filter, result } => {
                self.tasks.apply_list(filter, result, cx!(self, renderer, now));
            }
            Reply::TasksReconciled {
                filter,
                deleted,
                delete_ok,
                result,
            } => self.tasks.apply_reconciled(
                filter,
                &deleted,
                delete_ok,
                result,
                cx!(self, renderer, now),
            ),
            Reply::TaskStats(result) => self.tasks.apply_stats(result, cx!(self, renderer, now)),
            Reply::TaskCreated(result) => {
                self.tasks.apply_created(result, cx!(self, renderer, now));
            }
            Reply::TaskToggled { id, result } => {
                self.tasks.apply_toggled(&id, result, cx!(self, renderer, now));
            }
            Reply::TaskDeleted { id, result } => {
                self.tasks.apply_deleted(&id, result, cx!(self, renderer, now));
            }
            Reply::Downloads(result) => {
                self.downloads.apply_list(result, cx!(self, renderer, now));
            }
            Reply::DownloadCreated(result) => {
                self.downloads.apply_created(result, cx!(self, renderer, now));
            }
            Reply::DownloadDeleted { id, result } => {
                self.downloads
                    .apply_deleted(&id, result, cx!(self, renderer, now));
            }
            Reply::ArtifactSaved { id, result } => {
                self.downloads.apply_saved(&id, result, cx!(self, renderer, now));
            }
        }
    }

    /// Run every timer that is due and retire an expired notification.
    pub fn fire_due(&mut self, renderer: &mut dyn Renderer, now: Instant) {
        for command in self.scheduler.take_due(now) {
            self.dispatch(command, renderer, now);
        }
        self.notifier.expire(now);
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.scheduler.next_deadline(), self.notifier.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn take_requests(&mut self) -> Vec<Request> {
        self.outbox.drain()
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn status(&self) -> &StatusPoller {
        &self.status
    }

    pub fn tasks(&self) -> &TaskStore {
        &self.tasks
    }

    pub fn downloads(&self) -> &DownloadStore {
        &self.downloads
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::render::recording::Recorder;
    use crate::types::StatusResponse;

    fn dashboard() -> Dashboard {
        Dashboard::new(Timings::default(), PathBuf::from("."))
    }

    #[test]
    fn start_polls_immediately_and_ticks_every_interval() {
        let t0 = Instant::now();
        let mut r = Recorder::default();
        let mut d = dashboard();
        d.start(&mut r, t0);
        assert_eq!(d.take_requests(), vec![Request::Status]);

        d.on_reply(Reply::Status(Ok(StatusResponse::default())), &mut r, t0);
        d.fire_due(&mut r, t0 + Duration::from_secs(30));
        assert_eq!(d.take_requests(), vec![Request::Status]);
    }

    #[test]
    fn ticks_while_a_poll_is_outstanding_are_dropped() {
        let t0 = Instant::now();
        let mut r = Recorder::default();
        let mut d = dashboard();
        d.start(&mut r, t0);
        d.fire_due(&mut r, t0 + Duration::from_secs(30));
        d.fire_due(&mut r, t0 + Duration::from_secs(60));
        d.dispatch(Command::Refresh, &mut r, t0 + Duration::from_secs(61));
        assert_eq!(d.take_requests(), vec![Request::Status]);
    }

    #[test]
    fn other_tabs_suppress_dashboard_polls() {
        let t0 = Instant::now();
        let mut r = Recorder::default();
        let mut d = dashboard();
        d.start(&mut r, t0);
        d.dispatch(Command::SwitchTab(Tab::Downloads), &mut r, t0);
        assert_eq!(
            d.take_requests(),
            vec![Request::Status, Request::ListDownloads]
        );

        // the outstanding poll still lands after switching away
        d.on_reply(Reply::Status(Ok(StatusResponse::default())), &mut r, t0);
        assert!(d.status().snapshot().is_some());

        d.fire_due(&mut r, t0 + Duration::from_secs(30));
        assert!(d.take_requests().is_empty());
    }

    #[test]
    fn stop_cancels_future_ticks() {
        let t0 = Instant::now();
        let mut r = Recorder::default();
        let mut d = dashboard();
        d.start(&mut r, t0);
        d.take_requests();
        d.on_reply(Reply::Status(Ok(StatusResponse::default())), &mut r, t0);
        d.stop();
        d.fire_due(&mut r, t0 + Duration::from_secs(90));
        assert!(d.take_requests().is_empty());
        assert_eq!(d.scheduler().active_count(), 0);
    }

    #[test]
    fn next_deadline_includes_notification_expiry() {
        let t0 = Instant::now();
        let mut r = Recorder::default();
        let mut d = dashboard();
        d.start(&mut r, t0);
        d.dispatch(Command::Refresh, &mut r, t0);
        assert_eq!(d.next_deadline(), Some(t0 + Duration::from_secs(3)));
        d.fire_due(&mut r, t0 + Duration::from_secs(3));
        assert!(d.notifier().current().is_none());
    }
}
