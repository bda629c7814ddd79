//! Download jobs and the adaptive fast-refresh timer.
//!
//! Every refresh renders the list as received and then re-evaluates the
//! cadence: while any job is queued or downloading exactly one fast interval
//! runs, otherwise none does. The check is level-triggered, so a missed
//! transition is corrected by the next refresh.

use std::path::PathBuf;
use std::time::Duration;

use super::{Ctx, PollGuard};
use crate::api::Request;
use crate::command::Command;
use crate::error::ApiResult;
use crate::scheduler::TimerHandle;
use crate::types::{Ack, DownloadJob, DownloadStatus, NewDownload};

pub fn has_active_jobs(jobs: &[DownloadJob]) -> bool {
    jobs.iter().any(|j| j.status.is_active())
}

#[derive(Debug)]
pub struct DownloadStore {
    guard: PollGuard,
    jobs: Vec<DownloadJob>,
    fast_timer: Option<TimerHandle>,
    fast_period: Duration,
    save_dir: PathBuf,
}

impl DownloadStore {
    pub fn new(fast_period: Duration, save_dir: PathBuf) -> Self {
        Self {
            guard: PollGuard::default(),
            jobs: Vec::new(),
            fast_timer: None,
            fast_period,
            save_dir,
        }
    }

    pub fn jobs(&self) -> &[DownloadJob] {
        &self.jobs
    }

    pub fn fast_timer(&self) -> Option<TimerHandle> {
        self.fast_timer
    }

    pub fn refresh(&mut self, cx: &mut Ctx<'_>) -> bool {
        if !self.guard.try_begin() {
            tracing::debug!("download list fetch still in flight; dropping refresh");
            return false;
        }
        cx.outbox.push(Request::ListDownloads);
        true
    }

    fn refresh_after_mutation(&mut self, cx: &mut Ctx<'_>) {
        if self.guard.begin_or_mark_stale() {
            cx.outbox.push(Request::ListDownloads);
        }
    }

    pub fn apply_list(&mut self, result: ApiResult<Vec<DownloadJob>>, cx: &mut Ctx<'_>) {
        let stale = self.guard.finish();
        match result {
            Ok(jobs) => {
                cx.renderer.downloads(&jobs);
                self.jobs = jobs;
                self.update_cadence(cx);
            }
            Err(err) => {
                tracing::warn!(error = %err, "loading downloads failed");
                cx.notifier.error("Failed to load downloads", cx.now);
            }
        }
        if stale {
            self.refresh(cx);
        }
    }

    /// Bring the fast timer in line with the current job list.
    pub fn update_cadence(&mut self, cx: &mut Ctx<'_>) {
        let active = has_active_jobs(&self.jobs);
        // a handle the scheduler no longer knows is as good as none
        let running = self.fast_timer.filter(|h| cx.scheduler.is_active(*h));
        match (active, running) {
            (true, None) => {
                tracing::debug!(period = ?self.fast_period, "downloads active; starting fast refresh");
                self.fast_timer = Some(cx.scheduler.start_interval(
                    self.fast_period,
                    Command::RefreshDownloads,
                    cx.now,
                ));
            }
            (false, Some(handle)) => {
                tracing::debug!("downloads idle; stopping fast refresh");
                cx.scheduler.cancel(handle);
                self.fast_timer = None;
            }
            (false, None) => self.fast_timer = None,
            (true, Some(_)) => {}
        }
    }

    pub fn create(&mut self, url: &str, cx: &mut Ctx<'_>) {
        let url = url.trim();
        if url.is_empty() {
            cx.notifier.error("Download URL is required", cx.now);
            return;
        }
        cx.outbox.push(Request::CreateDownload(NewDownload {
            url: url.to_string(),
        }));
    }

    /// A rejected submission is not refreshed and keeps the input for correction.
    pub fn apply_created(&mut self, result: ApiResult<Ack>, cx: &mut Ctx<'_>) {
        match result {
            Ok(_) => {
                cx.renderer.clear_download_input();
                self.refresh_after_mutation(cx);
                cx.notifier.success("Download started!", cx.now);
            }
            Err(err) => {
                tracing::warn!(error = %err, "enqueueing download failed");
                let message = err
                    .rejection_reason()
                    .unwrap_or("Failed to start download")
                    .to_string();
                cx.notifier.error(message, cx.now);
            }
        }
    }

    pub fn delete(&mut self, id: &str, cx: &mut Ctx<'_>) {
        cx.outbox.push(Request::DeleteDownload { id: id.to_string() });
    }

    pub fn apply_deleted(&mut self, id: &str, result: ApiResult<Ack>, cx: &mut Ctx<'_>) {
        // refreshed whatever the outcome
        self.refresh_after_mutation(cx);
        match result {
            Ok(_) => cx.notifier.success("Download deleted", cx.now),
            Err(err) => {
                tracing::warn!(id, error = %err, "deleting download failed");
                cx.notifier.error("Failed to delete download", cx.now);
            }
        }
    }

    pub fn save_artifact(&mut self, id: &str, cx: &mut Ctx<'_>) {
        let Some(job) = self.jobs.iter().find(|j| j.id == id) else {
            cx.notifier.error("Unknown download", cx.now);
            return;
        };
        if job.status != DownloadStatus::Completed {
            cx.notifier
                .error("Only completed downloads can be saved", cx.now);
            return;
        }
        cx.notifier.info(format!("Saving {}...", job.filename), cx.now);
        cx.outbox.push(Request::SaveArtifact {
            id: job.id.clone(),
            filename: job.filename.clone(),
            dir: self.save_dir.clone(),
        });
    }

    pub fn apply_saved(&mut self, id: &str, result: ApiResult<PathBuf>, cx: &mut Ctx<'_>) {
        match result {
            Ok(path) => {
                tracing::info!(id, path = %path.display(), "artifact saved");
                cx.notifier
                    .success(format!("Saved to {}", path.display()), cx.now);
            }
            Err(err) => {
                tracing::warn!(id, error = %err, "saving artifact failed");
                cx.notifier
                    .error(format!("Failed to save download: {err}"), cx.now);
            }
        }
    }
}
