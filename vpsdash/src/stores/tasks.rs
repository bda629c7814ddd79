//! Task list with change detection, optimistic toggle/delete with exact
//! rollback, and create-then-refresh.
//!
//! The displayed list is owned here. Optimistic steps mutate it in place and
//! re-render; server replies either confirm (no further change) or undo the
//! step with its exact inverse. A completion flip is always undone by
//! flipping again, never by writing an absolute value, so a chain of rapid
//! toggles unwinds consistently.
//!
//! Flips still awaiting a reply are counted per id and laid over every list
//! taken in from the server, so a refresh landing mid-toggle neither drops
//! the optimistic state nor turns the rollback into a second flip of fresh
//! data. Mutations mark any list fetch already in flight as stale, since its
//! answer may predate them.

use std::collections::{HashMap, HashSet};

use super::{Ctx, PollGuard};
use crate::api::Request;
use crate::error::ApiResult;
use crate::types::{Ack, NewTask, TaskFilter, TaskItem, TaskStats};

/// Exact digest of a rendered task list: its canonical JSON encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSignature(Vec<u8>);

impl ChangeSignature {
    pub fn of(tasks: &[TaskItem]) -> Option<Self> {
        serde_json::to_vec(tasks).ok().map(Self)
    }
}

#[derive(Debug, Default)]
pub struct TaskStore {
    filter: TaskFilter,
    list_guard: PollGuard,
    stats_guard: PollGuard,
    signature: Option<ChangeSignature>,
    items: Vec<TaskItem>,
    hidden: HashSet<String>,
    pending_flips: HashMap<String, u32>,
    stats: Option<TaskStats>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(&self) -> TaskFilter {
        self.filter
    }

    pub fn stats(&self) -> Option<&TaskStats> {
        self.stats.as_ref()
    }

    /// Items as currently shown, optimistic changes included.
    pub fn visible(&self) -> Vec<TaskItem> {
        self.items
            .iter()
            .filter(|t| !self.hidden.contains(&t.id))
            .cloned()
            .collect()
    }

    pub fn find(&self, id: &str) -> Option<&TaskItem> {
        self.items.iter().find(|t| t.id == id)
    }

    fn render(&self, cx: &mut Ctx<'_>) {
        cx.renderer.tasks(&self.visible());
    }

    pub fn refresh(&mut self, cx: &mut Ctx<'_>) -> bool {
        if !self.list_guard.try_begin() {
            tracing::debug!("task list fetch still in flight; dropping refresh");
            return false;
        }
        cx.outbox.push(Request::ListTasks {
            filter: self.filter,
        });
        true
    }

    // A refresh that must observe a mutation: if a fetch is already out, its
    // result may predate the mutation, so fetch again once it lands.
    fn refresh_after_mutation(&mut self, cx: &mut Ctx<'_>) {
        if self.list_guard.begin_or_mark_stale() {
            cx.outbox.push(Request::ListTasks {
                filter: self.filter,
            });
        }
    }

    pub fn set_filter(&mut self, filter: TaskFilter, cx: &mut Ctx<'_>) {
        self.filter = filter;
        self.refresh_after_mutation(cx);
    }

    pub fn apply_list(
        &mut self,
        filter: TaskFilter,
        result: ApiResult<Vec<TaskItem>>,
        cx: &mut Ctx<'_>,
    ) {
        let stale = self.list_guard.finish();
        if stale || filter != self.filter {
            tracing::debug!(filter = filter.as_str(), "discarding outdated task list");
            self.refresh(cx);
            return;
        }
        let tasks = match result {
            Ok(tasks) => tasks,
            Err(err) => {
                tracing::warn!(error = %err, "loading tasks failed");
                cx.notifier.error("Failed to load tasks", cx.now);
                return;
            }
        };

        let signature = ChangeSignature::of(&tasks);
        if signature.is_some() && signature == self.signature {
            tracing::trace!(count = tasks.len(), "task list unchanged");
            return;
        }
        self.signature = signature;
        self.take_list(tasks);
        self.render(cx);
    }

    // Server list plus the flips that are still unanswered.
    fn take_list(&mut self, tasks: Vec<TaskItem>) {
        self.items = tasks;
        for (id, count) in &self.pending_flips {
            if count % 2 == 1 {
                if let Some(item) = self.items.iter_mut().find(|t| &t.id == id) {
                    item.completed = !item.completed;
                }
            }
        }
    }

    fn settle_flip(&mut self, id: &str) {
        if let Some(count) = self.pending_flips.get_mut(id) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.pending_flips.remove(id);
            }
        }
    }

    /// Flip the item locally, then ask the server to do the same.
    pub fn toggle(&mut self, id: &str, cx: &mut Ctx<'_>) {
        self.list_guard.invalidate();
        *self.pending_flips.entry(id.to_string()).or_default() += 1;
        if self.flip(id) {
            self.render(cx);
        }
        cx.outbox.push(Request::ToggleTask { id: id.to_string() });
    }

    fn flip(&mut self, id: &str) -> bool {
        match self.items.iter_mut().find(|t| t.id == id) {
            Some(item) => {
                item.completed = !item.completed;
                true
            }
            None => false,
        }
    }

    pub fn apply_toggled(&mut self, id: &str, result: ApiResult<Ack>, cx: &mut Ctx<'_>) {
        self.settle_flip(id);
        match result {
            Ok(_) => self.load_stats(cx),
            Err(err) => {
                tracing::warn!(id, error = %err, "toggle failed; rolling back");
                if self.flip(id) {
                    self.render(cx);
                }
                cx.notifier.error("Failed to update task", cx.now);
            }
        }
    }

    /// Hide the item locally and issue the delete. Confirmation happens before this.
    pub fn delete(&mut self, id: &str, cx: &mut Ctx<'_>) {
        self.list_guard.invalidate();
        if self.hidden.insert(id.to_string()) {
            self.render(cx);
        }
        cx.outbox.push(Request::DeleteTask { id: id.to_string() });
    }

    pub fn apply_deleted(&mut self, id: &str, result: ApiResult<Ack>, cx: &mut Ctx<'_>) {
        let delete_ok = match result {
            Ok(_) => {
                self.load_stats(cx);
                true
            }
            Err(err) => {
                tracing::warn!(id, error = %err, "delete failed; showing task again");
                if self.hidden.remove(id) {
                    self.render(cx);
                }
                cx.notifier.error("Failed to delete task", cx.now);
                false
            }
        };
        // Always rebind to the server's list rather than trusting the hide.
        cx.outbox.push(Request::ReconcileTasks {
            filter: self.filter,
            deleted: id.to_string(),
            delete_ok,
        });
    }

    pub fn apply_reconciled(
        &mut self,
        filter: TaskFilter,
        deleted: &str,
        delete_ok: bool,
        result: ApiResult<Vec<TaskItem>>,
        cx: &mut Ctx<'_>,
    ) {
        match result {
            Ok(tasks) if filter == self.filter => {
                self.hidden.remove(deleted);
                self.list_guard.invalidate();
                self.signature = ChangeSignature::of(&tasks);
                self.take_list(tasks);
                self.render(cx);
                if delete_ok {
                    cx.notifier.success("Task deleted", cx.now);
                }
            }
            Ok(_) => {
                // filter changed meanwhile; the list belongs to another view
                self.hidden.remove(deleted);
                self.refresh_after_mutation(cx);
            }
            Err(err) => {
                tracing::warn!(id = deleted, error = %err, "reconciling after delete failed");
                if self.hidden.remove(deleted) {
                    self.render(cx);
                }
                cx.notifier.error("Failed to delete task", cx.now);
            }
        }
    }

    pub fn create(&mut self, task: NewTask, cx: &mut Ctx<'_>) {
        if task.title.trim().is_empty() {
            cx.notifier.error("Task title is required", cx.now);
            return;
        }
        let task = NewTask {
            title: task.title.trim().to_string(),
            ..task
        };
        cx.outbox.push(Request::CreateTask(task));
    }

    /// The new item is never inserted locally; it arrives with the next list.
    pub fn apply_created(&mut self, result: ApiResult<Ack>, cx: &mut Ctx<'_>) {
        match result {
            Ok(ack) => {
                tracing::info!(id = ?ack.id, "task created");
                cx.renderer.clear_task_input();
                self.refresh_after_mutation(cx);
                self.load_stats(cx);
                cx.notifier.success("Task added!", cx.now);
            }
            Err(err) => {
                tracing::warn!(error = %err, "creating task failed");
                cx.notifier.error("Failed to add task", cx.now);
            }
        }
    }

    pub fn load_stats(&mut self, cx: &mut Ctx<'_>) {
        if self.stats_guard.begin_or_mark_stale() {
            cx.outbox.push(Request::TaskStats);
        }
    }

    pub fn apply_stats(&mut self, result: ApiResult<TaskStats>, cx: &mut Ctx<'_>) {
        let stale = self.stats_guard.finish();
        match result {
            Ok(stats) => {
                cx.renderer.task_stats(&stats);
                self.stats = Some(stats);
            }
            Err(err) => {
                tracing::warn!(error = %err, "loading task stats failed");
                cx.notifier.error("Failed to load task stats", cx.now);
            }
        }
        if stale {
            self.load_stats(cx);
        }
    }
}
