//! Start/stop/restart commands for a single service.

use std::time::Duration;

use super::Ctx;
use crate::api::Request;
use crate::command::Command;
use crate::error::{ApiError, ApiResult};
use crate::types::{Ack, ServiceAction};

/// Holds no service state of its own; the grid only shows what the server last reported.
#[derive(Debug)]
pub struct ServiceController {
    settle_delay: Duration,
}

impl ServiceController {
    pub fn new(settle_delay: Duration) -> Self {
        Self { settle_delay }
    }

    pub fn execute(&self, service: &str, action: ServiceAction, cx: &mut Ctx<'_>) {
        tracing::info!(service, action = action.as_str(), "service action");
        cx.notifier
            .info(format!("{} {service}...", action.progressive()), cx.now);
        cx.outbox.push(Request::ServiceAction {
            service: service.to_string(),
            action,
        });
    }

    pub fn apply(
        &self,
        service: &str,
        action: ServiceAction,
        result: ApiResult<Ack>,
        cx: &mut Ctx<'_>,
    ) {
        match result {
            Ok(_) => {
                cx.notifier.success(
                    format!("{service} {} successfully", action.past()),
                    cx.now,
                );
                // give the process a moment before the next snapshot
                cx.scheduler
                    .schedule_once(self.settle_delay, Command::PollStatus, cx.now);
            }
            Err(ApiError::Rejected(_)) => {
                tracing::warn!(service, action = action.as_str(), "service action rejected");
                cx.notifier
                    .error(format!("Failed to {} {service}", action.as_str()), cx.now);
            }
            Err(err) => {
                tracing::warn!(service, action = action.as_str(), error = %err, "service action failed");
                cx.notifier.error(format!("Error: {err}"), cx.now);
            }
        }
    }
}
