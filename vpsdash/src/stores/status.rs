//! Status poller: one guarded fetch of the system/service snapshot, applied
//! in a single reconciliation pass.

use chrono::Local;

use super::{Ctx, PollGuard};
use crate::api::Request;
use crate::error::ApiResult;
use crate::types::StatusResponse;

#[derive(Debug, Default)]
pub struct StatusPoller {
    guard: PollGuard,
    snapshot: Option<StatusResponse>,
    online: Option<bool>,
}

impl StatusPoller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a cycle unless one is already outstanding. Returns false for a dropped cycle.
    pub fn poll(&mut self, cx: &mut Ctx<'_>) -> bool {
        if !self.guard.try_begin() {
            tracing::debug!("status poll still in flight; dropping cycle");
            return false;
        }
        cx.outbox.push(Request::Status);
        true
    }

    pub fn apply(&mut self, result: ApiResult<StatusResponse>, cx: &mut Ctx<'_>) {
        self.guard.finish();
        match result {
            Ok(snapshot) => {
                cx.renderer.system_stats(&snapshot.system);
                cx.renderer.services(&snapshot.services);
                cx.renderer
                    .header(snapshot.battery_percentage(), snapshot.uptime.as_deref());
                cx.renderer.last_updated(Local::now());
                if self.online != Some(true) {
                    tracing::info!("dashboard api online");
                }
                self.online = Some(true);
                self.snapshot = Some(snapshot);
            }
            Err(err) => {
                tracing::warn!(error = %err, "status poll failed");
                self.online = Some(false);
                cx.renderer.offline();
            }
        }
    }

    pub fn in_flight(&self) -> bool {
        self.guard.in_flight()
    }

    /// Last snapshot the server reported; replaced wholesale by every successful poll.
    pub fn snapshot(&self) -> Option<&StatusResponse> {
        self.snapshot.as_ref()
    }

    pub fn online(&self) -> Option<bool> {
        self.online
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::render::recording::Call;
    use crate::stores::harness::Harness;
    use crate::types::{Service, SystemStats};

    fn snapshot() -> StatusResponse {
        serde_json::from_str(
            r#"{"system":{"cpu_percent":42.7,"memory_percent":60,"disk_percent":10},
                "services":[{"id":"ssh","name":"SSH Server","running":true,"port":22}],
                "battery":{"percentage":81,"status":"CHARGING"},"uptime":"3h 12m"}"#,
        )
        .unwrap()
    }

    #[test]
    fn rapid_polls_issue_exactly_one_fetch() {
        let mut h = Harness::new();
        let mut p = StatusPoller::new();
        assert!(p.poll(&mut h.cx()));
        for _ in 0..10 {
            assert!(!p.poll(&mut h.cx()));
        }
        assert_eq!(h.outbox.pending(), &[Request::Status]);
        assert!(p.in_flight());
    }

    #[test]
    fn success_runs_every_reconciliation_step_in_order() {
        let mut h = Harness::new();
        let mut p = StatusPoller::new();
        p.poll(&mut h.cx());
        p.apply(Ok(snapshot()), &mut h.cx());

        assert!(!p.in_flight());
        assert_eq!(
            h.renderer.calls,
            vec![
                Call::SystemStats(SystemStats {
                    cpu_percent: 42.7,
                    memory_percent: 60.0,
                    disk_percent: 10.0,
                }),
                Call::Services(vec![Service {
                    id: "ssh".into(),
                    name: "SSH Server".into(),
                    running: true,
                    port: 22,
                }]),
                Call::Header(Some(81), Some("3h 12m".into())),
                Call::LastUpdated,
            ]
        );
        assert_eq!(p.online(), Some(true));
    }

    #[test]
    fn failure_goes_offline_and_clears_guard() {
        let mut h = Harness::new();
        let mut p = StatusPoller::new();
        p.poll(&mut h.cx());
        p.apply(
            Err(ApiError::Status(reqwest::StatusCode::BAD_GATEWAY)),
            &mut h.cx(),
        );
        assert_eq!(h.renderer.calls, vec![Call::Offline]);
        assert!(!p.in_flight());
        assert!(p.poll(&mut h.cx()));
        assert_eq!(h.outbox.pending().len(), 2);
    }
}
