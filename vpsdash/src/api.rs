//! HTTP client for the dashboard API plus the request/reply envelopes the
//! event loop ships between the stores and spawned request tasks.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tokio::io::AsyncWriteExt;
use url::Url;

use crate::error::{ApiError, ApiResult};
use crate::types::{
    Ack, DownloadJob, NewDownload, NewTask, ServiceAction, StatusResponse, TaskFilter, TaskItem,
    TaskStats,
};

/// A single network call, produced by a store and executed off the UI path.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Status,
    ServiceAction {
        service: String,
        action: ServiceAction,
    },
    ListTasks {
        filter: TaskFilter,
    },
    /// Authoritative re-fetch issued after a task delete.
    ReconcileTasks {
        filter: TaskFilter,
        deleted: String,
        delete_ok: bool,
    },
    TaskStats,
    CreateTask(NewTask),
    ToggleTask {
        id: String,
    },
    DeleteTask {
        id: String,
    },
    ListDownloads,
    CreateDownload(NewDownload),
    DeleteDownload {
        id: String,
    },
    SaveArtifact {
        id: String,
        filename: String,
        dir: PathBuf,
    },
}

/// Outcome of a [`Request`], carrying enough context to route it back to its owner.
#[derive(Debug)]
pub enum Reply {
    Status(ApiResult<StatusResponse>),
    ServiceAction {
        service: String,
        action: ServiceAction,
        result: ApiResult<Ack>,
    },
    Tasks {
        filter: TaskFilter,
        result: ApiResult<Vec<TaskItem>>,
    },
    TasksReconciled {
        filter: TaskFilter,
        deleted: String,
        delete_ok: bool,
        result: ApiResult<Vec<TaskItem>>,
    },
    TaskStats(ApiResult<TaskStats>),
    TaskCreated(ApiResult<Ack>),
    TaskToggled {
        id: String,
        result: ApiResult<Ack>,
    },
    TaskDeleted {
        id: String,
        result: ApiResult<Ack>,
    },
    Downloads(ApiResult<Vec<DownloadJob>>),
    DownloadCreated(ApiResult<Ack>),
    DownloadDeleted {
        id: String,
        result: ApiResult<Ack>,
    },
    ArtifactSaved {
        id: String,
        result: ApiResult<PathBuf>,
    },
}

#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub timeout: Duration,
    pub tls_ca: Option<PathBuf>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            tls_ca: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base: Url,
}

impl ApiClient {
    pub fn new(base_url: &str, opts: &ClientOptions) -> ApiResult<Self> {
        let base = parse_base_url(base_url)?;
        let mut builder = Client::builder().timeout(opts.timeout);
        if let Some(path) = opts.tls_ca.as_deref() {
            let pem = std::fs::read(path)?;
            builder = builder.add_root_certificate(reqwest::Certificate::from_pem(&pem)?);
        }
        Ok(Self {
            client: builder.build()?,
            base,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // parse_base_url rejects cannot-be-a-base urls, so this always succeeds
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> ApiResult<T> {
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Status(status));
        }
        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    // Mutating endpoints answer `{success, error?}`, sometimes with a non-2xx status.
    async fn ack(&self, req: RequestBuilder) -> ApiResult<Ack> {
        let resp = req.send().await?;
        let status = resp.status();
        let body = resp.bytes().await?;
        match serde_json::from_slice::<Ack>(&body) {
            Ok(ack) if ack.success && status.is_success() => Ok(ack),
            Ok(ack) if !ack.success => Err(ApiError::Rejected(ack.error)),
            Ok(_) => Err(ApiError::Status(status)),
            Err(_) if !status.is_success() => Err(ApiError::Status(status)),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn status(&self) -> ApiResult<StatusResponse> {
        let url = self.endpoint(&["api", "status"]);
        self.get_json(self.client.get(url)).await
    }

    pub async fn service_action(&self, service: &str, action: ServiceAction) -> ApiResult<Ack> {
        let url = self.endpoint(&["api", "service", service, action.as_str()]);
        self.ack(self.client.post(url)).await
    }

    pub async fn list_tasks(&self, filter: TaskFilter) -> ApiResult<Vec<TaskItem>> {
        let url = self.endpoint(&["api", "todos"]);
        self.get_json(self.client.get(url).query(&[("filter", filter.as_str())]))
            .await
    }

    pub async fn task_stats(&self) -> ApiResult<TaskStats> {
        let url = self.endpoint(&["api", "todos", "stats"]);
        self.get_json(self.client.get(url)).await
    }

    pub async fn create_task(&self, task: &NewTask) -> ApiResult<Ack> {
        let url = self.endpoint(&["api", "todos"]);
        self.ack(self.client.post(url).json(task)).await
    }

    pub async fn toggle_task(&self, id: &str) -> ApiResult<Ack> {
        let url = self.endpoint(&["api", "todos", id, "toggle"]);
        self.ack(self.client.post(url)).await
    }

    pub async fn delete_task(&self, id: &str) -> ApiResult<Ack> {
        let url = self.endpoint(&["api", "todos", id]);
        self.ack(self.client.delete(url)).await
    }

    pub async fn list_downloads(&self) -> ApiResult<Vec<DownloadJob>> {
        let url = self.endpoint(&["api", "downloads"]);
        self.get_json(self.client.get(url)).await
    }

    pub async fn create_download(&self, download: &NewDownload) -> ApiResult<Ack> {
        let url = self.endpoint(&["api", "downloads"]);
        self.ack(self.client.post(url).json(download)).await
    }

    pub async fn delete_download(&self, id: &str) -> ApiResult<Ack> {
        let url = self.endpoint(&["api", "downloads", id]);
        self.ack(self.client.delete(url)).await
    }

    /// Stream a completed job's file into `dir`, returning the written path.
    pub async fn save_artifact(&self, id: &str, filename: &str, dir: &Path) -> ApiResult<PathBuf> {
        let url = self.endpoint(&["api", "downloads", id, "file"]);
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Status(status));
        }

        tokio::fs::create_dir_all(dir).await?;
        let name = artifact_name(id, filename);
        let dest = dir.join(&name);
        let partial = dir.join(format!("{name}.part"));
        let mut file = tokio::fs::File::create(&partial).await?;
        let mut body = resp.bytes_stream();
        while let Some(chunk) = body.next().await {
            file.write_all(&chunk?).await?;
        }
        file.flush().await?;
        drop(file);
        tokio::fs::rename(&partial, &dest).await?;
        Ok(dest)
    }

    pub async fn execute(&self, req: Request) -> Reply {
        tracing::debug!(?req, "dispatching request");
        match req {
            Request::Status => Reply::Status(self.status().await),
            Request::ServiceAction { service, action } => {
                let result = self.service_action(&service, action).await;
                Reply::ServiceAction {
                    service,
                    action,
                    result,
                }
            }
            Request::ListTasks { filter } => Reply::Tasks {
                filter,
                result: self.list_tasks(filter).await,
            },
            Request::ReconcileTasks {
                filter,
                deleted,
                delete_ok,
            } => Reply::TasksReconciled {
                filter,
                deleted,
                delete_ok,
                result: self.list_tasks(filter).await,
            },
            Request::TaskStats => Reply::TaskStats(self.task_stats().await),
            Request::CreateTask(task) => Reply::TaskCreated(self.create_task(&task).await),
            Request::ToggleTask { id } => {
                let result = self.toggle_task(&id).await;
                Reply::TaskToggled { id, result }
            }
            Request::DeleteTask { id } => {
                let result = self.delete_task(&id).await;
                Reply::TaskDeleted { id, result }
            }
            Request::ListDownloads => Reply::Downloads(self.list_downloads().await),
            Request::CreateDownload(download) => {
                Reply::DownloadCreated(self.create_download(&download).await)
            }
            Request::DeleteDownload { id } => {
                let result = self.delete_download(&id).await;
                Reply::DownloadDeleted { id, result }
            }
            Request::SaveArtifact { id, filename, dir } => {
                let result = self.save_artifact(&id, &filename, &dir).await;
                Reply::ArtifactSaved { id, result }
            }
        }
    }
}

pub fn parse_base_url(input: &str) -> ApiResult<Url> {
    let url = Url::parse(input.trim()).map_err(|e| ApiError::InvalidUrl(format!("{input}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(ApiError::InvalidUrl(format!(
            "{input}: expected http://HOST:PORT or https://HOST:PORT"
        )));
    }
    Ok(url)
}

// Only the final path component of the server-provided name is trusted.
fn artifact_name(id: &str, filename: &str) -> String {
    Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("download_{id}"))
}
