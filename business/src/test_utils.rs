//! Mock-server helpers for business tests.
//!
//! ```ignore
//! let mut test_ctx = TestContext::new().await;
//! test_ctx.mock_list(vec![sample_project_code(1, "PRJ-1")]).await;
//! test_ctx.refresh();
//! test_ctx.flush_and_wait().await;
//! ```

use std::time::Duration;

use serde_json::{Value, json};
use stockroom_states::StateCtx;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

use crate::{
    BusinessConfig, ProjectCode, ProjectCodeTable, build_state_ctx,
    api_paths::Pk,
    forms::{FormDialogs, ModalFormHost, dialog_channel, dispatch_form_request},
    notifications::{Notification, Notifier, notification_channel},
    project_codes::request_refresh_if_stale,
};

pub const LIST_PATH: &str = "/api/project-code/";

pub fn detail_path(pk: u64) -> String {
    format!("{LIST_PATH}{pk}/")
}

pub fn sample_project_code(pk: u64, code: &str) -> ProjectCode {
    ProjectCode {
        pk: Pk(pk),
        code: code.to_string(),
        description: format!("Description of {code}"),
    }
}

pub struct TestContext {
    pub mock_server: MockServer,
    pub ctx: StateCtx,
    pub table: ProjectCodeTable,
    pub host: ModalFormHost,
    pub dialogs: FormDialogs,
    pub notifier: Notifier,
    pub notifications: flume::Receiver<Notification>,
}

impl TestContext {
    pub async fn new() -> Self {
        let mock_server = MockServer::start().await;
        let ctx = build_state_ctx(BusinessConfig::new(mock_server.uri()));
        let (host, requests) = dialog_channel();
        let (notifier, notifications) = notification_channel();

        Self {
            mock_server,
            ctx,
            table: ProjectCodeTable::default(),
            host,
            dialogs: FormDialogs::new(requests, notifier.clone()),
            notifier,
            notifications,
        }
    }

    pub fn config(&self) -> BusinessConfig {
        self.ctx.state::<BusinessConfig>().clone()
    }

    pub fn refresh(&mut self) -> bool {
        request_refresh_if_stale(&mut self.ctx, self.table.controller())
    }

    /// Flush all pending commands and wait for their tasks, syncing after each one.
    pub async fn flush_and_wait(&mut self) {
        self.ctx.sync_computes();
        self.ctx.flush_commands();

        let timeout = Duration::from_secs(5);
        let start = std::time::Instant::now();
        while self.ctx.task_count() > 0 {
            assert!(
                start.elapsed() < timeout,
                "Timed out waiting for pending tasks ({} still in JoinSet)",
                self.ctx.task_count()
            );
            if self.ctx.task_set_mut().join_next().await.is_some() {
                self.ctx.sync_computes();
            }
        }
        self.ctx.sync_computes();
    }

    /// Yield until a spawned caller has queued a dialog, then open it.
    pub async fn open_next_dialog(&mut self) {
        let config = self.config();
        for _ in 0..50 {
            if let Some(request) = self.dialogs.poll(&config) {
                dispatch_form_request(&mut self.ctx, request);
            }
            if self.dialogs.is_open() {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("no dialog was requested");
    }

    /// Submit the open dialog and run its request to completion.
    pub async fn submit_dialog(&mut self) {
        let config = self.config();
        let request = self.dialogs.submit(&config).expect("dialog is editable");
        dispatch_form_request(&mut self.ctx, request);
        self.run_dialog_requests().await;
    }

    /// Run queued form requests and feed their results to the dialogs.
    pub async fn run_dialog_requests(&mut self) {
        self.flush_and_wait().await;
        let status = self
            .ctx
            .compute::<crate::FormRequestCompute>()
            .status
            .clone();
        self.dialogs.apply(&status);
    }

    pub async fn mock_list(&self, records: Vec<ProjectCode>) {
        Mock::given(method("GET"))
            .and(path(LIST_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(records))
            .mount(&self.mock_server)
            .await;
    }

    pub async fn mock_detail(&self, record: &ProjectCode) {
        Mock::given(method("GET"))
            .and(path(detail_path(record.pk.0)))
            .respond_with(ResponseTemplate::new(200).set_body_json(record))
            .mount(&self.mock_server)
            .await;
    }

    pub async fn mock_create(&self, status: u16, body: Value) {
        Mock::given(method("POST"))
            .and(path(LIST_PATH))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.mock_server)
            .await;
    }

    pub async fn mock_update(&self, pk: u64, status: u16, body: Value) {
        Mock::given(method("PATCH"))
            .and(path(detail_path(pk)))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.mock_server)
            .await;
    }

    pub async fn mock_delete(&self, pk: u64, status: u16) {
        Mock::given(method("DELETE"))
            .and(path(detail_path(pk)))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.mock_server)
            .await;
    }

    pub fn validation_body(field: &str, message: &str) -> Value {
        json!({ field: [message] })
    }
}
