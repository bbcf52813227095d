use std::time::Duration;

use egui_kittest::Harness;
use serde_json::Value;
use stockroom_ui::StockroomApp;
use stockroom_ui::app::show_settings;
use stockroom_ui::state::State;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const LIST_PATH: &str = "/api/project-code/";

/// Time given to mocked requests between frames (milliseconds).
const NETWORK_WAIT_MS: u64 = 50;

pub struct TestCtx<'a, T = State> {
    mock_server: MockServer,
    harness: Harness<'a, T>,
}

impl<'a, T> TestCtx<'a, T> {
    pub fn harness_mut(&mut self) -> &mut Harness<'a, T> {
        &mut self.harness
    }

    #[allow(unused)]
    pub fn harness(&self) -> &Harness<'a, T> {
        &self.harness
    }

    #[allow(unused)]
    pub fn mock_server(&self) -> &MockServer {
        &self.mock_server
    }

    /// Run frames, letting spawned requests and form flows make progress in between.
    pub async fn pump_frames(&mut self, frames: usize) {
        for _ in 0..frames {
            self.harness.step();
            tokio::time::sleep(Duration::from_millis(NETWORK_WAIT_MS)).await;
        }
        self.harness.step();
    }
}

impl<'a> TestCtx<'a, State> {
    /// Settings screen over a server whose list endpoint answers with `list_body`.
    pub async fn new(list_body: Value) -> Self {
        let mock_server = setup_server(ResponseTemplate::new(200).set_body_json(list_body)).await;
        let state = State::test(mock_server.uri());
        let harness = Harness::new_ui_state(show_settings, state);

        Self {
            mock_server,
            harness,
        }
    }

    #[allow(unused)]
    pub async fn with_list_status(status: u16) -> Self {
        let mock_server = setup_server(ResponseTemplate::new(status).set_body_json(
            serde_json::json!({"detail": "Something went wrong"}),
        ))
        .await;
        let state = State::test(mock_server.uri());
        let harness = Harness::new_ui_state(show_settings, state);

        Self {
            mock_server,
            harness,
        }
    }

    /// Number of list requests the server received so far.
    #[allow(unused)]
    pub async fn list_requests(&self) -> usize {
        self.mock_server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.method.as_str() == "GET" && r.url.path() == LIST_PATH)
            .count()
    }
}

impl<'a> TestCtx<'a, StockroomApp> {
    #[allow(unused)]
    pub async fn new_app(list_body: Value) -> Self {
        let mock_server = setup_server(ResponseTemplate::new(200).set_body_json(list_body)).await;
        let app = StockroomApp::new(State::test(mock_server.uri()));
        let harness = Harness::new_eframe(|_| app);

        Self {
            mock_server,
            harness,
        }
    }
}

async fn setup_server(list_response: ResponseTemplate) -> MockServer {
    let _ = env_logger::builder().is_test(true).try_init();
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LIST_PATH))
        .respond_with(list_response)
        .mount(&mock_server)
        .await;

    mock_server
}

#[allow(unused)]
pub fn sample_page() -> Value {
    serde_json::json!({
        "count": 2,
        "results": [
            {"pk": 1, "code": "PRJ-ALPHA", "description": "Alpha rollout"},
            {"pk": 2, "code": "PRJ-BETA", "description": "Beta rollout"}
        ]
    })
}
