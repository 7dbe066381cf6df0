//! In-process fake of the effects API and upload bucket

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use effect_studio::config::AppConfig;
use effect_studio::models::job::GenerationMode;

pub const JOB_ID: &str = "job-42";
pub const USER_ID: &str = "test-user";

/// Object received by the fake bucket.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Default)]
pub struct FakeState {
    pub base_url: String,
    pub upload_url_requests: Vec<String>,
    pub uploads: Vec<StoredObject>,
    pub submissions: Vec<(String, Value)>,
    pub status_requests: Vec<String>,
    pub status_script: VecDeque<Value>,
    pub media: HashMap<String, (String, Vec<u8>)>,
    pub reject_uploads: bool,
}

type Shared = Arc<Mutex<FakeState>>;

/// Running fake server. Requests are recorded in `state`.
pub struct FakeStudio {
    pub base_url: String,
    pub state: Shared,
}

impl FakeStudio {
    pub async fn start() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake server");
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let state: Shared = Arc::new(Mutex::new(FakeState {
            base_url: base_url.clone(),
            ..FakeState::default()
        }));

        let app = Router::new()
            .route("/get-emd-upload-url", get(signed_upload_url))
            .route("/bucket/{name}", put(store_object))
            .route("/image-gen", post(submit_image))
            .route("/video-gen", post(submit_video))
            .route("/{endpoint}/{user}/{job}/status", get(job_status))
            .route("/media/{name}", get(serve_media))
            .layer(DefaultBodyLimit::disable())
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake server error");
        });

        Self { base_url, state }
    }

    /// Queue status payloads, returned in order. Once drained, polls answer
    /// `processing`.
    pub fn script_statuses(&self, statuses: Vec<Value>) {
        self.state.lock().unwrap().status_script.extend(statuses);
    }

    pub fn add_media(&self, name: &str, content_type: &str, bytes: Vec<u8>) {
        self.state
            .lock()
            .unwrap()
            .media
            .insert(name.to_string(), (content_type.to_string(), bytes));
    }

    pub fn media_url(&self, name: &str) -> String {
        format!("{}/media/{}", self.base_url, name)
    }

    pub fn reject_uploads(&self) {
        self.state.lock().unwrap().reject_uploads = true;
    }

    /// Requests of any kind received so far.
    pub fn request_count(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.upload_url_requests.len()
            + state.uploads.len()
            + state.submissions.len()
            + state.status_requests.len()
    }

    /// Configuration pointing every endpoint at this server, with a fast
    /// poll interval.
    pub fn config(&self, output_dir: PathBuf) -> AppConfig {
        AppConfig {
            api_base_url: self.base_url.clone(),
            content_base_url: format!("{}/media", self.base_url),
            user_id: USER_ID.to_string(),
            model: GenerationMode::ImageEffects,
            poll_interval_ms: 5,
            max_polls: 10,
            output_dir,
            ..AppConfig::default()
        }
    }
}

/// Fresh scratch directory for downloads.
pub fn scratch_dir(label: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "effect-studio-{label}-{}",
        effect_studio::models::upload::random_token(8)
    ));
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

async fn signed_upload_url(
    State(state): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let Some(name) = params.get("fileName") else {
        return (StatusCode::BAD_REQUEST, "fileName is required").into_response();
    };
    let mut state = state.lock().unwrap();
    state.upload_url_requests.push(name.clone());
    format!("{}/bucket/{}?X-Amz-Signature=test", state.base_url, name).into_response()
}

async fn store_object(
    State(state): State<Shared>,
    Path(name): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let mut state = state.lock().unwrap();
    if state.reject_uploads {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let bytes = body.to_vec();
    state.media.insert(name.clone(), (content_type.clone(), bytes.clone()));
    state.uploads.push(StoredObject {
        name,
        content_type,
        bytes,
    });
    StatusCode::OK
}

fn accept_job(state: &Shared, endpoint: &str, body: Value) -> Json<Value> {
    state
        .lock()
        .unwrap()
        .submissions
        .push((endpoint.to_string(), body));
    Json(json!({ "jobId": JOB_ID, "status": "queued" }))
}

async fn submit_image(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    accept_job(&state, "image-gen", body)
}

async fn submit_video(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    accept_job(&state, "video-gen", body)
}

async fn job_status(
    State(state): State<Shared>,
    Path((endpoint, user, job)): Path<(String, String, String)>,
) -> Json<Value> {
    let mut state = state.lock().unwrap();
    state
        .status_requests
        .push(format!("{endpoint}/{user}/{job}/status"));
    Json(
        state
            .status_script
            .pop_front()
            .unwrap_or_else(|| json!({ "status": "processing" })),
    )
}

async fn serve_media(State(state): State<Shared>, Path(name): Path<String>) -> Response {
    let state = state.lock().unwrap();
    match state.media.get(&name) {
        Some((content_type, bytes)) => {
            ([(header::CONTENT_TYPE, content_type.clone())], bytes.clone()).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
