use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use digimplant_chat::ChatPipeline;
use digimplant_model::TextGenerator;
use digimplant_rag::{CaseRecord, CorpusSource, DirectoryCorpus};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{Instrument, error, info, info_span, warn};
use uuid::Uuid;

use crate::{
    case_store::{CaseRecordStore, HttpCaseRecordStore, InMemoryCaseStore},
    config::ServerConfig,
    error::ApiError,
    protocol::{ChatRequest, ChatResponse, HealthResponse},
};

pub const SERVICE_NAME: &str = "digimplant-server";

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ChatPipeline>,
    pub cases: Arc<dyn CaseRecordStore>,
}

impl AppState {
    pub fn new(pipeline: Arc<ChatPipeline>, cases: Arc<dyn CaseRecordStore>) -> Self {
        Self { pipeline, cases }
    }

    /// Wire the corpus and case store named by `config` around `generator`.
    pub fn from_config(
        config: &ServerConfig,
        generator: Arc<dyn TextGenerator>,
    ) -> anyhow::Result<Self> {
        let corpus = match &config.data_dirs {
            Some(dirs) => DirectoryCorpus::new(dirs.iter().cloned()),
            None => DirectoryCorpus::with_default_candidates(
                std::env::current_dir().context("cannot resolve the working directory")?,
            ),
        };
        let corpus: Arc<dyn CorpusSource> = Arc::new(corpus);

        let pipeline = ChatPipeline::builder()
            .corpus(corpus)
            .generator(generator)
            .build()
            .context("failed to build the chat pipeline")?;

        let cases: Arc<dyn CaseRecordStore> = match &config.case_record_url {
            Some(url) => {
                info!(%url, "using the HTTP case record service");
                Arc::new(HttpCaseRecordStore::new(url.clone()))
            }
            None => {
                info!("serving demo case records from memory");
                Arc::new(InMemoryCaseStore::with_demo_records())
            }
        };

        Ok(Self::new(Arc::new(pipeline), cases))
    }
}

pub fn app_router(state: AppState) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/chat", post(chat))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

pub async fn run_server(config: ServerConfig, state: AppState) -> anyhow::Result<()> {
    let app = app_router(state);
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| "invalid host/port for digimplant server")?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("digimplant-server listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok".to_string(), service: SERVICE_NAME.to_string() })
}

async fn chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    async move {
        let Json(request) = body.map_err(|rejection| {
            warn!(error = %rejection, "rejected chat request body");
            ApiError::BadRequest("Request body must be a JSON object".to_string())
        })?;

        let message = request
            .message
            .filter(|message| !message.is_empty())
            .ok_or_else(|| ApiError::BadRequest("message required".to_string()))?;

        let case_record = match request.case_record_id.as_deref() {
            Some(id) => lookup_case(state.cases.as_ref(), id).await,
            None => None,
        };

        let outcome = state.pipeline.answer(&message, case_record.as_ref()).await.map_err(|e| {
            error!(error = %e, "chat pipeline failed");
            ApiError::Internal
        })?;

        info!(
            mode = ?outcome.answer.mode,
            retried = outcome.answer.retried,
            match_count = outcome.match_count,
            "chat answered"
        );
        Ok(Json(ChatResponse { response: outcome.answer.text, timestamp: Utc::now() }))
    }
    .instrument(info_span!("chat", %request_id))
    .await
}

async fn lookup_case(cases: &dyn CaseRecordStore, id: &str) -> Option<CaseRecord> {
    match cases.get(id).await {
        Ok(Some(record)) => Some(record),
        Ok(None) => {
            warn!(case_record_id = id, "case record not found");
            None
        }
        Err(e) => {
            warn!(
                case_record_id = id,
                error = %e,
                "case record lookup failed; answering without it"
            );
            None
        }
    }
}
