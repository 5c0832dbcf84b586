//! `digimplant-server` exposes the Digimplant clinical chat over HTTP:
//! `POST /api/chat` answers a clinician question, `GET /health` reports
//! liveness.

pub mod case_store;
pub mod config;
pub mod error;
pub mod protocol;
pub mod server;

pub use case_store::{CaseRecordStore, HttpCaseRecordStore, InMemoryCaseStore};
pub use config::ServerConfig;
pub use error::{ApiError, CaseStoreError};
pub use server::{AppState, app_router, run_server};
