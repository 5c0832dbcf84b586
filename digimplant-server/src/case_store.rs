//! Case-record lookup.
//!
//! A chat request may name a planned case; its record is fetched from a
//! [`CaseRecordStore`] and summarized into the prompt context. Lookups are
//! best effort: the handler answers without the record when the store fails.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use digimplant_rag::{CaseRecord, ImplantDetails, SurgicalPlan};
use reqwest::StatusCode;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::CaseStoreError;

#[async_trait]
pub trait CaseRecordStore: Send + Sync {
    /// Fetch a record; `Ok(None)` when no record has that id.
    async fn get(&self, id: &str) -> Result<Option<CaseRecord>, CaseStoreError>;

    /// Create or replace a record.
    async fn put(&self, id: &str, record: CaseRecord) -> Result<(), CaseStoreError>;
}

/// Records held in process memory.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCaseStore {
    records: Arc<RwLock<HashMap<String, CaseRecord>>>,
}

impl InMemoryCaseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store seeded with the two demo orders served in demo mode.
    pub fn with_demo_records() -> Self {
        let records =
            demo_records().into_iter().map(|(id, record)| (id.to_string(), record)).collect();
        Self { records: Arc::new(RwLock::new(records)) }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl CaseRecordStore for InMemoryCaseStore {
    async fn get(&self, id: &str) -> Result<Option<CaseRecord>, CaseStoreError> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn put(&self, id: &str, record: CaseRecord) -> Result<(), CaseStoreError> {
        self.records.write().await.insert(id.to_string(), record);
        Ok(())
    }
}

/// Records served by the order service at `{base}/api/reports/{id}`.
#[derive(Debug, Clone)]
pub struct HttpCaseRecordStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCaseRecordStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn record_url(&self, id: &str) -> String {
        format!("{}/api/reports/{id}", self.base_url)
    }
}

#[async_trait]
impl CaseRecordStore for HttpCaseRecordStore {
    async fn get(&self, id: &str) -> Result<Option<CaseRecord>, CaseStoreError> {
        let url = self.record_url(id);
        debug!(%url, "fetching case record");
        let response = self.client.get(&url).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(response.json::<CaseRecord>().await?)),
            status => Err(CaseStoreError::Status { id: id.to_string(), status }),
        }
    }

    async fn put(&self, id: &str, record: CaseRecord) -> Result<(), CaseStoreError> {
        let response = self.client.put(self.record_url(id)).json(&record).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(CaseStoreError::Status { id: id.to_string(), status })
        }
    }
}

fn demo_records() -> [(&'static str, CaseRecord); 2] {
    [
        (
            "mock-order-1",
            CaseRecord {
                patient_name: "Ahmet Yılmaz".to_string(),
                implant_details: ImplantDetails {
                    brand: "Nobel Biocare".to_string(),
                    model: "NobelActive".to_string(),
                    count: 2,
                    positions: vec!["16".to_string(), "26".to_string()],
                },
                prosthesis_type: "Tek diş kron".to_string(),
                surgical_plan: SurgicalPlan {
                    approach: "Flapsız cerrahi".to_string(),
                    bone_quality: "D2-D1".to_string(),
                    recommendations: vec!["İmmediate loading".to_string()],
                },
                ..CaseRecord::default()
            },
        ),
        (
            "mock-order-2",
            CaseRecord {
                patient_name: "Ayşe Demir".to_string(),
                implant_details: ImplantDetails {
                    brand: "Straumann".to_string(),
                    model: "BLT".to_string(),
                    count: 1,
                    positions: vec!["36".to_string()],
                },
                prosthesis_type: "Köprü".to_string(),
                surgical_plan: SurgicalPlan {
                    approach: "Flapsız cerrahi".to_string(),
                    bone_quality: "D2".to_string(),
                    recommendations: vec!["Delayed loading".to_string()],
                },
                ..CaseRecord::default()
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn demo_store_serves_seeded_orders() {
        let store = InMemoryCaseStore::with_demo_records();
        assert_eq!(store.len().await, 2);

        let record = store.get("mock-order-2").await.unwrap().unwrap();
        assert_eq!(record.patient_name, "Ayşe Demir");
        assert_eq!(record.implant_details.positions, vec!["36"]);
        assert!(store.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn put_replaces_records() {
        let store = InMemoryCaseStore::new();
        assert!(store.is_empty().await);

        let record = CaseRecord { patient_name: "Test".into(), ..CaseRecord::default() };
        store.put("case-1", record.clone()).await.unwrap();
        assert_eq!(store.get("case-1").await.unwrap(), Some(record));
    }

    #[test]
    fn http_store_builds_report_urls() {
        let store = HttpCaseRecordStore::new("http://orders.local/");
        assert_eq!(store.record_url("abc"), "http://orders.local/api/reports/abc");
    }
}
