use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, NaiveDate, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use pathways::progress::ActivityRecord;
use pathways::store::{ActivityLog, StoreError};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Activity log double for demos and tests; records live in process memory
/// and die with it.
#[derive(Default, Clone)]
pub(crate) struct InMemoryActivityLog {
    records: Arc<Mutex<Vec<ActivityRecord>>>,
}

impl InMemoryActivityLog {
    pub(crate) fn records(&self) -> Vec<ActivityRecord> {
        self.records.lock().expect("activity mutex poisoned").clone()
    }
}

impl ActivityLog for InMemoryActivityLog {
    fn append(&self, record: ActivityRecord) -> Result<(), StoreError> {
        self.records
            .lock()
            .expect("activity mutex poisoned")
            .push(record);
        Ok(())
    }

    fn for_user(&self, user_id: &str) -> Result<Vec<ActivityRecord>, StoreError> {
        Ok(self
            .records
            .lock()
            .expect("activity mutex poisoned")
            .iter()
            .filter(|record| record.user_id == user_id)
            .cloned()
            .collect())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

/// Noon UTC on the given date, for report runs pinned to a day.
pub(crate) fn report_instant(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(12, 0, 0).expect("valid time of day").and_utc()
}
