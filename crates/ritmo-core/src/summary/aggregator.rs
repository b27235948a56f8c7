use std::sync::Arc;

use chrono::NaiveDate;

use super::{DaySummary, SummaryEntry};
use crate::error::StoreError;
use crate::notify::SummaryPresenter;
use crate::storage::{day_summary_key, PersistenceStore};

/// Read the stored summary for `date`.
///
/// Returns `None` when nothing is stored or the stored value is unreadable.
pub fn load_summary(store: &dyn PersistenceStore, date: NaiveDate) -> Option<DaySummary> {
    let key = day_summary_key(date);
    match store.get(&key) {
        Ok(Some(json)) => match serde_json::from_str::<DaySummary>(&json) {
            Ok(summary) => Some(summary),
            Err(e) => {
                tracing::warn!(%key, error = %e, "ignoring malformed day summary");
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(%key, error = %e, "failed to read day summary");
            None
        }
    }
}

/// Owns the current day's summary and keeps the store in step with it.
pub struct DailyAggregator {
    store: Arc<dyn PersistenceStore>,
    presenter: Arc<dyn SummaryPresenter>,
    current: Option<DaySummary>,
}

impl DailyAggregator {
    pub fn new(store: Arc<dyn PersistenceStore>, presenter: Arc<dyn SummaryPresenter>) -> Self {
        Self {
            store,
            presenter,
            current: None,
        }
    }

    pub fn current(&self) -> Option<&DaySummary> {
        self.current.as_ref()
    }

    /// Make the stored summary for `date` current, or start an empty one.
    pub fn load_or_start_day(&mut self, date: NaiveDate) -> &DaySummary {
        let stored = load_summary(self.store.as_ref(), date);
        match stored {
            Some(summary) => {
                tracing::debug!(%date, tasks = summary.total_task_count, "loaded day summary");
                &*self.current.insert(summary)
            }
            None => self.start_day(date),
        }
    }

    /// Begin a fresh, empty summary for `date`, replacing anything stored.
    pub fn start_day(&mut self, date: NaiveDate) -> &DaySummary {
        tracing::debug!(%date, "starting day summary");
        let summary = DaySummary::empty(date);
        persist(self.store.as_ref(), &summary);
        &*self.current.insert(summary)
    }

    /// Load `date` unless it is already the current day.
    pub fn ensure_day(&mut self, date: NaiveDate) -> &DaySummary {
        let is_current = self.current.as_ref().is_some_and(|c| c.date == date);
        if !is_current {
            return self.load_or_start_day(date);
        }
        &*self.current.get_or_insert_with(|| DaySummary::empty(date))
    }

    /// Append a finished session and persist. No-op when no day is current.
    pub fn record_completion(&mut self, entry: SummaryEntry) -> Option<&DaySummary> {
        let summary = self.current.as_mut()?;
        summary.push(entry);
        persist(self.store.as_ref(), summary);
        Some(&*summary)
    }

    /// Persist the current summary and hand it to the presenter.
    pub fn end_day(&mut self) -> Option<DaySummary> {
        let summary = self.current.as_ref()?;
        persist(self.store.as_ref(), summary);
        self.presenter.show_day_summary(summary);
        Some(summary.clone())
    }
}

fn persist(store: &dyn PersistenceStore, summary: &DaySummary) {
    let key = day_summary_key(summary.date);
    let result = serde_json::to_string(summary)
        .map_err(StoreError::from)
        .and_then(|json| store.set(&key, &json));
    if let Err(e) = result {
        tracing::warn!(%key, error = %e, "failed to persist day summary");
    }
}
