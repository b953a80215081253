use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::common::errors::Result;
use crate::common::types::{CalculatorInput, CalculatorResult};

/// A saved calculation
///
/// Plain serde data: any storage layer can persist it keyed by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRecord {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub label: Option<String>,
    pub input: CalculatorInput,
    pub result: CalculatorResult,
}

impl CalculationRecord {
    pub fn new(input: CalculatorInput, result: CalculatorResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            label: None,
            input,
            result,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Storage seam for calculation history
///
/// The engine never touches storage; callers hand records to whichever
/// store they use.
pub trait HistoryStore: Send + Sync {
    /// Store a record and return its id
    fn save(&mut self, record: CalculationRecord) -> Uuid;

    fn get(&self, id: &Uuid) -> Option<CalculationRecord>;

    /// All records, newest first
    fn list(&self) -> Vec<CalculationRecord>;

    fn remove(&mut self, id: &Uuid) -> Option<CalculationRecord>;

    fn clear(&mut self);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Most recent record, if any
    fn latest(&self) -> Option<CalculationRecord> {
        self.list().into_iter().next()
    }

    /// Only the records that were arbitrages
    fn arbitrages(&self) -> Vec<CalculationRecord> {
        self.list()
            .into_iter()
            .filter(|record| record.result.is_arbitrage)
            .collect()
    }

    /// Serialize all records, newest first
    fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.list())?)
    }
}

/// Bounded in-memory history; the oldest record is evicted when full
#[derive(Debug, Clone)]
pub struct InMemoryHistory {
    records: VecDeque<CalculationRecord>,
    capacity: usize,
}

impl InMemoryHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(capacity.min(1024)),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Rebuild from JSON produced by [`HistoryStore::export_json`]
    pub fn from_json(json: &str, capacity: usize) -> Result<Self> {
        let mut records: Vec<CalculationRecord> = serde_json::from_str(json)?;
        // exported newest first; equal timestamps keep that order after the stable sort
        records.reverse();
        records.sort_by_key(|record| record.created_at);

        let mut history = Self::new(capacity);
        for record in records {
            history.push(record);
        }
        Ok(history)
    }

    fn push(&mut self, record: CalculationRecord) {
        if self.records.len() == self.capacity {
            if let Some(evicted) = self.records.pop_front() {
                info!("History full, evicting calculation {}", evicted.id);
            }
        }
        self.records.push_back(record);
    }
}

impl Default for InMemoryHistory {
    fn default() -> Self {
        Self::new(100)
    }
}

impl HistoryStore for InMemoryHistory {
    fn save(&mut self, record: CalculationRecord) -> Uuid {
        let id = record.id;
        self.push(record);
        id
    }

    fn get(&self, id: &Uuid) -> Option<CalculationRecord> {
        self.records.iter().find(|record| &record.id == id).cloned()
    }

    fn list(&self) -> Vec<CalculationRecord> {
        self.records.iter().rev().cloned().collect()
    }

    fn remove(&mut self, id: &Uuid) -> Option<CalculationRecord> {
        let position = self.records.iter().position(|record| &record.id == id)?;
        self.records.remove(position)
    }

    fn clear(&mut self) {
        self.records.clear();
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}

/// Boxed history store for dynamic dispatch
pub type BoxedHistoryStore = Box<dyn HistoryStore>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::ArbitrageCalculator;
    use crate::common::types::OddsLeg;

    fn record(odds: [f64; 2]) -> CalculationRecord {
        let input = CalculatorInput::new(
            vec![OddsLeg::new("alpha", odds[0]), OddsLeg::new("beta", odds[1])],
            100.0,
        );
        let result = ArbitrageCalculator::default().calculate(&input).unwrap();
        CalculationRecord::new(input, result)
    }

    #[test]
    fn test_save_get_remove() {
        let mut history = InMemoryHistory::default();
        assert!(history.is_empty());

        let id = history.save(record([2.1, 2.2]));
        assert_eq!(history.len(), 1);
        assert_eq!(history.get(&id).unwrap().id, id);

        let removed = history.remove(&id).unwrap();
        assert_eq!(removed.id, id);
        assert!(history.get(&id).is_none());
        assert!(history.remove(&id).is_none());
    }

    #[test]
    fn test_newest_first_and_eviction() {
        let mut history = InMemoryHistory::new(2);
        let first = history.save(record([2.1, 2.2]));
        let second = history.save(record([1.8, 1.9]));
        let third = history.save(record([2.0, 2.0]));

        assert_eq!(history.len(), 2);
        assert!(history.get(&first).is_none());
        let ids: Vec<Uuid> = history.list().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![third, second]);
        assert_eq!(history.latest().unwrap().id, third);
    }

    #[test]
    fn test_arbitrage_filter() {
        let mut history = InMemoryHistory::default();
        let arb = history.save(record([2.1, 2.2]));
        history.save(record([1.8, 1.9]));

        let arbs = history.arbitrages();
        assert_eq!(arbs.len(), 1);
        assert_eq!(arbs[0].id, arb);
    }

    #[test]
    fn test_json_round_trip_keeps_order() {
        let mut history = InMemoryHistory::default();
        history.save(record([2.1, 2.2]).with_label("derby"));
        history.save(record([1.8, 1.9]));

        let json = history.export_json().unwrap();
        let restored = InMemoryHistory::from_json(&json, 10).unwrap();

        assert_eq!(restored.list(), history.list());
        assert_eq!(restored.list()[1].label.as_deref(), Some("derby"));
    }

    #[test]
    fn test_bad_json_is_an_error() {
        let err = InMemoryHistory::from_json("{not json", 10).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Serialization);
    }
}
