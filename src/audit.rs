//! Append-only audit log of engine actions.
//!
//! The engine records one entry per mutating operation through the
//! [`AuditSink`] seam; callers choose where the records end up.
//! [`MemoryAudit`] keeps them in memory and supports the date-range and
//! action filters the operations console needs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One audited action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    pub timestamp: DateTime<Utc>,

    /// Action name, e.g. `"place_item"` or `"confirm_return"`.
    pub action: String,

    /// Free-form action payload.
    pub details: serde_json::Value,
}

/// Destination for audit records.
pub trait AuditSink {
    /// Appends a record. Append-only: sinks never rewrite history.
    fn record(&mut self, record: AuditRecord);
}

/// In-memory audit log, retained in append order.
#[derive(Debug, Clone, Default)]
pub struct MemoryAudit {
    records: Vec<AuditRecord>,
}

impl MemoryAudit {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records in append order.
    pub fn records(&self) -> &[AuditRecord] {
        &self.records
    }

    /// Queries records, most recent first.
    ///
    /// `start` and `end` bound the record date inclusively; `action`
    /// filters on exact action name; `limit` caps the result length.
    pub fn query(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        action: Option<&str>,
        limit: usize,
    ) -> Vec<&AuditRecord> {
        let mut matches: Vec<&AuditRecord> = self
            .records
            .iter()
            .filter(|r| {
                let day = r.timestamp.date_naive();
                start.is_none_or(|s| day >= s)
                    && end.is_none_or(|e| day <= e)
                    && action.is_none_or(|a| r.action == a)
            })
            .collect();
        matches.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        matches.truncate(limit);
        matches
    }
}

impl AuditSink for MemoryAudit {
    fn record(&mut self, record: AuditRecord) {
        self.records.push(record);
    }
}

/// Discards every record. For callers that do their own logging.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudit;

impl AuditSink for NullAudit {
    fn record(&mut self, _record: AuditRecord) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, day, hour, 0, 0).unwrap()
    }

    fn sample() -> MemoryAudit {
        let mut audit = MemoryAudit::new();
        audit.record(AuditRecord {
            timestamp: at(1, 9),
            action: "place_item".into(),
            details: json!({"item_id": "item_001"}),
        });
        audit.record(AuditRecord {
            timestamp: at(2, 9),
            action: "retrieve_item".into(),
            details: json!({"item_id": "item_001"}),
        });
        audit.record(AuditRecord {
            timestamp: at(3, 9),
            action: "place_item".into(),
            details: json!({"item_id": "item_002"}),
        });
        audit
    }

    #[test]
    fn test_append_order_retained() {
        let audit = sample();
        assert_eq!(audit.records().len(), 3);
        assert_eq!(audit.records()[0].action, "place_item");
        assert_eq!(audit.records()[1].action, "retrieve_item");
    }

    #[test]
    fn test_query_most_recent_first() {
        let audit = sample();
        let all = audit.query(None, None, None, 10);
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].timestamp, at(3, 9));
        assert_eq!(all[2].timestamp, at(1, 9));
    }

    #[test]
    fn test_query_by_action() {
        let audit = sample();
        let placed = audit.query(None, None, Some("place_item"), 10);
        assert_eq!(placed.len(), 2);
        assert!(placed.iter().all(|r| r.action == "place_item"));
    }

    #[test]
    fn test_query_date_range_inclusive() {
        let audit = sample();
        let day2 = NaiveDate::from_ymd_opt(2026, 8, 2).unwrap();
        let ranged = audit.query(Some(day2), Some(day2), None, 10);
        assert_eq!(ranged.len(), 1);
        assert_eq!(ranged[0].action, "retrieve_item");
    }

    #[test]
    fn test_query_limit() {
        let audit = sample();
        assert_eq!(audit.query(None, None, None, 2).len(), 2);
    }
}
