// src/models/record.rs

//! Canonical debtor record.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::Serialize;

/// One normalized registry row.
///
/// `created` and `last_updated` live only in the table schema; the server
/// assigns them, and they never participate in the identity hash.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DebtorRecord {
    /// Content-derived identity, hex SHA-256 of the business fields
    pub hash_value: String,

    /// Variant type id (1..=6), references `debt_type_ref`
    pub debt_type_id: i64,

    /// Subject tax/ID code
    pub identifier: Option<String>,

    /// Subject name
    pub fio: Option<String>,

    /// Case category (judicial family)
    pub category: Option<String>,

    /// Service provider or court name
    pub provider: Option<String>,

    /// Application number
    pub app_num: Option<String>,

    /// Application / claim date
    pub app_date: Option<NaiveDateTime>,

    /// Procedure start date
    pub procedure_start_date: Option<NaiveDateTime>,

    /// Procedure end date
    pub procedure_end_date: Option<NaiveDateTime>,

    /// Termination application number
    pub procedure_stop_num: Option<String>,

    /// Court decision date
    pub decision_date: Option<NaiveDateTime>,

    /// Date the court decision took effect
    pub decision_start_date: Option<NaiveDateTime>,

    /// Initiator of the procedure termination
    pub stop_initiator: Option<String>,

    /// Status text
    pub status: Option<String>,

    /// Creditor list, renumbered onto separate lines
    pub creditors_list: Option<String>,

    /// Debt amount with currency markup stripped
    pub debt_sum: Option<i64>,

    /// Region text
    pub region: Option<String>,
}

/// Rendering of an absent value in the canonical field map.
///
/// Kept uniform for every field so that a column missing from a short row
/// hashes identically to an empty cell.
const NONE_TOKEN: &str = "None";

impl DebtorRecord {
    /// The business fields in a fixed sorted order with uniform textual
    /// values. This is the canonical form the identity hash is computed
    /// over; `hash_value` itself is excluded.
    pub fn business_fields(&self) -> BTreeMap<&'static str, String> {
        let mut fields = BTreeMap::new();
        fields.insert("debt_type_id", self.debt_type_id.to_string());
        fields.insert("identifier", render_text(&self.identifier));
        fields.insert("fio", render_text(&self.fio));
        fields.insert("category", render_text(&self.category));
        fields.insert("provider", render_text(&self.provider));
        fields.insert("app_num", render_text(&self.app_num));
        fields.insert("app_date", render_date(self.app_date));
        fields.insert("procedure_start_date", render_date(self.procedure_start_date));
        fields.insert("procedure_end_date", render_date(self.procedure_end_date));
        fields.insert("procedure_stop_num", render_text(&self.procedure_stop_num));
        fields.insert("decision_date", render_date(self.decision_date));
        fields.insert("decision_start_date", render_date(self.decision_start_date));
        fields.insert("stop_initiator", render_text(&self.stop_initiator));
        fields.insert("status", render_text(&self.status));
        fields.insert("creditors_list", render_text(&self.creditors_list));
        fields.insert("debt_sum", render_amount(self.debt_sum));
        fields.insert("region", render_text(&self.region));
        fields
    }
}

fn render_text(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| NONE_TOKEN.to_string())
}

fn render_date(value: Option<NaiveDateTime>) -> String {
    value
        .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| NONE_TOKEN.to_string())
}

fn render_amount(value: Option<i64>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| NONE_TOKEN.to_string())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn business_fields_cover_every_column() {
        let fields = DebtorRecord::default().business_fields();
        assert_eq!(fields.len(), 17);
        assert!(fields.contains_key("debt_type_id"));
        assert!(!fields.contains_key("hash_value"));
    }

    #[test]
    fn dates_render_canonically() {
        let record = DebtorRecord {
            app_date: NaiveDate::from_ymd_opt(2023, 1, 1)
                .unwrap()
                .and_hms_opt(10, 0, 0),
            ..DebtorRecord::default()
        };
        let fields = record.business_fields();
        assert_eq!(fields["app_date"], "2023-01-01 10:00:00");
        assert_eq!(fields["decision_date"], "None");
    }
}
