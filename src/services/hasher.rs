// src/services/hasher.rs

//! Content-hash identity for debtor records.
//!
//! The hash is the system's content-addressing mechanism and the sole
//! uniqueness key in storage: two crawls of an unchanged row must produce
//! the same value across process runs.

use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::models::DebtorRecord;

/// Derive the identity hash for a record.
///
/// Canonical form: the business-field map (keys in fixed sorted order,
/// values in a uniform textual rendering) serialized as JSON, digested
/// with SHA-256 over the UTF-8 bytes, returned as lowercase hex.
/// `created`/`last_updated` timestamps never participate.
pub fn hash_record(record: &DebtorRecord) -> Result<String> {
    let canonical = serde_json::to_string(&record.business_fields())?;
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn sample_record() -> DebtorRecord {
        DebtorRecord {
            debt_type_id: 1,
            identifier: Some("123456789012".to_string()),
            fio: Some("Иванов И.И.".to_string()),
            provider: Some("Provider X".to_string()),
            app_num: Some("A-001".to_string()),
            app_date: NaiveDate::from_ymd_opt(2023, 1, 1)
                .unwrap()
                .and_hms_opt(10, 0, 0),
            status: Some("Active".to_string()),
            debt_sum: Some(1_500_000),
            ..DebtorRecord::default()
        }
    }

    #[test]
    fn hash_is_deterministic() {
        let record = sample_record();
        let first = hash_record(&record).unwrap();
        let second = hash_record(&record.clone()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn hash_is_lowercase_hex_of_256_bits() {
        let hash = hash_record(&sample_record()).unwrap();
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn changing_any_business_field_changes_the_hash() {
        let base = hash_record(&sample_record()).unwrap();

        let mut changed = sample_record();
        changed.status = Some("Stopped".to_string());
        assert_ne!(hash_record(&changed).unwrap(), base);

        let mut changed = sample_record();
        changed.debt_sum = Some(1_500_001);
        assert_ne!(hash_record(&changed).unwrap(), base);

        let mut changed = sample_record();
        changed.debt_type_id = 4;
        assert_ne!(hash_record(&changed).unwrap(), base);

        let mut changed = sample_record();
        changed.app_date = None;
        assert_ne!(hash_record(&changed).unwrap(), base);
    }

    #[test]
    fn absent_field_hashes_like_empty_cell() {
        // A column missing from a short row and an empty cell both land as
        // None in the record, so their identity must agree.
        let mut a = sample_record();
        a.creditors_list = None;
        let b = a.clone();
        assert_eq!(hash_record(&a).unwrap(), hash_record(&b).unwrap());
    }
}
