// src/services/mapper.rs

//! Variant-specific field mapping.
//!
//! Translates a raw header row into a column-to-field assignment and a raw
//! data row into a canonical record. Unrecognized header labels drop the
//! column; a cell that fails to parse against its expected type is a hard
//! layout error, because a malformed date or amount means the source page
//! structure changed.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

use crate::error::{AppError, Result};
use crate::models::{DebtorRecord, Family, FieldId, Variant};

/// Column index to canonical field assignment for one page.
pub type ColumnMap = BTreeMap<usize, FieldId>;

const DATETIME_FORMAT: &str = "%d.%m.%Y %H:%M:%S";
const DATE_FORMAT: &str = "%d.%m.%Y";

/// Build the column map from a header row.
///
/// Labels not present in the variant's dictionary are skipped.
pub fn build_column_map(headers: &[String], variant: Variant) -> ColumnMap {
    let mut map = ColumnMap::new();
    for (index, raw) in headers.iter().enumerate() {
        let label = variant.normalize_label(raw);
        if let Some(field) = variant.lookup_label(label) {
            map.insert(index, field);
        }
    }
    map
}

/// Extract a canonical record from a data row.
///
/// A short row maps its missing columns to `None` rather than failing;
/// the identity hash is not filled in here.
pub fn extract_record(
    cells: &[String],
    map: &ColumnMap,
    variant: Variant,
) -> Result<DebtorRecord> {
    let mut record = DebtorRecord {
        debt_type_id: variant.id(),
        ..DebtorRecord::default()
    };
    for (&index, &field) in map {
        let raw = cells.get(index).map(String::as_str).unwrap_or("");
        assign_field(&mut record, field, raw.trim(), variant)?;
    }
    Ok(record)
}

fn assign_field(
    record: &mut DebtorRecord,
    field: FieldId,
    value: &str,
    variant: Variant,
) -> Result<()> {
    match field {
        FieldId::Identifier => record.identifier = opt_text(value),
        FieldId::Fio => record.fio = opt_text(value),
        FieldId::Category => record.category = opt_text(value),
        FieldId::Provider => record.provider = opt_text(value),
        FieldId::AppNum => record.app_num = opt_text(value),
        FieldId::ProcedureStopNum => record.procedure_stop_num = opt_text(value),
        FieldId::StopInitiator => record.stop_initiator = opt_text(value),
        FieldId::Status => record.status = opt_text(value),
        FieldId::Region => record.region = opt_text(value),
        FieldId::CreditorsList => {
            record.creditors_list = opt_text(value).map(|v| renumber_creditors(&v));
        }
        FieldId::DebtSum => record.debt_sum = parse_amount(value, variant, field)?,
        FieldId::AppDate => record.app_date = parse_date(value, variant, field)?,
        FieldId::ProcedureStartDate => {
            record.procedure_start_date = parse_date(value, variant, field)?;
        }
        FieldId::ProcedureEndDate => {
            record.procedure_end_date = parse_date(value, variant, field)?;
        }
        FieldId::DecisionDate => record.decision_date = parse_date(value, variant, field)?,
        FieldId::DecisionStartDate => {
            record.decision_start_date = parse_date(value, variant, field)?;
        }
    }
    Ok(())
}

fn opt_text(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Parse a date cell with the variant family's format; empty cells are null.
fn parse_date(value: &str, variant: Variant, field: FieldId) -> Result<Option<NaiveDateTime>> {
    if value.is_empty() {
        return Ok(None);
    }
    let parsed = match variant.family() {
        Family::Extrajudicial => NaiveDateTime::parse_from_str(value, DATETIME_FORMAT),
        Family::Judicial => {
            NaiveDate::parse_from_str(value, DATE_FORMAT).map(|d| d.and_time(NaiveTime::MIN))
        }
    };
    parsed.map(Some).map_err(|e| {
        AppError::layout(
            field_context(variant, field),
            format!("cannot parse date '{value}': {e}"),
        )
    })
}

/// Strip everything but digits and parse the remainder; a cell with no
/// digits at all is null.
fn parse_amount(value: &str, variant: Variant, field: FieldId) -> Result<Option<i64>> {
    let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return Ok(None);
    }
    digits.parse().map(Some).map_err(|e| {
        AppError::layout(
            field_context(variant, field),
            format!("cannot parse amount '{value}': {e}"),
        )
    })
}

/// Insert a line break before every numbered ordinal marker (`N)`) and
/// strip leading breaks, so a run-on creditor list reads one per line.
fn renumber_creditors(text: &str) -> String {
    static ORDINAL: OnceLock<Regex> = OnceLock::new();
    let re = ORDINAL.get_or_init(|| Regex::new(r"(\d+\))").expect("ordinal pattern compiles"));
    re.replace_all(text, "\n$1")
        .trim_start_matches('\n')
        .to_string()
}

fn field_context(variant: Variant, field: FieldId) -> String {
    format!("type {} column {}", variant.id(), field.name())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    /// Header and row as rendered by the extrajudicial applicants list.
    fn applicant_header() -> Vec<String> {
        cells(&[
            "ИИН заявителя",
            "ФИО заявителя",
            "Услугодатель",
            "Входящий номер заявления",
            "Дата подачи заявления от фронт системы на применение процедуры",
            "Дата начала процедуры внесудебного банкротства",
            "Статус заявителя",
            "Список кредиторов",
            "Cумма задолженности, указанная заявителем, тг.",
        ])
    }

    #[test]
    fn maps_known_labels_and_drops_unknown() {
        let mut headers = applicant_header();
        headers.insert(3, "Колонка без маппинга".to_string());
        let map = build_column_map(&headers, Variant::ExtrajudicialApplicants);

        assert_eq!(map.get(&0), Some(&FieldId::Identifier));
        assert_eq!(map.get(&3), None);
        assert_eq!(map.get(&4), Some(&FieldId::AppNum));
        assert_eq!(map.len(), 9);
    }

    #[test]
    fn extracts_full_applicant_row() {
        let map = build_column_map(&applicant_header(), Variant::ExtrajudicialApplicants);
        let row = cells(&[
            "123456789012",
            "Иванов И.И.",
            "Provider X",
            "A-001",
            "01.01.2023 10:00:00",
            "02.01.2023 10:00:00",
            "Active",
            "1)Bank A 2)Bank B",
            "1500000",
        ]);

        let record = extract_record(&row, &map, Variant::ExtrajudicialApplicants).unwrap();
        assert_eq!(record.debt_type_id, 1);
        assert_eq!(record.identifier.as_deref(), Some("123456789012"));
        assert_eq!(record.fio.as_deref(), Some("Иванов И.И."));
        assert_eq!(record.provider.as_deref(), Some("Provider X"));
        assert_eq!(record.app_num.as_deref(), Some("A-001"));
        assert_eq!(
            record.app_date.unwrap().to_string(),
            "2023-01-01 10:00:00"
        );
        assert_eq!(
            record.procedure_start_date.unwrap().to_string(),
            "2023-01-02 10:00:00"
        );
        assert_eq!(record.status.as_deref(), Some("Active"));
        assert_eq!(record.creditors_list.as_deref(), Some("1)Bank A \n2)Bank B"));
        assert_eq!(record.debt_sum, Some(1_500_000));
    }

    #[test]
    fn short_row_maps_missing_columns_to_null() {
        let map = build_column_map(&applicant_header(), Variant::ExtrajudicialApplicants);
        let row = cells(&["123456789012", "Иванов И.И."]);

        let record = extract_record(&row, &map, Variant::ExtrajudicialApplicants).unwrap();
        assert_eq!(record.identifier.as_deref(), Some("123456789012"));
        assert_eq!(record.app_date, None);
        assert_eq!(record.debt_sum, None);
        assert_eq!(record.status, None);
    }

    #[test]
    fn malformed_date_is_a_layout_error() {
        let map = build_column_map(&applicant_header(), Variant::ExtrajudicialApplicants);
        let mut row = cells(&["1", "2", "3", "4", "2023-01-01", "", "", "", ""]);
        let err = extract_record(&row, &map, Variant::ExtrajudicialApplicants).unwrap_err();
        assert!(matches!(err, AppError::Layout { .. }));

        // Empty date cells stay null instead of failing.
        row[4] = String::new();
        let record = extract_record(&row, &map, Variant::ExtrajudicialApplicants).unwrap();
        assert_eq!(record.app_date, None);
    }

    #[test]
    fn judicial_rows_use_date_only_format() {
        let headers = cells(&["ИИН", "Дата Иска", "Регион"]);
        let map = build_column_map(&headers, Variant::JudicialApplicants);
        let row = cells(&["990101300123", "15.03.2024", "Алматы"]);

        let record = extract_record(&row, &map, Variant::JudicialApplicants).unwrap();
        assert_eq!(
            record.app_date.unwrap().to_string(),
            "2024-03-15 00:00:00"
        );
        assert_eq!(record.region.as_deref(), Some("Алматы"));
    }

    #[test]
    fn amount_strips_currency_markup() {
        let headers = cells(&["Cумма задолженности, указанная заявителем, тг."]);
        let map = build_column_map(&headers, Variant::ExtrajudicialApplicants);

        let record =
            extract_record(&cells(&["1 500 000 тг."]), &map, Variant::ExtrajudicialApplicants)
                .unwrap();
        assert_eq!(record.debt_sum, Some(1_500_000));

        let record =
            extract_record(&cells(&["нет данных"]), &map, Variant::ExtrajudicialApplicants)
                .unwrap();
        assert_eq!(record.debt_sum, None);
    }

    #[test]
    fn creditor_list_renumbering() {
        assert_eq!(
            renumber_creditors("1)Bank A 2)Bank B 3)Bank C"),
            "1)Bank A \n2)Bank B \n3)Bank C"
        );
        // Leading break from a list that starts with an ordinal is stripped.
        assert_eq!(renumber_creditors("1)Bank A"), "1)Bank A");
        assert_eq!(renumber_creditors("no ordinals here"), "no ordinals here");
    }
}
