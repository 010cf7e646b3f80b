// src/models/variant.rs

//! The six registry record families.
//!
//! Each variant is one list page of the registry with its own URL suffix,
//! header labels and field subset. Header labels are matched exactly
//! against the declarative tables below; anything unrecognized is dropped
//! by the column mapper.

/// Canonical record fields a table column can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FieldId {
    Identifier,
    Fio,
    Category,
    Provider,
    AppNum,
    AppDate,
    ProcedureStartDate,
    ProcedureEndDate,
    ProcedureStopNum,
    DecisionDate,
    DecisionStartDate,
    StopInitiator,
    Status,
    CreditorsList,
    DebtSum,
    Region,
}

impl FieldId {
    /// Stable field name, used in error context and as the hash-map key.
    pub fn name(self) -> &'static str {
        match self {
            Self::Identifier => "identifier",
            Self::Fio => "fio",
            Self::Category => "category",
            Self::Provider => "provider",
            Self::AppNum => "app_num",
            Self::AppDate => "app_date",
            Self::ProcedureStartDate => "procedure_start_date",
            Self::ProcedureEndDate => "procedure_end_date",
            Self::ProcedureStopNum => "procedure_stop_num",
            Self::DecisionDate => "decision_date",
            Self::DecisionStartDate => "decision_start_date",
            Self::StopInitiator => "stop_initiator",
            Self::Status => "status",
            Self::CreditorsList => "creditors_list",
            Self::DebtSum => "debt_sum",
            Self::Region => "region",
        }
    }
}

/// Date handling family a variant belongs to.
///
/// The extrajudicial lists render full datetimes; the judicial lists render
/// bare dates and pad their header labels with whitespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Extrajudicial,
    Judicial,
}

/// One of the six registry record families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// Applicants for the extrajudicial bankruptcy procedure
    ExtrajudicialApplicants,
    /// Applicants for the judicial bankruptcy procedure
    JudicialApplicants,
    /// Terminated and cancelled extrajudicial procedures
    TerminatedExtrajudicial,
    /// Register of bankrupts, extrajudicial procedure
    ExtrajudicialBankrupts,
    /// Register of bankrupts, judicial procedure
    JudicialBankrupts,
    /// Solvency restoration cases
    SolvencyRestoration,
}

impl Variant {
    /// All variants in reference-table order.
    pub const ALL: [Variant; 6] = [
        Variant::ExtrajudicialApplicants,
        Variant::JudicialApplicants,
        Variant::TerminatedExtrajudicial,
        Variant::ExtrajudicialBankrupts,
        Variant::JudicialBankrupts,
        Variant::SolvencyRestoration,
    ];

    /// Resolve a variant from its numeric type id (1..=6).
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Self::ExtrajudicialApplicants),
            2 => Some(Self::JudicialApplicants),
            3 => Some(Self::TerminatedExtrajudicial),
            4 => Some(Self::ExtrajudicialBankrupts),
            5 => Some(Self::JudicialBankrupts),
            6 => Some(Self::SolvencyRestoration),
            _ => None,
        }
    }

    /// Numeric type id as stored in `debt_type_id`.
    pub fn id(self) -> i64 {
        match self {
            Self::ExtrajudicialApplicants => 1,
            Self::JudicialApplicants => 2,
            Self::TerminatedExtrajudicial => 3,
            Self::ExtrajudicialBankrupts => 4,
            Self::JudicialBankrupts => 5,
            Self::SolvencyRestoration => 6,
        }
    }

    /// List path below the registry base URL.
    pub fn path_suffix(self) -> &'static str {
        match self {
            Self::ExtrajudicialApplicants => "debtor",
            Self::JudicialApplicants => "debtor/judicial",
            Self::TerminatedExtrajudicial => "debtor/extrajudicial/terminated-and-cancelled",
            Self::ExtrajudicialBankrupts => "bankruptcy-and-insolvent",
            Self::JudicialBankrupts => "bankruptcy/judicial",
            Self::SolvencyRestoration => "bankruptcy/recovery",
        }
    }

    /// Registry title, seeded into the `debt_type_ref` reference table.
    pub fn title(self) -> &'static str {
        match self {
            Self::ExtrajudicialApplicants => {
                "В списке заявителей на процедуру внесудебного банкротства"
            }
            Self::JudicialApplicants => {
                "В списке заявителей на процедуру судебного банкротства"
            }
            Self::TerminatedExtrajudicial => "Объявления о прекращении процедуры",
            Self::ExtrajudicialBankrupts => "В реестре банкротов (внесудебная процедура)",
            Self::JudicialBankrupts => "В реестре банкротов (судебная процедура)",
            Self::SolvencyRestoration => "Восстановление платежеспособности",
        }
    }

    pub fn family(self) -> Family {
        match self {
            Self::ExtrajudicialApplicants
            | Self::TerminatedExtrajudicial
            | Self::ExtrajudicialBankrupts => Family::Extrajudicial,
            Self::JudicialApplicants | Self::JudicialBankrupts | Self::SolvencyRestoration => {
                Family::Judicial
            }
        }
    }

    /// Header-label dictionary: (source label, canonical field) pairs.
    pub fn label_map(self) -> &'static [(&'static str, FieldId)] {
        match self {
            Self::ExtrajudicialApplicants => EXTRAJUDICIAL_APPLICANT_LABELS,
            Self::TerminatedExtrajudicial => TERMINATED_LABELS,
            Self::ExtrajudicialBankrupts => EXTRAJUDICIAL_REGISTER_LABELS,
            Self::JudicialApplicants | Self::JudicialBankrupts | Self::SolvencyRestoration => {
                JUDICIAL_LABELS
            }
        }
    }

    /// Normalize a raw header cell before dictionary lookup.
    ///
    /// The judicial lists pad their labels with whitespace; the
    /// extrajudicial lists are matched verbatim.
    pub fn normalize_label(self, raw: &str) -> &str {
        match self.family() {
            Family::Judicial => raw.trim(),
            Family::Extrajudicial => raw,
        }
    }

    /// Look up the canonical field for a header label, if any.
    pub fn lookup_label(self, label: &str) -> Option<FieldId> {
        self.label_map()
            .iter()
            .find(|(known, _)| *known == label)
            .map(|(_, field)| *field)
    }
}

// The source renders "Cумма" with a Latin "C"; the labels below reproduce
// the registry markup byte for byte.

const EXTRAJUDICIAL_APPLICANT_LABELS: &[(&str, FieldId)] = &[
    ("ИИН заявителя", FieldId::Identifier),
    ("ФИО заявителя", FieldId::Fio),
    ("Услугодатель", FieldId::Provider),
    ("Входящий номер заявления", FieldId::AppNum),
    (
        "Дата подачи заявления от фронт системы на применение процедуры",
        FieldId::AppDate,
    ),
    (
        "Дата начала процедуры внесудебного банкротства",
        FieldId::ProcedureStartDate,
    ),
    ("Статус заявителя", FieldId::Status),
    ("Список кредиторов", FieldId::CreditorsList),
    ("Список кредиторов, данные ПКБ/ГКБ", FieldId::CreditorsList),
    (
        "Cумма задолженности, указанная заявителем, тг.",
        FieldId::DebtSum,
    ),
    ("Cумма задолженности, данные ПКБ/ГКБ, тг.", FieldId::DebtSum),
];

const TERMINATED_LABELS: &[(&str, FieldId)] = &[
    ("ИИН заявителя", FieldId::Identifier),
    ("ФИО заявителя", FieldId::Fio),
    ("Услугодатель", FieldId::Provider),
    ("Входящий номер заявления", FieldId::AppNum),
    (
        "Дата подачи заявления от фронт системы на применение процедуры",
        FieldId::AppDate,
    ),
    (
        "Дата начала процедуры внесудебного банкротства",
        FieldId::ProcedureStartDate,
    ),
    ("Инициатор процедуры", FieldId::StopInitiator),
    (
        "Дата прекращения процедуры внесудебного банкротства",
        FieldId::ProcedureEndDate,
    ),
    (
        "Входящий номер заявления на прекращение",
        FieldId::ProcedureStopNum,
    ),
    ("Список кредиторов", FieldId::CreditorsList),
    (
        "Cумма задолженности, указанная заявителем, тг.",
        FieldId::DebtSum,
    ),
];

const EXTRAJUDICIAL_REGISTER_LABELS: &[(&str, FieldId)] = &[
    ("ИИН заявителя", FieldId::Identifier),
    ("ФИО заявителя", FieldId::Fio),
    ("Услугодатель", FieldId::Provider),
    ("Входящий номер заявления", FieldId::AppNum),
    (
        "Дата подачи заявления от фронт системы на применение процедуры",
        FieldId::AppDate,
    ),
    (
        "Дата начала процедуры внесудебного банкротства",
        FieldId::ProcedureStartDate,
    ),
    (
        "Дата завершения процедуры внесудебного банкротства",
        FieldId::ProcedureEndDate,
    ),
    ("Статус заявителя", FieldId::Status),
    ("Список кредиторов", FieldId::CreditorsList),
    (
        "Cумма задолженности, указанная заявителем, тг.",
        FieldId::DebtSum,
    ),
];

const JUDICIAL_LABELS: &[(&str, FieldId)] = &[
    ("ИИН", FieldId::Identifier),
    ("ФИО", FieldId::Fio),
    ("Категория дела", FieldId::Category),
    ("Дата Иска", FieldId::AppDate),
    ("Дата принятия к производству", FieldId::ProcedureStartDate),
    ("Дата решения суда", FieldId::DecisionDate),
    (
        "Дата вступления в силу решения суда",
        FieldId::DecisionStartDate,
    ),
    ("Дата завершения дела", FieldId::ProcedureEndDate),
    ("Наименование суда", FieldId::Provider),
    ("Регион", FieldId::Region),
    ("Статус дела", FieldId::Status),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_roundtrip() {
        for variant in Variant::ALL {
            assert_eq!(Variant::from_id(variant.id() as u8), Some(variant));
        }
        assert_eq!(Variant::from_id(0), None);
        assert_eq!(Variant::from_id(7), None);
    }

    #[test]
    fn every_variant_has_labels() {
        for variant in Variant::ALL {
            assert!(!variant.label_map().is_empty());
            assert!(!variant.path_suffix().is_empty());
            assert!(!variant.title().is_empty());
        }
    }

    #[test]
    fn families_split_three_three() {
        let judicial = Variant::ALL
            .iter()
            .filter(|v| v.family() == Family::Judicial)
            .count();
        assert_eq!(judicial, 3);
    }

    #[test]
    fn judicial_labels_are_trimmed_before_lookup() {
        let variant = Variant::JudicialApplicants;
        let label = variant.normalize_label("  ИИН \n");
        assert_eq!(variant.lookup_label(label), Some(FieldId::Identifier));
    }

    #[test]
    fn extrajudicial_labels_match_verbatim() {
        let variant = Variant::ExtrajudicialApplicants;
        assert_eq!(
            variant.lookup_label("ИИН заявителя"),
            Some(FieldId::Identifier)
        );
        // Padded labels do not match for this family.
        assert_eq!(variant.lookup_label(" ИИН заявителя "), None);
    }

    #[test]
    fn alternate_creditor_labels_map_to_same_field() {
        let variant = Variant::ExtrajudicialApplicants;
        assert_eq!(
            variant.lookup_label("Список кредиторов"),
            Some(FieldId::CreditorsList)
        );
        assert_eq!(
            variant.lookup_label("Список кредиторов, данные ПКБ/ГКБ"),
            Some(FieldId::CreditorsList)
        );
    }
}
