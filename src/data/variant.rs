//! Raw-schema variants and the fixed template field set.
//!
//! Every variant is a static table: which source column feeds which template
//! slot, how each date field is parsed, which text fields are upper-cased and
//! which product types turn an empty room option into `"Unknown"`. The
//! pipeline is written once against these tables.

use std::collections::BTreeSet;

use super::dates::DatePolicy;

// ---------------------------------------------------------------------------
// TemplateField – the output columns
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TemplateField {
    RowNumber,
    PolicyNo,
    ClientName,
    ClaimNo,
    MemberNo,
    EmpId,
    EmpName,
    PatientName,
    Membership,
    ProductType,
    ClaimType,
    RoomOption,
    Area,
    Plan,
    Classification,
    SecondaryDiagnosis,
    Diagnosis,
    TreatmentPlace,
    TreatmentStart,
    TreatmentFinish,
    Date,
    Year,
    Month,
    ClaimPaid,
    Billed,
    Accepted,
    ExcessCompany,
    ExcessEmployee,
    ExcessTotal,
    Unpaid,
}

impl TemplateField {
    /// Every template field in output order.
    pub const ALL: [TemplateField; 30] = [
        TemplateField::RowNumber,
        TemplateField::PolicyNo,
        TemplateField::ClientName,
        TemplateField::ClaimNo,
        TemplateField::MemberNo,
        TemplateField::EmpId,
        TemplateField::EmpName,
        TemplateField::PatientName,
        TemplateField::Membership,
        TemplateField::ProductType,
        TemplateField::ClaimType,
        TemplateField::RoomOption,
        TemplateField::Area,
        TemplateField::Plan,
        TemplateField::Classification,
        TemplateField::SecondaryDiagnosis,
        TemplateField::Diagnosis,
        TemplateField::TreatmentPlace,
        TemplateField::TreatmentStart,
        TemplateField::TreatmentFinish,
        TemplateField::Date,
        TemplateField::Year,
        TemplateField::Month,
        TemplateField::ClaimPaid,
        TemplateField::Billed,
        TemplateField::Accepted,
        TemplateField::ExcessCompany,
        TemplateField::ExcessEmployee,
        TemplateField::ExcessTotal,
        TemplateField::Unpaid,
    ];

    /// Column header in the exported sheet.
    pub fn header(self) -> &'static str {
        match self {
            TemplateField::RowNumber => "No",
            TemplateField::PolicyNo => "Policy No",
            TemplateField::ClientName => "Client Name",
            TemplateField::ClaimNo => "Claim No",
            TemplateField::MemberNo => "Member No",
            TemplateField::EmpId => "Emp ID",
            TemplateField::EmpName => "Emp Name",
            TemplateField::PatientName => "Patient Name",
            TemplateField::Membership => "Membership",
            TemplateField::ProductType => "Product Type",
            TemplateField::ClaimType => "Claim Type",
            TemplateField::RoomOption => "Room Option",
            TemplateField::Area => "Area",
            TemplateField::Plan => "Plan",
            TemplateField::Classification => "Classification",
            TemplateField::SecondaryDiagnosis => "Secondary Diagnosis",
            TemplateField::Diagnosis => "Diagnosis",
            TemplateField::TreatmentPlace => "Treatment Place",
            TemplateField::TreatmentStart => "Treatment Start",
            TemplateField::TreatmentFinish => "Treatment Finish",
            TemplateField::Date => "Date",
            TemplateField::Year => "Tahun",
            TemplateField::Month => "Bulan",
            TemplateField::ClaimPaid => "Sum of Claim",
            TemplateField::Billed => "Sum of Billed",
            TemplateField::Accepted => "Sum of Accepted",
            TemplateField::ExcessCompany => "Sum of Excess Coy",
            TemplateField::ExcessEmployee => "Sum of Excess Emp",
            TemplateField::ExcessTotal => "Sum of Excess Total",
            TemplateField::Unpaid => "Sum of Unpaid",
        }
    }

    /// Derived fields have no source column.
    pub fn is_derived(self) -> bool {
        matches!(
            self,
            TemplateField::RowNumber | TemplateField::Year | TemplateField::Month
        )
    }
}

// ---------------------------------------------------------------------------
// SchemaVariant
// ---------------------------------------------------------------------------

/// Declarative description of one raw export layout.
#[derive(Debug, PartialEq)]
pub struct SchemaVariant {
    pub name: &'static str,
    pub description: &'static str,
    /// Column carrying the claim status code.
    pub status_column: &'static str,
    /// Template field → source column, for every sourced field the variant has.
    pub columns: &'static [(TemplateField, &'static str)],
    /// Parsing policy of each date field.
    pub dates: &'static [(TemplateField, DatePolicy)],
    /// Text fields that are upper-cased.
    pub upper_case: &'static [TemplateField],
    /// Product types for which an empty room option becomes `"Unknown"`.
    pub unknown_room_for: &'static [&'static str],
}

const PRIMARY_DATE: DatePolicy = DatePolicy::Strict("%d/%m/%Y");

const UPPER_CASE_DEFAULT: &[TemplateField] = &[
    TemplateField::ClientName,
    TemplateField::PatientName,
    TemplateField::RoomOption,
    TemplateField::Diagnosis,
    TemplateField::TreatmentPlace,
];

pub static STANDARD: SchemaVariant = SchemaVariant {
    name: "standard",
    description: "Title Case headers with Claim Paid Note Amount",
    status_column: "Claim Status",
    columns: &[
        (TemplateField::PolicyNo, "Policy No"),
        (TemplateField::ClientName, "Client Name"),
        (TemplateField::ClaimNo, "Claim No"),
        (TemplateField::MemberNo, "Member No"),
        (TemplateField::EmpId, "Emp ID"),
        (TemplateField::EmpName, "Emp Name"),
        (TemplateField::PatientName, "Patient Name"),
        (TemplateField::Membership, "Membership"),
        (TemplateField::ProductType, "Product Type"),
        (TemplateField::ClaimType, "Claim Type"),
        (TemplateField::RoomOption, "Room Option"),
        (TemplateField::Area, "Area"),
        (TemplateField::Diagnosis, "Primary Diagnosis"),
        (TemplateField::TreatmentPlace, "Treatment Place"),
        (TemplateField::TreatmentStart, "Treatment Start"),
        (TemplateField::TreatmentFinish, "Treatment Finish"),
        (TemplateField::Date, "Date"),
        (TemplateField::ClaimPaid, "Claim Paid Note Amount"),
        (TemplateField::Billed, "Billed"),
        (TemplateField::Accepted, "Accepted"),
        (TemplateField::ExcessCompany, "Excess Coy"),
        (TemplateField::ExcessEmployee, "Excess Emp"),
        (TemplateField::ExcessTotal, "Excess Total"),
        (TemplateField::Unpaid, "Unpaid"),
    ],
    dates: &[
        (TemplateField::TreatmentStart, DatePolicy::Tolerant),
        (TemplateField::TreatmentFinish, DatePolicy::Tolerant),
        (TemplateField::Date, PRIMARY_DATE),
    ],
    upper_case: UPPER_CASE_DEFAULT,
    unknown_room_for: &["IP", "MA"],
};

pub static PASCAL: SchemaVariant = SchemaVariant {
    name: "pascal",
    description: "PascalCase headers with Plan, Classification and SecondaryDiagnosis",
    status_column: "ClaimStatus",
    columns: &[
        (TemplateField::PolicyNo, "PolicyNo"),
        (TemplateField::ClientName, "ClientName"),
        (TemplateField::ClaimNo, "ClaimNo"),
        (TemplateField::MemberNo, "MemberNo"),
        (TemplateField::EmpId, "EmpID"),
        (TemplateField::EmpName, "EmpName"),
        (TemplateField::PatientName, "PatientName"),
        (TemplateField::Membership, "Membership"),
        (TemplateField::ProductType, "ProductType"),
        (TemplateField::ClaimType, "ClaimType"),
        (TemplateField::RoomOption, "RoomOption"),
        (TemplateField::Area, "Area"),
        (TemplateField::Plan, "Plan"),
        (TemplateField::Classification, "Classification"),
        (TemplateField::SecondaryDiagnosis, "SecondaryDiagnosis"),
        (TemplateField::Diagnosis, "PrimaryDiagnosis"),
        (TemplateField::TreatmentPlace, "TreatmentPlace"),
        (TemplateField::TreatmentStart, "TreatmentStart"),
        (TemplateField::TreatmentFinish, "TreatmentFinish"),
        (TemplateField::Date, "Date"),
        (TemplateField::Billed, "Billed"),
        (TemplateField::Accepted, "Accepted"),
        (TemplateField::ExcessCompany, "ExcessCoy"),
        (TemplateField::ExcessEmployee, "ExcessEmp"),
        (TemplateField::ExcessTotal, "ExcessTotal"),
        (TemplateField::Unpaid, "Unpaid"),
    ],
    dates: &[
        (TemplateField::TreatmentStart, DatePolicy::Tolerant),
        (TemplateField::TreatmentFinish, DatePolicy::Tolerant),
        (TemplateField::Date, PRIMARY_DATE),
    ],
    upper_case: UPPER_CASE_DEFAULT,
    unknown_room_for: &[],
};

/// Title Case layout carrying every optional column. Exports of this layout
/// have never been upper-cased, unlike the other two; kept as-is until the
/// report owners confirm which behaviour is intended.
pub static EXTENDED: SchemaVariant = SchemaVariant {
    name: "extended",
    description: "Title Case headers with Plan, Classification, Secondary Diagnosis and Claim Paid Note Amount",
    status_column: "Claim Status",
    columns: &[
        (TemplateField::PolicyNo, "Policy No"),
        (TemplateField::ClientName, "Client Name"),
        (TemplateField::ClaimNo, "Claim No"),
        (TemplateField::MemberNo, "Member No"),
        (TemplateField::EmpId, "Emp ID"),
        (TemplateField::EmpName, "Emp Name"),
        (TemplateField::PatientName, "Patient Name"),
        (TemplateField::Membership, "Membership"),
        (TemplateField::ProductType, "Product Type"),
        (TemplateField::ClaimType, "Claim Type"),
        (TemplateField::RoomOption, "Room Option"),
        (TemplateField::Area, "Area"),
        (TemplateField::Plan, "Plan"),
        (TemplateField::Classification, "Classification"),
        (TemplateField::SecondaryDiagnosis, "Secondary Diagnosis"),
        (TemplateField::Diagnosis, "Primary Diagnosis"),
        (TemplateField::TreatmentPlace, "Treatment Place"),
        (TemplateField::TreatmentStart, "Treatment Start"),
        (TemplateField::TreatmentFinish, "Treatment Finish"),
        (TemplateField::Date, "Date"),
        (TemplateField::ClaimPaid, "Claim Paid Note Amount"),
        (TemplateField::Billed, "Billed"),
        (TemplateField::Accepted, "Accepted"),
        (TemplateField::ExcessCompany, "Excess Coy"),
        (TemplateField::ExcessEmployee, "Excess Emp"),
        (TemplateField::ExcessTotal, "Excess Total"),
        (TemplateField::Unpaid, "Unpaid"),
    ],
    dates: &[
        (TemplateField::TreatmentStart, DatePolicy::Strict("%d/%m/%Y")),
        (TemplateField::TreatmentFinish, DatePolicy::Strict("%d/%m/%Y")),
        (TemplateField::Date, PRIMARY_DATE),
    ],
    upper_case: &[],
    unknown_room_for: &[],
};

static VARIANTS: [&SchemaVariant; 3] = [&STANDARD, &PASCAL, &EXTENDED];

impl SchemaVariant {
    /// All built-in variants.
    pub fn all() -> &'static [&'static SchemaVariant] {
        &VARIANTS
    }

    pub fn by_name(name: &str) -> Option<&'static SchemaVariant> {
        VARIANTS
            .iter()
            .copied()
            .find(|v| v.name.eq_ignore_ascii_case(name))
    }

    /// Pick the variant whose required columns are all present in `headers`.
    /// When several match, the one mapping the most columns wins.
    pub fn detect<S: AsRef<str>>(headers: &[S]) -> Option<&'static SchemaVariant> {
        VARIANTS
            .iter()
            .copied()
            .filter(|v| v.missing_columns(headers).is_empty())
            .max_by_key(|v| v.columns.len())
    }

    /// Source column of a template field, `None` for derived or absent fields.
    pub fn source(&self, field: TemplateField) -> Option<&'static str> {
        self.columns
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, col)| *col)
    }

    /// Column holding the claim identifier.
    pub fn claim_column(&self) -> &'static str {
        self.source(TemplateField::ClaimNo).unwrap_or("Claim No")
    }

    pub fn date_policy(&self, field: TemplateField) -> Option<DatePolicy> {
        self.dates
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, policy)| *policy)
    }

    pub fn upper_cases(&self, field: TemplateField) -> bool {
        self.upper_case.contains(&field)
    }

    /// Whether an empty room option is labelled `"Unknown"` for this product type.
    pub fn promotes_unknown_room(&self, product_type: &str) -> bool {
        self.unknown_room_for.contains(&product_type)
    }

    /// Output columns in template order: derived fields plus every mapped field.
    pub fn output_fields(&self) -> Vec<TemplateField> {
        TemplateField::ALL
            .iter()
            .copied()
            .filter(|f| f.is_derived() || self.source(*f).is_some())
            .collect()
    }

    /// Every source column the run needs, in mapping order, status column first.
    pub fn required_columns(&self) -> Vec<&'static str> {
        let mut cols = vec![self.status_column];
        cols.extend(self.columns.iter().map(|(_, col)| *col));
        cols
    }

    /// Required columns absent from `headers`, in mapping order.
    pub fn missing_columns<S: AsRef<str>>(&self, headers: &[S]) -> Vec<String> {
        let present: BTreeSet<&str> = headers.iter().map(|h| h.as_ref()).collect();
        self.required_columns()
            .into_iter()
            .filter(|col| !present.contains(col))
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fields every variant must map. The rest are derived or optional.
    const CORE: [TemplateField; 23] = [
        TemplateField::PolicyNo,
        TemplateField::ClientName,
        TemplateField::ClaimNo,
        TemplateField::MemberNo,
        TemplateField::EmpId,
        TemplateField::EmpName,
        TemplateField::PatientName,
        TemplateField::Membership,
        TemplateField::ProductType,
        TemplateField::ClaimType,
        TemplateField::RoomOption,
        TemplateField::Area,
        TemplateField::Diagnosis,
        TemplateField::TreatmentPlace,
        TemplateField::TreatmentStart,
        TemplateField::TreatmentFinish,
        TemplateField::Date,
        TemplateField::Billed,
        TemplateField::Accepted,
        TemplateField::ExcessCompany,
        TemplateField::ExcessEmployee,
        TemplateField::ExcessTotal,
        TemplateField::Unpaid,
    ];

    #[test]
    fn every_variant_maps_core_fields() {
        for variant in SchemaVariant::all() {
            for field in CORE {
                assert!(
                    variant.source(field).is_some(),
                    "{} does not map {:?}",
                    variant.name,
                    field
                );
            }
            for field in [TemplateField::TreatmentStart, TemplateField::TreatmentFinish, TemplateField::Date] {
                assert!(variant.date_policy(field).is_some());
            }
        }
    }

    #[test]
    fn output_fields_keep_template_order() {
        let fields = STANDARD.output_fields();
        assert_eq!(fields.first(), Some(&TemplateField::RowNumber));
        assert_eq!(fields.last(), Some(&TemplateField::Unpaid));
        assert!(fields.contains(&TemplateField::ClaimPaid));
        assert!(!fields.contains(&TemplateField::Plan));

        let pascal = PASCAL.output_fields();
        let area = pascal.iter().position(|f| *f == TemplateField::Area).unwrap();
        assert_eq!(
            &pascal[area..area + 5],
            &[
                TemplateField::Area,
                TemplateField::Plan,
                TemplateField::Classification,
                TemplateField::SecondaryDiagnosis,
                TemplateField::Diagnosis,
            ]
        );
        assert!(!pascal.contains(&TemplateField::ClaimPaid));
    }

    #[test]
    fn detect_picks_matching_variant() {
        let standard: Vec<&str> = STANDARD.required_columns();
        assert_eq!(SchemaVariant::detect(&standard), Some(&STANDARD));

        let pascal: Vec<&str> = PASCAL.required_columns();
        assert_eq!(SchemaVariant::detect(&pascal), Some(&PASCAL));

        // Extended headers also satisfy the standard layout; the richer one wins.
        let extended: Vec<&str> = EXTENDED.required_columns();
        assert_eq!(SchemaVariant::detect(&extended), Some(&EXTENDED));

        assert_eq!(SchemaVariant::detect(&["Foo", "Bar"]), None);
    }

    #[test]
    fn missing_columns_are_reported_in_mapping_order() {
        let headers: Vec<&str> = STANDARD
            .required_columns()
            .into_iter()
            .filter(|c| *c != "Billed" && *c != "Area")
            .collect();
        assert_eq!(STANDARD.missing_columns(&headers), vec!["Area", "Billed"]);
    }

    #[test]
    fn lookup_by_name_ignores_case() {
        assert_eq!(SchemaVariant::by_name("Pascal"), Some(&PASCAL));
        assert_eq!(SchemaVariant::by_name("nope"), None);
        assert_eq!(STANDARD.claim_column(), "Claim No");
        assert_eq!(PASCAL.claim_column(), "ClaimNo");
        assert!(STANDARD.promotes_unknown_room("IP"));
        assert!(!PASCAL.promotes_unknown_room("IP"));
    }
}
