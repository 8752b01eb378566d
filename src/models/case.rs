//! Case record data model
//!
//! A case is one employee observation spanning an initial and a final
//! evaluation phase. Each catalog item gets one [`EvaluationRow`] holding a
//! single [`Choice`] per phase, so YES and NO can never both be set.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Evaluation phase of a case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Phase {
    Initial,
    Final,
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Initial => "initial",
            Phase::Final => "final",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "initial" | "inicial" | "i" => Ok(Phase::Initial),
            "final" | "f" => Ok(Phase::Final),
            other => Err(format!("unknown phase '{}' (expected initial or final)", other)),
        }
    }
}

/// Answer for one row in one phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Choice {
    #[default]
    Unset,
    Yes,
    No,
}

impl Choice {
    pub fn as_str(&self) -> &'static str {
        match self {
            Choice::Unset => "",
            Choice::Yes => "YES",
            Choice::No => "NO",
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::Unset => f.write_str("-"),
            other => f.write_str(other.as_str()),
        }
    }
}

impl FromStr for Choice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "" | "UNSET" | "-" => Ok(Choice::Unset),
            "YES" | "Y" | "SI" | "SÍ" => Ok(Choice::Yes),
            "NO" | "N" => Ok(Choice::No),
            other => Err(format!("unknown choice '{}' (expected yes, no or unset)", other)),
        }
    }
}

impl TryFrom<String> for Choice {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Choice> for String {
    fn from(choice: Choice) -> Self {
        choice.as_str().to_string()
    }
}

/// Initial and final answers for a single catalog item
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RowWire")]
pub struct EvaluationRow {
    pub initial: Choice,

    #[serde(rename = "final")]
    pub final_: Choice,
}

impl EvaluationRow {
    pub fn choice(&self, phase: Phase) -> Choice {
        match phase {
            Phase::Initial => self.initial,
            Phase::Final => self.final_,
        }
    }

    /// Set the answer for one phase. The other answer of that phase is
    /// implicitly cleared since a phase holds exactly one `Choice`.
    pub fn select(self, phase: Phase, choice: Choice) -> Self {
        match phase {
            Phase::Initial => Self {
                initial: choice,
                ..self
            },
            Phase::Final => Self {
                final_: choice,
                ..self
            },
        }
    }
}

/// Accepted row keys: the current `{initial, final}` form and the
/// four-column layout older drafts were saved with. Missing keys read as
/// unset; phased keys win over columns.
#[derive(Deserialize)]
struct RowWire {
    #[serde(default)]
    initial: Option<Choice>,
    #[serde(default, rename = "final")]
    final_: Option<Choice>,
    #[serde(default, rename = "inicialSi")]
    initial_yes: Option<String>,
    #[serde(default, rename = "inicialNo")]
    initial_no: Option<String>,
    #[serde(default, rename = "finalSi")]
    final_yes: Option<String>,
    #[serde(default, rename = "finalNo")]
    final_no: Option<String>,
}

fn from_columns(yes: Option<&str>, no: Option<&str>) -> Choice {
    let filled = |cell: Option<&str>| cell.is_some_and(|c| !c.trim().is_empty());
    if filled(yes) {
        Choice::Yes
    } else if filled(no) {
        Choice::No
    } else {
        Choice::Unset
    }
}

impl From<RowWire> for EvaluationRow {
    fn from(wire: RowWire) -> Self {
        Self {
            initial: wire.initial.unwrap_or_else(|| {
                from_columns(wire.initial_yes.as_deref(), wire.initial_no.as_deref())
            }),
            final_: wire.final_.unwrap_or_else(|| {
                from_columns(wire.final_yes.as_deref(), wire.final_no.as_deref())
            }),
        }
    }
}

/// Metadata field of the employee header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataField {
    Date,
    Name,
    Area,
    Tenure,
    Supervisor,
}

impl MetadataField {
    pub const ALL: [MetadataField; 5] = [
        MetadataField::Date,
        MetadataField::Name,
        MetadataField::Area,
        MetadataField::Tenure,
        MetadataField::Supervisor,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MetadataField::Date => "date",
            MetadataField::Name => "name",
            MetadataField::Area => "area",
            MetadataField::Tenure => "tenure",
            MetadataField::Supervisor => "supervisor",
        }
    }
}

impl fmt::Display for MetadataField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MetadataField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "date" | "fecha" => Ok(MetadataField::Date),
            "name" | "nombre" => Ok(MetadataField::Name),
            "area" | "área" => Ok(MetadataField::Area),
            "tenure" | "antiguedad" | "antigüedad" => Ok(MetadataField::Tenure),
            "supervisor" => Ok(MetadataField::Supervisor),
            other => Err(format!(
                "unknown field '{}' (expected date, name, area, tenure or supervisor)",
                other
            )),
        }
    }
}

/// Employee header of a case, all free text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmployeeInfo {
    #[serde(alias = "fecha")]
    pub date: String,

    #[serde(alias = "nombre")]
    pub name: String,

    pub area: String,

    #[serde(alias = "antiguedad")]
    pub tenure: String,

    pub supervisor: String,
}

impl EmployeeInfo {
    pub fn get(&self, field: MetadataField) -> &str {
        match field {
            MetadataField::Date => &self.date,
            MetadataField::Name => &self.name,
            MetadataField::Area => &self.area,
            MetadataField::Tenure => &self.tenure,
            MetadataField::Supervisor => &self.supervisor,
        }
    }

    fn slot(&mut self, field: MetadataField) -> &mut String {
        match field {
            MetadataField::Date => &mut self.date,
            MetadataField::Name => &mut self.name,
            MetadataField::Area => &mut self.area,
            MetadataField::Tenure => &mut self.tenure,
            MetadataField::Supervisor => &mut self.supervisor,
        }
    }

    pub fn with(mut self, field: MetadataField, value: impl Into<String>) -> Self {
        *self.slot(field) = value.into();
        self
    }
}

/// Compliance percentage for one phase: share of rows answered YES,
/// rounded half-up and clamped to 0..=100. An empty row set yields 0.
pub fn compliance_pct(rows: &[EvaluationRow], phase: Phase) -> u8 {
    let total = rows.len();
    if total == 0 {
        return 0;
    }
    let yes = rows
        .iter()
        .filter(|row| row.choice(phase) == Choice::Yes)
        .count();
    let pct = (200 * yes + total) / (2 * total);
    pct.min(100) as u8
}

/// One employee observation: header plus one row per catalog item.
///
/// Percentages are never stored. They are serialized for the backend and
/// ignored when a record is read back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CaseRecord {
    #[serde(flatten)]
    pub employee: EmployeeInfo,

    #[serde(rename = "evaluations", alias = "evaluaciones", default)]
    pub rows: Vec<EvaluationRow>,
}

impl CaseRecord {
    /// Empty record with `row_count` unset rows
    pub fn new(row_count: usize) -> Self {
        Self {
            employee: EmployeeInfo::default(),
            rows: vec![EvaluationRow::default(); row_count],
        }
    }

    pub fn compliance_pct(&self, phase: Phase) -> u8 {
        compliance_pct(&self.rows, phase)
    }

    pub fn initial_compliance_pct(&self) -> u8 {
        self.compliance_pct(Phase::Initial)
    }

    pub fn final_compliance_pct(&self) -> u8 {
        self.compliance_pct(Phase::Final)
    }

    /// Pad with unset rows or truncate so the record matches the catalog
    pub fn normalized(mut self, row_count: usize) -> Self {
        self.rows.resize(row_count, EvaluationRow::default());
        self
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CaseRecordView<'a> {
    #[serde(flatten)]
    employee: &'a EmployeeInfo,
    evaluations: &'a [EvaluationRow],
    initial_compliance_pct: u8,
    final_compliance_pct: u8,
}

impl Serialize for CaseRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        CaseRecordView {
            employee: &self.employee,
            evaluations: &self.rows,
            initial_compliance_pct: self.initial_compliance_pct(),
            final_compliance_pct: self.final_compliance_pct(),
        }
        .serialize(serializer)
    }
}
