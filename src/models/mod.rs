pub mod case;
pub mod catalog;
pub mod draft;

pub use case::{
    compliance_pct, CaseRecord, Choice, EmployeeInfo, EvaluationRow, MetadataField, Phase,
};
pub use catalog::{Catalog, EvaluationItem};
pub use draft::{generate_draft_id, Draft, DraftSummary, DRAFT_ID_PREFIX};
