//! Analysis view model and the payloads it is built from.

pub mod case_split;
pub mod model;
pub mod natural;
pub mod record;

pub use case_split::{CaseSplit, CaseTriple};
pub use model::{
    AnalysisResult, AnalysisSection, AstInfo, CaseType, ClassificationInfo, ComplexityCase,
    NaturalTranslation, ResolutionCase, ResolutionDetails, ResolutionSection, StructuralMetric,
};
pub use natural::NaturalAnalysisPayload;
pub use record::{CachedAlgorithmRecord, CaseColumns, CaseSlot};
