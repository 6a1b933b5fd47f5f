//! Conversion of cached analysis records into sessions.
//!
//! The backend cache stores each analysis as one flat row. This adapter
//! rebuilds the nested [`AnalysisResult`] from those columns and wraps it in a
//! restored two-message session. Partial rows degrade gracefully: missing
//! cases are omitted and malformed resolution blobs fall back to the scalar
//! columns. Nothing in here returns an error.

use algoscope_core::analysis::{
    AnalysisResult, AnalysisSection, CachedAlgorithmRecord, CaseColumns, CaseSlot, CaseSplit,
    CaseTriple, CaseType, ComplexityCase, NaturalTranslation, ResolutionCase, ResolutionDetails,
    ResolutionSection,
};
use algoscope_core::session::{InputMode, Message, Session};
use serde_json::{Map, Value};

/// Label of assistant messages restored from the cache.
pub const CACHED_LABEL: &str = "[from cache]";

/// Title of a restored session whose record has no algorithm name.
pub const UNNAMED_TITLE: &str = "Analyzed algorithm";

/// How the resolution of one case could be recovered from a record.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedField {
    /// The `*_resolved` blob parsed to a JSON object.
    Parsed(Map<String, Value>),
    /// No usable blob, but at least one scalar column (equation or a bound)
    /// is present.
    Fallback,
    /// Nothing usable; the case is omitted.
    Missing,
}

impl ResolvedField {
    /// Classifies the resolution data available for one case.
    ///
    /// `blobs` are tried in order; the first that parses to an object wins.
    pub fn classify(blobs: &[Option<&str>], columns: &CaseColumns<'_>) -> Self {
        for blob in blobs.iter().flatten() {
            match serde_json::from_str::<Value>(blob) {
                Ok(Value::Object(map)) => return ResolvedField::Parsed(map),
                Ok(other) => {
                    tracing::debug!(
                        "[CacheRecordAdapter] Ignoring non-object resolution blob: {}",
                        other
                    );
                }
                Err(e) => {
                    tracing::debug!("[CacheRecordAdapter] Unparseable resolution blob: {}", e);
                }
            }
        }

        let has_scalars = columns.function.is_some()
            || columns.big_o.is_some()
            || columns.omega.is_some()
            || columns.theta.is_some();
        if has_scalars {
            ResolvedField::Fallback
        } else {
            ResolvedField::Missing
        }
    }

    /// Builds the resolution case this field describes, or `None` when
    /// [`ResolvedField::Missing`].
    pub fn into_case(self, case_type: CaseType, columns: &CaseColumns<'_>) -> Option<ResolutionCase> {
        let resolution = match self {
            ResolvedField::Parsed(map) => details_from_blob(&map),
            ResolvedField::Fallback => ResolutionDetails {
                big_o: columns.big_o.map(str::to_string),
                omega: columns.omega.map(str::to_string),
                theta: columns.theta.map(str::to_string),
                is_tight_bound: columns.theta.is_some(),
                method: columns.method.map(str::to_string),
                steps: Vec::new(),
                explanation: None,
            },
            ResolvedField::Missing => return None,
        };

        Some(ResolutionCase {
            case_type,
            original_equation: columns.function.map(str::to_string),
            resolution,
        })
    }
}

/// Rebuilds sessions from cached analysis records.
#[derive(Debug, Clone, Default)]
pub struct CacheRecordAdapter;

impl CacheRecordAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Converts records into sessions, preserving order.
    ///
    /// Records without an id, or with neither a description nor pseudocode,
    /// are dropped.
    pub fn to_sessions(&self, records: &[CachedAlgorithmRecord]) -> Vec<Session> {
        let sessions: Vec<Session> = records.iter().filter_map(|r| self.to_session(r)).collect();
        tracing::debug!(
            "[CacheRecordAdapter] Restored {} of {} cached records",
            sessions.len(),
            records.len()
        );
        sessions
    }

    /// Converts one record into a restored session.
    pub fn to_session(&self, record: &CachedAlgorithmRecord) -> Option<Session> {
        let id = record.record_id()?;
        let (mode, user_content) = match (record.description(), record.pseudocode_text()) {
            (Some(description), _) => (InputMode::Natural, description.to_string()),
            (None, Some(pseudocode)) => (InputMode::Pseudocode, code_block(pseudocode)),
            (None, None) => return None,
        };

        let title = record
            .algorithm_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .map(|name| name.replace('_', " "))
            .unwrap_or_else(|| UNNAMED_TITLE.to_string());

        let messages = vec![
            Message::user(user_content).with_id(format!("{id}-user")),
            Message::answered_assistant(
                format!("{id}-assistant"),
                CACHED_LABEL,
                self.to_analysis(record),
            ),
        ];

        Some(Session::restored(id, title, mode, messages))
    }

    /// Rebuilds the analysis view model of one record.
    pub fn to_analysis(&self, record: &CachedAlgorithmRecord) -> AnalysisResult {
        let translation = record.description().map(|_| NaturalTranslation {
            pseudocode: record.pseudocode.clone().unwrap_or_default(),
            validated: true,
            attempts: 1,
            confidence: 1.0,
        });

        AnalysisResult {
            pretty: Some(CACHED_LABEL.to_string()),
            analysis: Some(self.analysis_section(record)),
            resolution: Some(self.resolution_section(record)),
            mermaid: record.mermaid_diagram.clone(),
            translation,
            ..Default::default()
        }
    }

    fn analysis_section(&self, record: &CachedAlgorithmRecord) -> AnalysisSection {
        let cases = if record.has_different_cases {
            CaseSplit::Distinct(CaseTriple {
                best: complexity_case(CaseType::Best, &record.columns(CaseSlot::Best), false),
                worst: complexity_case(CaseType::Worst, &record.columns(CaseSlot::Worst), false),
                average: complexity_case(
                    CaseType::Average,
                    &record.columns(CaseSlot::Average),
                    false,
                ),
            })
        } else {
            CaseSplit::Unified(complexity_case(
                CaseType::Best,
                &record.columns(CaseSlot::Unified),
                true,
            ))
        };

        AnalysisSection {
            algorithm_name: record.algorithm_name.clone(),
            algorithm_type: record.algorithm_type.clone(),
            metric: None,
            base_case_condition: None,
            cases,
        }
    }

    fn resolution_section(&self, record: &CachedAlgorithmRecord) -> ResolutionSection {
        let cases = if record.has_different_cases {
            CaseSplit::Distinct(CaseTriple {
                best: resolution_case(record, CaseType::Best, CaseSlot::Best),
                worst: resolution_case(record, CaseType::Worst, CaseSlot::Worst),
                average: resolution_case(record, CaseType::Average, CaseSlot::Average),
            })
        } else {
            let unified = record.columns(CaseSlot::Unified);
            let blobs = [unified.resolved, non_empty(&record.resolution_method)];
            let case = ResolvedField::classify(&blobs, &unified)
                .into_case(CaseType::Best, &unified)
                .or_else(|| resolution_case(record, CaseType::Best, CaseSlot::Best));
            CaseSplit::Unified(case)
        };

        ResolutionSection {
            algorithm_name: record.algorithm_name.clone(),
            algorithm_type: record.algorithm_type.clone(),
            cases,
        }
    }
}

fn complexity_case(case_type: CaseType, columns: &CaseColumns<'_>, unified: bool) -> Option<ComplexityCase> {
    if columns.function.is_none() && columns.explanation.is_none() {
        return None;
    }
    Some(ComplexityCase {
        case_type,
        condition: None,
        exists: true,
        function: columns.function.map(str::to_string),
        explanation: columns.explanation.map(str::to_string),
        applies_to: unified.then(|| CaseType::ALL.to_vec()),
    })
}

fn resolution_case(record: &CachedAlgorithmRecord, case_type: CaseType, slot: CaseSlot) -> Option<ResolutionCase> {
    let columns = record.columns(slot);
    ResolvedField::classify(&[columns.resolved], &columns).into_case(case_type, &columns)
}

fn details_from_blob(map: &Map<String, Value>) -> ResolutionDetails {
    let theta = string_field(map, "Theta");
    let is_tight_bound = match map.get("is_tight_bound") {
        Some(value) if !value.is_null() => truthy(value),
        _ => theta.is_some(),
    };
    let steps = match map.get("steps") {
        Some(Value::Array(items)) => items.iter().map(value_text).collect(),
        _ => Vec::new(),
    };

    ResolutionDetails {
        big_o: string_field(map, "O"),
        omega: string_field(map, "Omega"),
        theta,
        is_tight_bound,
        method: string_field(map, "method"),
        steps,
        explanation: string_field(map, "explanation"),
    }
}

fn string_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(value) => Some(value_text(value)),
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Wraps pseudocode in a fenced block tagged `pseudo`.
pub fn code_block(pseudocode: &str) -> String {
    format!("```pseudo\n{}\n```", pseudocode.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> CachedAlgorithmRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_drops_records_without_id_or_content() {
        let records = vec![
            record(json!({ "pseudocode": "x <- 1" })),
            record(json!({ "id": "a" })),
            record(json!({ "id": "b", "natural_description": "", "pseudocode": "" })),
            record(json!({ "id": "c", "pseudocode": "  y <- 2\n" })),
        ];

        let sessions = CacheRecordAdapter::new().to_sessions(&records);
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].id, "c");
        assert_eq!(sessions[0].messages()[0].content(), "```pseudo\ny <- 2\n```");
    }

    #[test]
    fn test_natural_record_becomes_natural_session() {
        let session = CacheRecordAdapter::new()
            .to_session(&record(json!({
                "id": 7,
                "algorithm_name": "binary_search",
                "natural_description": "search a sorted array by halving",
                "pseudocode": "while lo <= hi do ... end",
                "mermaid_diagram": "graph TD; A-->B",
                "has_different_cases": false,
                "unified_function": "T(n) = T(n/2) + 1",
                "unified_case_Theta": "log n"
            })))
            .unwrap();

        assert_eq!(session.title, "binary search");
        assert_eq!(session.input_mode(), Some(InputMode::Natural));

        let messages = session.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].id(), "7-user");
        assert_eq!(messages[0].content(), "search a sorted array by halving");
        assert_eq!(messages[1].id(), "7-assistant");
        assert_eq!(messages[1].content(), CACHED_LABEL);
        assert!(messages[1].is_terminal());

        let analysis = messages[1].analysis().unwrap();
        let translation = analysis.translation.as_ref().unwrap();
        assert_eq!(translation.pseudocode, "while lo <= hi do ... end");
        assert!(translation.validated);
        assert_eq!(translation.attempts, 1);
        assert_eq!(analysis.mermaid.as_deref(), Some("graph TD; A-->B"));

        let unified = analysis.analysis.as_ref().unwrap().cases.unified().unwrap();
        assert_eq!(unified.covered_cases(), CaseType::ALL.to_vec());

        let resolution = analysis.resolution.as_ref().unwrap().cases.unified().unwrap();
        assert_eq!(resolution.resolution.theta.as_deref(), Some("log n"));
        assert!(resolution.resolution.is_tight_bound);
        assert!(resolution.resolution.steps.is_empty());
    }

    #[test]
    fn test_untitled_record_and_pseudocode_has_no_translation() {
        let session = CacheRecordAdapter::new()
            .to_session(&record(json!({ "id": "p", "pseudocode": "x <- 1" })))
            .unwrap();
        assert_eq!(session.title, UNNAMED_TITLE);
        assert_eq!(session.input_mode(), Some(InputMode::Pseudocode));
        assert!(session.messages()[1].analysis().unwrap().translation.is_none());
    }

    #[test]
    fn test_parsed_blob_wins_over_scalars() {
        let adapter = CacheRecordAdapter::new();
        let analysis = adapter.to_analysis(&record(json!({
            "id": "q",
            "pseudocode": "quick",
            "has_different_cases": true,
            "worst_case_function": "T(n) = T(n-1) + n",
            "worst_case_O": "ignored",
            "worst_case_resolved": r#"{"O":"n^2","Theta":"n^2","steps":["expand","sum"],"method":"iteration"}"#
        })));

        let resolution = analysis.resolution.unwrap();
        let worst = resolution.cases.case(CaseType::Worst).unwrap();
        assert_eq!(worst.original_equation.as_deref(), Some("T(n) = T(n-1) + n"));
        assert_eq!(worst.resolution.big_o.as_deref(), Some("n^2"));
        assert_eq!(worst.resolution.omega, None);
        assert!(worst.resolution.is_tight_bound);
        assert_eq!(worst.resolution.steps, vec!["expand", "sum"]);
        assert!(resolution.cases.case(CaseType::Best).is_none());
    }

    #[test]
    fn test_blob_sent_as_object_is_parsed() {
        let adapter = CacheRecordAdapter::new();
        let analysis = adapter.to_analysis(&record(json!({
            "id": "m",
            "pseudocode": "merge",
            "has_different_cases": true,
            "worst_case_function": "T(n) = 2T(n/2) + n",
            "worst_case_resolved": { "O": "n log n", "is_tight_bound": false }
        })));

        let resolution = analysis.resolution.unwrap();
        let worst = resolution.cases.case(CaseType::Worst).unwrap();
        assert_eq!(worst.resolution.big_o.as_deref(), Some("n log n"));
        assert!(!worst.resolution.is_tight_bound);
    }

    #[test]
    fn test_malformed_blob_falls_back_to_scalars() {
        let columns = CaseColumns {
            big_o: Some("n"),
            method: Some("master theorem"),
            ..Default::default()
        };
        let field = ResolvedField::classify(&[Some("{not json")], &columns);
        assert_eq!(field, ResolvedField::Fallback);

        let case = field.into_case(CaseType::Average, &columns).unwrap();
        assert_eq!(case.resolution.big_o.as_deref(), Some("n"));
        assert_eq!(case.resolution.method.as_deref(), Some("master theorem"));
        assert!(!case.resolution.is_tight_bound);
        assert!(case.original_equation.is_none());
    }

    #[test]
    fn test_method_alone_is_missing() {
        let columns = CaseColumns {
            method: Some("substitution"),
            ..Default::default()
        };
        let field = ResolvedField::classify(&[None, Some("[1, 2]")], &columns);
        assert_eq!(field, ResolvedField::Missing);
        assert!(field.into_case(CaseType::Best, &columns).is_none());
    }

    #[test]
    fn test_explicit_false_tight_bound_is_kept() {
        let columns = CaseColumns::default();
        let field = ResolvedField::classify(
            &[Some(r#"{"Theta":"n","is_tight_bound":false,"steps":"none"}"#)],
            &columns,
        );
        let case = field.into_case(CaseType::Best, &columns).unwrap();
        assert!(!case.resolution.is_tight_bound);
        assert!(case.resolution.steps.is_empty());
    }

    #[test]
    fn test_unified_resolution_falls_back_to_best_case_columns() {
        let analysis = CacheRecordAdapter::new().to_analysis(&record(json!({
            "id": "u",
            "pseudocode": "loop",
            "has_different_cases": false,
            "best_case_function": "n",
            "best_case_O": "n",
            "best_case_Theta": "n"
        })));

        let resolution = analysis.resolution.unwrap();
        assert!(!resolution.has_different_cases());
        let unified = resolution.cases.unified().unwrap();
        assert_eq!(unified.case_type, CaseType::Best);
        assert_eq!(unified.original_equation.as_deref(), Some("n"));
        assert_eq!(unified.resolution.theta.as_deref(), Some("n"));

        let section = analysis.analysis.unwrap();
        assert!(section.cases.unified().is_none());
    }

    #[test]
    fn test_distinct_cases_omit_empty_pairs() {
        let analysis = CacheRecordAdapter::new().to_analysis(&record(json!({
            "id": "d",
            "pseudocode": "sort",
            "has_different_cases": "1",
            "best_case_explanation": "already sorted",
            "average_case_function": "n log n"
        })));

        let section = analysis.analysis.unwrap();
        assert!(section.has_different_cases());
        let best = section.cases.case(CaseType::Best).unwrap();
        assert_eq!(best.function, None);
        assert!(best.applies_to.is_none());
        assert!(section.cases.case(CaseType::Worst).is_none());
        assert!(section.cases.case(CaseType::Average).is_some());
    }
}
