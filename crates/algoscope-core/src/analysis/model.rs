//! Analysis view model.
//!
//! Every producer (live pseudocode analysis, natural-language analysis and
//! cached records) emits into [`AnalysisResult`]. Field names follow the
//! analysis backend's JSON so a live response deserializes directly.

use super::case_split::{CaseSplit, CaseTriple};
use serde::{Deserialize, Deserializer, Serialize};

/// One of the three classic complexity cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseType {
    Best,
    Worst,
    Average,
}

impl CaseType {
    /// All case types in display order.
    pub const ALL: [CaseType; 3] = [CaseType::Best, CaseType::Worst, CaseType::Average];

    pub fn as_str(&self) -> &'static str {
        match self {
            CaseType::Best => "best",
            CaseType::Worst => "worst",
            CaseType::Average => "average",
        }
    }
}

impl std::fmt::Display for CaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descriptive side of a case: which function embodies it and why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexityCase {
    pub case_type: CaseType,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default = "default_exists", deserialize_with = "null_as_true")]
    pub exists: bool,
    #[serde(default)]
    pub function: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
    /// Set when a single case stands in for several (unified path only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applies_to: Option<Vec<CaseType>>,
}

fn default_exists() -> bool {
    true
}

impl ComplexityCase {
    /// The case types this case describes.
    ///
    /// A case without `applies_to` describes only its own case type.
    pub fn covered_cases(&self) -> Vec<CaseType> {
        match &self.applies_to {
            Some(cases) if !cases.is_empty() => cases.clone(),
            _ => vec![self.case_type],
        }
    }
}

/// The solved asymptotic bound of a case.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResolutionDetails {
    #[serde(rename = "O", default)]
    pub big_o: Option<String>,
    #[serde(rename = "Omega", default)]
    pub omega: Option<String>,
    #[serde(rename = "Theta", default)]
    pub theta: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_tight_bound: bool,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub steps: Vec<String>,
    #[serde(default)]
    pub explanation: Option<String>,
}

/// Resolved side of a case: the original recurrence or work equation and its
/// bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionCase {
    pub case_type: CaseType,
    #[serde(default)]
    pub original_equation: Option<String>,
    #[serde(default)]
    pub resolution: ResolutionDetails,
}

/// Shape metric reported next to the algorithm type.
///
/// Recursive algorithms report how many recursive calls they make, iterative
/// ones how deeply their loops nest; never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuralMetric {
    RecursiveCalls(u32),
    NestingDepth(u32),
}

/// Descriptive analysis of an algorithm.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "AnalysisSectionWire", into = "AnalysisSectionWire")]
pub struct AnalysisSection {
    pub algorithm_name: Option<String>,
    pub algorithm_type: Option<String>,
    pub metric: Option<StructuralMetric>,
    pub base_case_condition: Option<String>,
    pub cases: CaseSplit<ComplexityCase>,
}

impl AnalysisSection {
    pub fn has_different_cases(&self) -> bool {
        self.cases.has_different_cases()
    }
}

/// Resolved bounds of an algorithm, mirroring the analysis case split.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "ResolutionSectionWire", into = "ResolutionSectionWire")]
pub struct ResolutionSection {
    pub algorithm_name: Option<String>,
    pub algorithm_type: Option<String>,
    pub cases: CaseSplit<ResolutionCase>,
}

impl ResolutionSection {
    pub fn has_different_cases(&self) -> bool {
        self.cases.has_different_cases()
    }
}

/// Quality report of a natural-language to pseudocode translation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NaturalTranslation {
    pub pseudocode: String,
    pub validated: bool,
    pub attempts: u32,
    pub confidence: f64,
}

/// Whether the backend served the AST from its own cache.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AstInfo {
    #[serde(default)]
    pub from_cache: bool,
    #[serde(default)]
    pub algorithm_name: Option<String>,
}

/// Whether the backend served the classification from its own cache.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClassificationInfo {
    #[serde(default)]
    pub from_cache: bool,
}

/// The normalized analysis view model attached to an answered assistant
/// message.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ast: Option<AstInfo>,
    /// Short human label for the result.
    #[serde(default, alias = "summaryLabel", skip_serializing_if = "Option::is_none")]
    pub pretty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<ClassificationInfo>,
    #[serde(default, alias = "analysisSection", skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisSection>,
    #[serde(default, alias = "resolutionSection", skip_serializing_if = "Option::is_none")]
    pub resolution: Option<ResolutionSection>,
    #[serde(default, alias = "mermaidText", skip_serializing_if = "Option::is_none")]
    pub mermaid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<NaturalTranslation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalysisResult {
    /// The backend's own label, when it sent a non-blank one.
    pub fn summary_label(&self) -> Option<&str> {
        self.pretty
            .as_deref()
            .map(str::trim)
            .filter(|label| !label.is_empty())
    }

    /// The case split flag of the analysis section, falling back to the
    /// resolution section.
    pub fn has_different_cases(&self) -> Option<bool> {
        self.analysis
            .as_ref()
            .map(AnalysisSection::has_different_cases)
            .or_else(|| {
                self.resolution
                    .as_ref()
                    .map(ResolutionSection::has_different_cases)
            })
    }
}

// ============================================================================
// Wire representations
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct AnalysisSectionWire {
    #[serde(default)]
    algorithm_name: Option<String>,
    #[serde(default)]
    algorithm_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    recursive_calls_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_nesting: Option<u32>,
    #[serde(default)]
    base_case_condition: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    has_different_cases: bool,
    #[serde(default)]
    unified_case: Option<ComplexityCase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    best_case: Option<ComplexityCase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    worst_case: Option<ComplexityCase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    average_case: Option<ComplexityCase>,
}

impl From<AnalysisSectionWire> for AnalysisSection {
    fn from(wire: AnalysisSectionWire) -> Self {
        let metric = match (wire.recursive_calls_count, wire.max_nesting) {
            (Some(calls), _) => Some(StructuralMetric::RecursiveCalls(calls)),
            (None, Some(depth)) => Some(StructuralMetric::NestingDepth(depth)),
            (None, None) => None,
        };
        Self {
            algorithm_name: wire.algorithm_name,
            algorithm_type: wire.algorithm_type,
            metric,
            base_case_condition: wire.base_case_condition,
            cases: CaseSplit::from_parts(
                wire.has_different_cases,
                wire.unified_case,
                CaseTriple {
                    best: wire.best_case,
                    worst: wire.worst_case,
                    average: wire.average_case,
                },
            ),
        }
    }
}

impl From<AnalysisSection> for AnalysisSectionWire {
    fn from(section: AnalysisSection) -> Self {
        let (recursive_calls_count, max_nesting) = match section.metric {
            Some(StructuralMetric::RecursiveCalls(calls)) => (Some(calls), None),
            Some(StructuralMetric::NestingDepth(depth)) => (None, Some(depth)),
            None => (None, None),
        };
        let (has_different_cases, unified_case, triple) = section.cases.into_parts();
        Self {
            algorithm_name: section.algorithm_name,
            algorithm_type: section.algorithm_type,
            recursive_calls_count,
            max_nesting,
            base_case_condition: section.base_case_condition,
            has_different_cases,
            unified_case,
            best_case: triple.best,
            worst_case: triple.worst,
            average_case: triple.average,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ResolutionSectionWire {
    #[serde(default, deserialize_with = "null_as_default")]
    has_different_cases: bool,
    #[serde(default)]
    algorithm_name: Option<String>,
    #[serde(default)]
    algorithm_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    unified_case: Option<ResolutionCase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    best_case: Option<ResolutionCase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    worst_case: Option<ResolutionCase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    average_case: Option<ResolutionCase>,
}

impl From<ResolutionSectionWire> for ResolutionSection {
    fn from(wire: ResolutionSectionWire) -> Self {
        Self {
            algorithm_name: wire.algorithm_name,
            algorithm_type: wire.algorithm_type,
            cases: CaseSplit::from_parts(
                wire.has_different_cases,
                wire.unified_case,
                CaseTriple {
                    best: wire.best_case,
                    worst: wire.worst_case,
                    average: wire.average_case,
                },
            ),
        }
    }
}

impl From<ResolutionSection> for ResolutionSectionWire {
    fn from(section: ResolutionSection) -> Self {
        let (has_different_cases, unified_case, triple) = section.cases.into_parts();
        Self {
            has_different_cases,
            algorithm_name: section.algorithm_name,
            algorithm_type: section.algorithm_type,
            unified_case,
            best_case: triple.best,
            worst_case: triple.worst,
            average_case: triple.average,
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn distinct_response() -> serde_json::Value {
        json!({
            "ast": { "from_cache": true, "algorithm_name": "quick_sort" },
            "pretty": "Quick sort analysed",
            "classification": { "from_cache": false },
            "analysis": {
                "algorithm_name": "quick_sort",
                "algorithm_type": "recursive",
                "recursive_calls_count": 2,
                "max_nesting": null,
                "base_case_condition": "lo >= hi",
                "has_different_cases": true,
                "unified_case": null,
                "best_case": {
                    "case_type": "best",
                    "condition": "balanced pivot",
                    "exists": true,
                    "function": "T(n) = 2T(n/2) + n",
                    "explanation": "pivot splits evenly"
                },
                "worst_case": {
                    "case_type": "worst",
                    "condition": "sorted input",
                    "exists": true,
                    "function": "T(n) = T(n-1) + n",
                    "explanation": "pivot is always the minimum"
                }
            },
            "resolution": {
                "has_different_cases": true,
                "algorithm_name": "quick_sort",
                "algorithm_type": "recursive",
                "worst_case": {
                    "case_type": "worst",
                    "original_equation": "T(n) = T(n-1) + n",
                    "resolution": {
                        "O": "n^2", "Omega": "n^2", "Theta": "n^2",
                        "is_tight_bound": true,
                        "method": "iteration",
                        "steps": null,
                        "explanation": null
                    }
                }
            },
            "mermaid": "graph TD; A-->B",
            "error": null
        })
    }

    #[test]
    fn test_deserializes_live_response_with_distinct_cases() {
        let result: AnalysisResult = serde_json::from_value(distinct_response()).unwrap();

        let analysis = result.analysis.as_ref().unwrap();
        assert!(analysis.has_different_cases());
        assert_eq!(analysis.metric, Some(StructuralMetric::RecursiveCalls(2)));
        assert!(analysis.cases.case(CaseType::Best).is_some());
        assert!(analysis.cases.case(CaseType::Average).is_none());

        let resolution = result.resolution.as_ref().unwrap();
        let worst = resolution.cases.case(CaseType::Worst).unwrap();
        assert_eq!(worst.resolution.theta.as_deref(), Some("n^2"));
        assert!(worst.resolution.steps.is_empty());

        assert_eq!(result.summary_label(), Some("Quick sort analysed"));
        assert!(result.ast.as_ref().unwrap().from_cache);
    }

    #[test]
    fn test_unified_flag_discards_stray_distinct_cases() {
        let result: AnalysisResult = serde_json::from_value(json!({
            "analysis": {
                "has_different_cases": false,
                "max_nesting": 2,
                "unified_case": {
                    "case_type": "best",
                    "function": "n^2",
                    "applies_to": ["best", "worst", "average"]
                },
                "worst_case": { "case_type": "worst", "function": "ignored" }
            }
        }))
        .unwrap();

        let analysis = result.analysis.unwrap();
        assert!(!analysis.has_different_cases());
        assert_eq!(analysis.metric, Some(StructuralMetric::NestingDepth(2)));
        let unified = analysis.cases.unified().unwrap();
        assert_eq!(unified.covered_cases(), CaseType::ALL.to_vec());
        assert!(unified.exists);
        assert!(analysis.cases.case(CaseType::Worst).is_none());
    }

    #[test]
    fn test_null_flags_take_their_defaults() {
        let result: AnalysisResult = serde_json::from_value(json!({
            "analysis": {
                "has_different_cases": false,
                "unified_case": { "case_type": "best", "function": "n", "exists": null }
            },
            "resolution": {
                "has_different_cases": false,
                "unified_case": {
                    "case_type": "best",
                    "resolution": { "O": "n", "is_tight_bound": null }
                }
            }
        }))
        .unwrap();

        assert!(result.analysis.unwrap().cases.unified().unwrap().exists);
        let resolution = result.resolution.unwrap();
        let unified = resolution.cases.unified().unwrap();
        assert_eq!(unified.resolution.big_o.as_deref(), Some("n"));
        assert!(!unified.resolution.is_tight_bound);
    }

    #[test]
    fn test_serialization_never_flips_case_split() {
        let result: AnalysisResult = serde_json::from_value(distinct_response()).unwrap();
        let encoded = serde_json::to_value(&result).unwrap();

        assert_eq!(encoded["analysis"]["has_different_cases"], json!(true));
        assert_eq!(encoded["analysis"]["unified_case"], serde_json::Value::Null);
        assert_eq!(encoded["resolution"]["has_different_cases"], json!(true));
        assert_eq!(encoded["resolution"]["worst_case"]["resolution"]["O"], json!("n^2"));

        let decoded: AnalysisResult = serde_json::from_value(encoded).unwrap();
        assert_eq!(decoded, result);
    }

    #[test]
    fn test_summary_label_ignores_blank_pretty() {
        let result = AnalysisResult {
            pretty: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(result.summary_label(), None);
        assert_eq!(result.has_different_cases(), None);
    }
}
