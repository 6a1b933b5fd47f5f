//! Flat payload returned by natural-language analysis.

use super::model::{AnalysisResult, AnalysisSection, NaturalTranslation, ResolutionSection};
use serde::{Deserialize, Serialize};

/// Response of the natural-language endpoint.
///
/// Unlike the pseudocode endpoint, translation quality fields sit at the top
/// level next to the analysis sections. Use the `From` impl to fold it into
/// an [`AnalysisResult`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NaturalAnalysisPayload {
    #[serde(default)]
    pub pseudocode: String,
    #[serde(default)]
    pub validated: bool,
    #[serde(default)]
    pub attempts: u32,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub analysis: Option<AnalysisSection>,
    #[serde(default)]
    pub resolution: Option<ResolutionSection>,
    #[serde(default)]
    pub mermaid: Option<String>,
    #[serde(default)]
    pub pretty: Option<String>,
}

impl From<NaturalAnalysisPayload> for AnalysisResult {
    fn from(payload: NaturalAnalysisPayload) -> Self {
        AnalysisResult {
            pretty: payload.pretty,
            analysis: payload.analysis,
            resolution: payload.resolution,
            mermaid: payload.mermaid,
            translation: Some(NaturalTranslation {
                pseudocode: payload.pseudocode,
                validated: payload.validated,
                attempts: payload.attempts,
                confidence: payload.confidence,
            }),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_folds_translation_block() {
        let payload: NaturalAnalysisPayload = serde_json::from_value(json!({
            "pseudocode": "for i <- 1 to n do\n  x <- x + i\nend",
            "validated": true,
            "attempts": 2,
            "confidence": 0.85,
            "analysis": { "has_different_cases": false, "max_nesting": 1 },
            "mermaid": "graph TD; S-->E"
        }))
        .unwrap();

        let result = AnalysisResult::from(payload);
        let translation = result.translation.as_ref().unwrap();
        assert!(translation.validated);
        assert_eq!(translation.attempts, 2);
        assert!((translation.confidence - 0.85).abs() < f64::EPSILON);
        assert!(translation.pseudocode.starts_with("for i"));
        assert_eq!(result.mermaid.as_deref(), Some("graph TD; S-->E"));
        assert_eq!(result.summary_label(), None);
        assert!(result.ast.is_none());
    }
}
