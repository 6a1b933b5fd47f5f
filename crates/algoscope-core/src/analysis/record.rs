//! Flattened analysis record as persisted by the backend cache.
//!
//! Every column is optional. Nested resolution data arrives as JSON text in
//! the `*_resolved` columns and is interpreted later by the cache adapter.
//! Columns of an unexpected JSON type are kept as text rather than failing
//! the record.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One row of the backend's analysis cache.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CachedAlgorithmRecord {
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub algorithm_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub algorithm_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub pseudocode: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub natural_description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_truthy")]
    pub has_different_cases: bool,
    #[serde(default, deserialize_with = "lenient_text")]
    pub mermaid_diagram: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub resolution_method: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub unified_function: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub unified_explanation: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub unified_resolved: Option<String>,
    #[serde(default, rename = "unified_case_O", deserialize_with = "lenient_text")]
    pub unified_case_o: Option<String>,
    #[serde(default, rename = "unified_case_Omega", deserialize_with = "lenient_text")]
    pub unified_case_omega: Option<String>,
    #[serde(default, rename = "unified_case_Theta", deserialize_with = "lenient_text")]
    pub unified_case_theta: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub unified_case_method: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub best_case_function: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub best_case_explanation: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub best_case_resolved: Option<String>,
    #[serde(default, rename = "best_case_O", deserialize_with = "lenient_text")]
    pub best_case_o: Option<String>,
    #[serde(default, rename = "best_case_Omega", deserialize_with = "lenient_text")]
    pub best_case_omega: Option<String>,
    #[serde(default, rename = "best_case_Theta", deserialize_with = "lenient_text")]
    pub best_case_theta: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub best_case_method: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub worst_case_function: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub worst_case_explanation: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub worst_case_resolved: Option<String>,
    #[serde(default, rename = "worst_case_O", deserialize_with = "lenient_text")]
    pub worst_case_o: Option<String>,
    #[serde(default, rename = "worst_case_Omega", deserialize_with = "lenient_text")]
    pub worst_case_omega: Option<String>,
    #[serde(default, rename = "worst_case_Theta", deserialize_with = "lenient_text")]
    pub worst_case_theta: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub worst_case_method: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub average_case_function: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub average_case_explanation: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub average_case_resolved: Option<String>,
    #[serde(default, rename = "average_case_O", deserialize_with = "lenient_text")]
    pub average_case_o: Option<String>,
    #[serde(default, rename = "average_case_Omega", deserialize_with = "lenient_text")]
    pub average_case_omega: Option<String>,
    #[serde(default, rename = "average_case_Theta", deserialize_with = "lenient_text")]
    pub average_case_theta: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub average_case_method: Option<String>,
}

/// Selects one group of per-case columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseSlot {
    Unified,
    Best,
    Worst,
    Average,
}

/// Borrowed view of the columns describing one case.
#[derive(Debug, Clone, Copy, Default)]
pub struct CaseColumns<'a> {
    pub function: Option<&'a str>,
    pub explanation: Option<&'a str>,
    pub resolved: Option<&'a str>,
    pub big_o: Option<&'a str>,
    pub omega: Option<&'a str>,
    pub theta: Option<&'a str>,
    pub method: Option<&'a str>,
}

impl CachedAlgorithmRecord {
    /// Returns the columns of `slot`, with empty strings treated as absent.
    pub fn columns(&self, slot: CaseSlot) -> CaseColumns<'_> {
        let (function, explanation, resolved, big_o, omega, theta, method) = match slot {
            CaseSlot::Unified => (
                &self.unified_function,
                &self.unified_explanation,
                &self.unified_resolved,
                &self.unified_case_o,
                &self.unified_case_omega,
                &self.unified_case_theta,
                &self.unified_case_method,
            ),
            CaseSlot::Best => (
                &self.best_case_function,
                &self.best_case_explanation,
                &self.best_case_resolved,
                &self.best_case_o,
                &self.best_case_omega,
                &self.best_case_theta,
                &self.best_case_method,
            ),
            CaseSlot::Worst => (
                &self.worst_case_function,
                &self.worst_case_explanation,
                &self.worst_case_resolved,
                &self.worst_case_o,
                &self.worst_case_omega,
                &self.worst_case_theta,
                &self.worst_case_method,
            ),
            CaseSlot::Average => (
                &self.average_case_function,
                &self.average_case_explanation,
                &self.average_case_resolved,
                &self.average_case_o,
                &self.average_case_omega,
                &self.average_case_theta,
                &self.average_case_method,
            ),
        };

        CaseColumns {
            function: non_empty(function),
            explanation: non_empty(explanation),
            resolved: non_empty(resolved),
            big_o: non_empty(big_o),
            omega: non_empty(omega),
            theta: non_empty(theta),
            method: non_empty(method),
        }
    }

    /// The natural-language description, if non-empty.
    pub fn description(&self) -> Option<&str> {
        non_empty(&self.natural_description)
    }

    /// The pseudocode, if non-empty.
    pub fn pseudocode_text(&self) -> Option<&str> {
        non_empty(&self.pseudocode)
    }

    /// The record id, if non-empty.
    pub fn record_id(&self) -> Option<&str> {
        non_empty(&self.id)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

// ============================================================================
// Tolerant deserializers
// ============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum IdInput {
    Str(String),
    Num(serde_json::Number),
}

fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<IdInput>::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        IdInput::Str(s) => s,
        IdInput::Num(n) => n.to_string(),
    }))
}

/// Reads a text column. Numbers and booleans become their literal text and
/// nested arrays or objects their compact JSON.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FlagInput {
    Bool(bool),
    Num(f64),
    Str(String),
}

/// Accepts booleans, `0`/`1` integers and strings, the way SQL-backed
/// caches tend to hand them out. Anything falsy (or null) is `false`.
fn deserialize_truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<FlagInput>::deserialize(deserializer)?;
    Ok(match value {
        None => false,
        Some(FlagInput::Bool(b)) => b,
        Some(FlagInput::Num(n)) => n != 0.0,
        Some(FlagInput::Str(s)) => !matches!(s.trim().to_ascii_lowercase().as_str(), "" | "0" | "false"),
    })
}
