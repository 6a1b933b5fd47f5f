//! End-to-end flow through the session store with a scripted gateway.

use algoscope_application::{FailureClass, SendOutcome, SessionStore};
use algoscope_core::analysis::{
    AnalysisResult, CachedAlgorithmRecord, CaseType, NaturalAnalysisPayload,
};
use algoscope_core::gateway::{AnalysisGateway, GatewayError};
use algoscope_core::session::{InputMode, MessageStatus};
use async_trait::async_trait;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Replays scripted analysis replies in order.
struct ScriptedGateway {
    replies: Mutex<VecDeque<Result<AnalysisResult, GatewayError>>>,
    cache: Vec<CachedAlgorithmRecord>,
}

impl ScriptedGateway {
    fn new(
        replies: Vec<Result<AnalysisResult, GatewayError>>,
        cache: Vec<CachedAlgorithmRecord>,
    ) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            cache,
        }
    }

    fn next_reply(&self) -> Result<AnalysisResult, GatewayError> {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::Decode("script exhausted".to_string())))
    }
}

#[async_trait]
impl AnalysisGateway for ScriptedGateway {
    async fn analyze_pseudocode(&self, _text: &str) -> Result<AnalysisResult, GatewayError> {
        self.next_reply()
    }

    async fn analyze_natural(
        &self,
        _description: &str,
    ) -> Result<NaturalAnalysisPayload, GatewayError> {
        self.next_reply().map(|result| NaturalAnalysisPayload {
            pseudocode: "translated".to_string(),
            validated: true,
            attempts: 1,
            confidence: 0.75,
            analysis: result.analysis,
            resolution: result.resolution,
            mermaid: result.mermaid,
            pretty: result.pretty,
        })
    }

    async fn fetch_cached_algorithms(&self) -> Result<Vec<CachedAlgorithmRecord>, GatewayError> {
        Ok(self.cache.clone())
    }
}

fn merge_sort_result() -> AnalysisResult {
    serde_json::from_value(json!({
        "pretty": "Merge sort",
        "analysis": {
            "algorithm_name": "merge_sort",
            "algorithm_type": "divide_and_conquer",
            "recursive_calls_count": 2,
            "has_different_cases": false,
            "unified_case": {
                "case_type": "best",
                "function": "T(n) = 2T(n/2) + n",
                "applies_to": ["best", "worst", "average"]
            }
        },
        "resolution": {
            "has_different_cases": false,
            "unified_case": {
                "case_type": "best",
                "original_equation": "T(n) = 2T(n/2) + n",
                "resolution": { "O": "n log n", "Omega": "n log n", "Theta": "n log n",
                                "is_tight_bound": true, "method": "master theorem",
                                "steps": ["a = 2, b = 2", "case 2"] }
            }
        },
        "mermaid": "graph TD; split-->merge"
    }))
    .unwrap()
}

#[tokio::test]
async fn cached_sessions_then_new_chat_then_retry() {
    let cache: Vec<CachedAlgorithmRecord> = serde_json::from_value(json!([
        {
            "id": 11,
            "algorithm_name": "bubble_sort",
            "pseudocode": "for i <- 1 to n do\n  for j <- 1 to n - i do\n    swap\n  end\nend",
            "has_different_cases": 1,
            "best_case_function": "n",
            "best_case_O": "n",
            "worst_case_function": "n^2",
            "worst_case_resolved": "{\"O\":\"n^2\",\"Theta\":\"n^2\"}"
        }
    ]))
    .unwrap();

    let gateway = Arc::new(ScriptedGateway::new(
        vec![
            Err(GatewayError::Timeout("deadline elapsed".to_string())),
            Ok(merge_sort_result()),
        ],
        cache,
    ));
    let store = Arc::new(SessionStore::new(gateway));

    // Startup: the cache replaces the bootstrap session
    assert_eq!(store.rehydrate_from_cache().await, 1);
    let restored = store.current_session().await.unwrap();
    assert_eq!(restored.id, "11");
    assert_eq!(restored.title, "bubble sort");
    let cached_analysis = restored.messages()[1].analysis().unwrap();
    let resolution = cached_analysis.resolution.as_ref().unwrap();
    assert!(resolution.has_different_cases());
    assert!(resolution.cases.case(CaseType::Worst).unwrap().resolution.is_tight_bound);
    assert!(!resolution.cases.case(CaseType::Best).unwrap().resolution.is_tight_bound);

    // A fresh chat in pseudocode mode; the first attempt times out
    let new_id = store.create_session().await;
    assert!(store.set_input_mode(InputMode::Pseudocode).await);
    let outcome = store.send_message("merge_sort(A, lo, hi)").await;
    assert_eq!(outcome, SendOutcome::Failed(FailureClass::Timeout));

    // Retry succeeds and appends a second exchange
    assert_eq!(store.retry_last().await, SendOutcome::Answered);
    let session = store.current_session().await.unwrap();
    assert_eq!(session.id, new_id);
    assert_eq!(session.title, "merge_sort(A, lo, hi)");

    let statuses: Vec<MessageStatus> = session.messages().iter().map(|m| m.status()).collect();
    assert_eq!(
        statuses,
        vec![
            MessageStatus::Complete,
            MessageStatus::Failed,
            MessageStatus::Complete,
            MessageStatus::Complete,
        ]
    );
    let answer = session.messages()[3].analysis().unwrap();
    assert_eq!(session.messages()[3].content(), "Merge sort");
    let unified = answer.resolution.as_ref().unwrap().cases.unified().unwrap();
    assert_eq!(unified.resolution.steps.len(), 2);

    // Switching back to the cached session leaves both intact
    store.set_current_session("11").await.unwrap();
    assert_eq!(store.sessions().await.len(), 2);
    assert_eq!(store.current_session().await.unwrap().messages().len(), 2);
    assert!(!store.is_loading());
}
