mod backend;
mod error;
mod fallback;
mod remote;

use std::sync::Arc;

use appscout_core::{ClassificationSource, Intent, LlmSettings};
use async_trait::async_trait;
use serde::Serialize;
use tracing::{error, info};

pub use backend::{CompletionBackend, OpenAiCompatibleBackend};
pub use error::{ClassifierError, StatusKind};
pub use fallback::{KeywordIntentClassifier, KEYWORD_MODEL};
pub use remote::{RemoteIntentClassifier, CLASSIFICATION_PROMPT, DEFAULT_INTENT};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntentPrediction {
    pub intent: Intent,
    pub source: ClassificationSource,
    pub model: String,
}

#[async_trait]
pub trait IntentClassifier: Send + Sync {
    async fn predict(&self, text: &str) -> IntentPrediction;
}

#[derive(Clone)]
pub struct ClassifierStack {
    pub classifier: Arc<dyn IntentClassifier>,
    pub remote_enabled: bool,
}

impl ClassifierStack {
    /// Builds the HTTP backend; a construction failure is logged once and the
    /// stack runs on keyword fallback only.
    pub fn from_settings(settings: &LlmSettings) -> Self {
        match OpenAiCompatibleBackend::new(settings) {
            Ok(backend) => {
                info!(
                    model = %settings.model,
                    endpoint = %backend.endpoint(),
                    "remote intent classifier ready"
                );
                Self::with_backend(Arc::new(backend))
            }
            Err(err) => {
                error!(error = %err, "remote intent classifier unavailable, keyword fallback only");
                Self::fallback_only()
            }
        }
    }

    pub fn with_backend(backend: Arc<dyn CompletionBackend>) -> Self {
        Self {
            classifier: Arc::new(RemoteIntentClassifier::new(backend)),
            remote_enabled: true,
        }
    }

    pub fn fallback_only() -> Self {
        Self {
            classifier: Arc::new(RemoteIntentClassifier::unavailable()),
            remote_enabled: false,
        }
    }
}
