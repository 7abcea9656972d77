use std::sync::Arc;

use appscout_core::{normalize_label, ClassificationSource, Intent};
use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::backend::CompletionBackend;
use crate::fallback::KeywordIntentClassifier;
use crate::{IntentClassifier, IntentPrediction};

pub const CLASSIFICATION_PROMPT: &str = "\
أنت خبير في تحليل اللغة الطبيعية باللهجة العراقية. مهمتك هي تصنيف رسالة المستخدم إلى واحدة من الفئات التالية فقط:
- 'app_search': إذا كان المستخدم يبحث عن تطبيق معين باسمه.
- 'app_recommendation': إذا كان المستخدم يطلب توصية لتطبيق يؤدي وظيفة ما.
- 'greeting_or_chat': إذا كانت الرسالة مجرد تحية، شكر، أو سؤال عام.
- 'problem_report': إذا كان المستخدم يبلغ عن مشكلة.
أجب بكلمة واحدة فقط تمثل الفئة. لا تكتب أي شيء آخر.";

/// Label used when the model answers outside the allowed set.
pub const DEFAULT_INTENT: Intent = Intent::AppSearch;

/// Two-tier classifier: one remote attempt, keyword fallback on any failure.
#[derive(Clone)]
pub struct RemoteIntentClassifier {
    backend: Option<Arc<dyn CompletionBackend>>,
    fallback: KeywordIntentClassifier,
}

impl RemoteIntentClassifier {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self {
            backend: Some(backend),
            fallback: KeywordIntentClassifier,
        }
    }

    /// Classifier whose backend failed to initialize; never touches the network.
    pub fn unavailable() -> Self {
        Self {
            backend: None,
            fallback: KeywordIntentClassifier,
        }
    }

    pub fn is_remote_enabled(&self) -> bool {
        self.backend.is_some()
    }
}

#[async_trait]
impl IntentClassifier for RemoteIntentClassifier {
    async fn predict(&self, text: &str) -> IntentPrediction {
        let Some(backend) = self.backend.as_ref() else {
            debug!("no completion backend configured, using keyword fallback");
            return self.fallback.classify(text);
        };

        match backend.complete(CLASSIFICATION_PROMPT, text).await {
            Ok(raw) => interpret_label(&raw, text, backend.model_name()),
            Err(err) => {
                error!(
                    error = %err,
                    model = %backend.model_name(),
                    "remote intent classification failed, using keyword fallback"
                );
                self.fallback.classify(text)
            }
        }
    }
}

fn interpret_label(raw: &str, text: &str, model: &str) -> IntentPrediction {
    let label = normalize_label(raw);

    match Intent::from_label(&label) {
        Some(intent) => {
            info!(text = %text, intent = %intent, model = %model, "remote classifier labelled message");
            IntentPrediction {
                intent,
                source: ClassificationSource::Remote,
                model: model.to_string(),
            }
        }
        None => {
            warn!(
                response = %label,
                default = %DEFAULT_INTENT,
                "unexpected classification label, using default intent"
            );
            IntentPrediction {
                intent: DEFAULT_INTENT,
                source: ClassificationSource::Defaulted,
                model: model.to_string(),
            }
        }
    }
}
