use appscout_core::{classify_fallback, ClassificationSource};
use async_trait::async_trait;

use crate::{IntentClassifier, IntentPrediction};

pub const KEYWORD_MODEL: &str = "keywords";

#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordIntentClassifier;

impl KeywordIntentClassifier {
    pub fn classify(&self, text: &str) -> IntentPrediction {
        IntentPrediction {
            intent: classify_fallback(text),
            source: ClassificationSource::Fallback,
            model: KEYWORD_MODEL.to_string(),
        }
    }
}

#[async_trait]
impl IntentClassifier for KeywordIntentClassifier {
    async fn predict(&self, text: &str) -> IntentPrediction {
        self.classify(text)
    }
}
