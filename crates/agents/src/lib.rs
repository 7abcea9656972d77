use std::sync::Arc;
use std::time::Instant;

use appscout_core::{dispatch, normalize_text, RoutedReply};
use appscout_ml::{ClassifierStack, IntentClassifier, IntentPrediction};
use appscout_observability::AppMetrics;
use tracing::{debug, info, instrument};

/// Classifies inbound chat text and produces the reply for it.
#[derive(Clone)]
pub struct IntentRouter {
    classifier: Arc<dyn IntentClassifier>,
    remote_enabled: bool,
    metrics: Arc<AppMetrics>,
}

impl IntentRouter {
    pub fn new(stack: ClassifierStack, metrics: Arc<AppMetrics>) -> Self {
        Self {
            classifier: stack.classifier,
            remote_enabled: stack.remote_enabled,
            metrics,
        }
    }

    pub fn remote_enabled(&self) -> bool {
        self.remote_enabled
    }

    pub fn metrics(&self) -> &Arc<AppMetrics> {
        &self.metrics
    }

    pub async fn classify(&self, text: &str) -> IntentPrediction {
        let prediction = self.classifier.predict(text).await;
        self.metrics.record_classification(prediction.source);
        prediction
    }

    /// Empty or missing text yields no reply. Whitespace-only text is still routed.
    #[instrument(skip_all)]
    pub async fn handle(&self, inbound: Option<&str>) -> Option<RoutedReply> {
        let text = match inbound {
            Some(text) if !text.is_empty() => text,
            _ => {
                self.metrics.record_ignored();
                debug!("ignoring empty message");
                return None;
            }
        };

        let started = Instant::now();
        let prediction = self.classify(text).await;
        let reply_text = dispatch(prediction.intent, text);

        self.metrics.record_routed(started.elapsed());
        info!(
            text = %normalize_text(text),
            intent = %prediction.intent,
            source = prediction.source.as_code(),
            "message routed"
        );

        Some(RoutedReply {
            reply_text,
            intent: prediction.intent,
            source: prediction.source,
        })
    }
}
