use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    AppSearch,
    AppRecommendation,
    GreetingOrChat,
    ProblemReport,
}

impl Intent {
    pub const ALL: [Intent; 4] = [
        Intent::AppSearch,
        Intent::AppRecommendation,
        Intent::GreetingOrChat,
        Intent::ProblemReport,
    ];

    /// Exact label match. Callers normalize model output first.
    pub fn from_label(value: &str) -> Option<Self> {
        match value {
            "app_search" => Some(Self::AppSearch),
            "app_recommendation" => Some(Self::AppRecommendation),
            "greeting_or_chat" => Some(Self::GreetingOrChat),
            "problem_report" => Some(Self::ProblemReport),
            _ => None,
        }
    }

    pub fn as_label(self) -> &'static str {
        match self {
            Self::AppSearch => "app_search",
            Self::AppRecommendation => "app_recommendation",
            Self::GreetingOrChat => "greeting_or_chat",
            Self::ProblemReport => "problem_report",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Which tier of the classifier produced an intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationSource {
    Remote,
    Fallback,
    Defaulted,
}

impl ClassificationSource {
    pub fn as_code(self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::Fallback => "fallback",
            Self::Defaulted => "defaulted",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutedReply {
    pub reply_text: String,
    pub intent: Intent,
    pub source: ClassificationSource,
}
