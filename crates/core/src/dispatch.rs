use crate::intent::normalize_label;
use crate::models::Intent;

pub const RECOMMENDATION_REPLY: &str =
    "فهمت، أنت تريد توصية لتطبيق. سأحلل طلبك وأبحث عن أفضل الخيارات.";

pub const GREETING_REPLY: &str =
    "أهلاً بك! أنا مساعدك الذكي للعثور على التطبيقات. كيف أقدر أساعدك؟";

pub const PROBLEM_REPLY: &str = "شكرًا لإبلاغنا بالمشكلة. تم تسجيلها وسيتم مراجعتها.";

pub const UNRECOGNIZED_REPLY: &str = "عذرًا، لم أفهم طلبك. هل يمكنك إعادة صياغته؟";

pub fn dispatch(intent: Intent, original_text: &str) -> String {
    match intent {
        Intent::AppSearch => handle_app_search(original_text),
        Intent::AppRecommendation => handle_app_recommendation(original_text),
        Intent::GreetingOrChat => handle_greeting_or_chat(original_text),
        Intent::ProblemReport => handle_problem_report(original_text),
    }
}

/// Dispatch for callers holding an untyped label, e.g. a CLI argument.
pub fn dispatch_label(label: &str, original_text: &str) -> String {
    match Intent::from_label(&normalize_label(label)) {
        Some(intent) => dispatch(intent, original_text),
        None => UNRECOGNIZED_REPLY.to_string(),
    }
}

// TODO: look the name up in the app catalogue once one exists.
fn handle_app_search(original_text: &str) -> String {
    format!("فهمت، أنت تبحث عن تطبيق اسمه '{original_text}'. سأبحث لك في قاعدة البيانات.")
}

fn handle_app_recommendation(_original_text: &str) -> String {
    RECOMMENDATION_REPLY.to_string()
}

fn handle_greeting_or_chat(_original_text: &str) -> String {
    GREETING_REPLY.to_string()
}

fn handle_problem_report(_original_text: &str) -> String {
    PROBLEM_REPLY.to_string()
}
