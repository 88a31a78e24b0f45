//! Keyword trigger that decides whether to recommend specialists after a
//! successful turn.

/// Trigger vocabulary, matched case-insensitively as substrings.
const COUNSELLING_TRIGGERS: &[&str] = &[
    // General counselling terms
    "therapist",
    "therapy",
    "counselor",
    "psychologist",
    "psychiatrist",
    "mental health",
    "psychological",
    "counseling",
    // Chinese equivalents
    "心理医生",
    "治疗师",
    "心理咨询",
    "心理健康",
    "心理治疗",
    "精神科医生",
    "心理辅导",
    "心理问题",
    // Symptoms and concerns
    "anxiety",
    "depression",
    "stress",
    "mental",
    "emotional",
    "焦虑",
    "抑郁",
    "压力",
    "情绪",
    "心理压力",
    // Action phrases
    "find a doctor",
    "need help",
    "looking for help",
    "找医生",
    "需要帮助",
    "寻求帮助",
];

/// Whether the user's raw text mentions a counselling-related topic.
#[must_use]
pub fn mentions_counselling_topic(text: &str) -> bool {
    let lowered = text.to_lowercase();
    COUNSELLING_TRIGGERS
        .iter()
        .any(|trigger| lowered.contains(&trigger.to_lowercase()))
}
