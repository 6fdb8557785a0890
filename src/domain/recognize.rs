//! Keyword guesses that prefill the add forms.

/// Subjects and the words that hint at them, checked in order
const SUBJECT_KEYWORDS: &[(&str, &[&str])] = &[
    ("Math", &["math", "maths", "algebra", "geometry", "function", "equation", "calculus", "proof"]),
    ("Chinese", &["chinese", "composition", "classical", "poem", "poetry"]),
    ("English", &["english", "vocabulary", "grammar", "reading", "listening", "tense"]),
    ("Physics", &["physics", "mechanics", "electricity", "optics", "force", "energy"]),
    ("Chemistry", &["chemistry", "element", "reaction", "molecule", "periodic"]),
];

/// Priority hints; the first matching level wins
const PRIORITY_KEYWORDS: &[(u8, &[&str])] = &[
    (5, &["urgent", "important", "high"]),
    (3, &["normal", "medium"]),
    (1, &["low"]),
];

fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn contains_any(words: &[String], keywords: &[&str]) -> bool {
    keywords.iter().any(|k| words.iter().any(|w| w == k))
}

/// Guess the subject a piece of text is about
pub fn suggest_subject(text: &str) -> Option<&'static str> {
    let words = words(text);
    SUBJECT_KEYWORDS
        .iter()
        .find(|(_, keywords)| contains_any(&words, keywords))
        .map(|(subject, _)| *subject)
}

/// Guess a 1-5 priority from urgency words
pub fn suggest_priority(text: &str) -> Option<u8> {
    let words = words(text);
    PRIORITY_KEYWORDS
        .iter()
        .find(|(_, keywords)| contains_any(&words, keywords))
        .map(|(priority, _)| *priority)
}
