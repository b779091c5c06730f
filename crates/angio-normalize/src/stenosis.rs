//! Stenosis percentage extraction from free-text clinical descriptions.
//!
//! Extraction is a fixed, ordered rule table evaluated first-match-wins over
//! a closed vocabulary — not open-ended text understanding. A cell is only
//! considered at all when it looks like a stenosis statement (contains a
//! percent sign or one of the gate keywords); anything else contributes no
//! lesion and no diagnostic.

/// A cell mentioning none of these (and no `%`) is not a stenosis statement.
const GATE_KEYWORDS: [&str; 9] = [
    "狭窄", "闭塞", "堵塞", "阻塞", "病变", "肌桥", "正常", "未见狭窄", "无狭窄",
];

/// Explicit "no stenosis" markers.
const NEGATIVE_MARKERS: [&str; 3] = ["无狭窄", "正常", "未见狭窄"];

/// Total-occlusion markers.
const OCCLUSION_MARKERS: [&str; 4] = ["完全闭塞", "闭塞", "100%", "CTO"];

/// Severity adjectives with fixed representative percentages. Checked in
/// order, so compounds like 中重度 resolve to the heavier grade.
const SEVERITY_KEYWORDS: [(&str, f64); 4] =
    [("重度", 90.0), ("严重", 90.0), ("中度", 70.0), ("轻度", 50.0)];

/// One extraction rule: name for diagnostics/tests, function that either
/// produces a percentage or passes.
pub struct ExtractionRule {
    pub name: &'static str,
    pub apply: fn(&str) -> Option<f64>,
}

/// The rule table, in evaluation order.
pub const EXTRACTION_RULES: [ExtractionRule; 4] = [
    ExtractionRule {
        name: "negative-marker",
        apply: negative_marker,
    },
    ExtractionRule {
        name: "occlusion-marker",
        apply: occlusion_marker,
    },
    ExtractionRule {
        name: "numeric",
        apply: numeric_value,
    },
    ExtractionRule {
        name: "severity-adjective",
        apply: severity_adjective,
    },
];

/// Whether the text qualifies for extraction at all.
pub fn is_stenosis_statement(text: &str) -> bool {
    text.contains('%') || GATE_KEYWORDS.iter().any(|k| text.contains(k))
}

/// Extract a stenosis percentage from a free-text description.
///
/// Returns `None` when the text is not a stenosis statement or no rule
/// matches; the caller contributes no lesion in that case.
pub fn extract_stenosis_percent(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() || !is_stenosis_statement(text) {
        return None;
    }
    EXTRACTION_RULES.iter().find_map(|rule| (rule.apply)(text))
}

fn negative_marker(text: &str) -> Option<f64> {
    NEGATIVE_MARKERS
        .iter()
        .any(|k| text.contains(k))
        .then_some(0.0)
}

fn occlusion_marker(text: &str) -> Option<f64> {
    OCCLUSION_MARKERS
        .iter()
        .any(|k| text.contains(k))
        .then_some(100.0)
}

fn numeric_value(text: &str) -> Option<f64> {
    let numbers = scan_numbers(text);
    match numbers.as_slice() {
        [] => None,
        [single] => Some(*single),
        // Ranges ("50-75%") and repeated mentions both resolve to the
        // worst value.
        many => Some(many.iter().copied().fold(f64::MIN, f64::max)),
    }
}

fn severity_adjective(text: &str) -> Option<f64> {
    SEVERITY_KEYWORDS
        .iter()
        .find(|(k, _)| text.contains(k))
        .map(|(_, percent)| *percent)
}

/// All numeric substrings of `text`, in order of appearance.
pub fn scan_numbers(text: &str) -> Vec<f64> {
    let mut numbers = Vec::new();
    let mut current = String::new();
    for ch in text.chars() {
        if ch.is_ascii_digit() || (ch == '.' && !current.is_empty() && !current.contains('.')) {
            current.push(ch);
        } else if !current.is_empty() {
            if let Ok(n) = current.trim_end_matches('.').parse::<f64>() {
                numbers.push(n);
            }
            current.clear();
        }
    }
    if !current.is_empty()
        && let Ok(n) = current.trim_end_matches('.').parse::<f64>()
    {
        numbers.push(n);
    }
    numbers
}
