//! Medical guideline lookup tool - mock guideline table

/// Returned for any condition not in the table, including the empty string
pub const FALLBACK_GUIDELINE: &str =
    "Consult current medical guidelines for specific recommendations";

/// Look up the treatment guideline for a condition
///
/// Case-insensitive exact match only; no partial or fuzzy matching, and
/// surrounding whitespace is significant. Total: every input maps to either a
/// table entry or [`FALLBACK_GUIDELINE`].
pub fn lookup_guideline(condition: &str) -> &'static str {
    match condition.to_lowercase().as_str() {
        "hypertension" => "Lifestyle modifications + consider medication if BP > 130/80",
        "diabetes" => "Monitor blood sugar, dietary control, exercise, medication as needed",
        "asthma" => "Inhaled corticosteroids for maintenance, rescue inhalers for acute symptoms",
        "migraine" => "Acute treatment + preventive medications for frequent episodes",
        _ => FALLBACK_GUIDELINE,
    }
}
