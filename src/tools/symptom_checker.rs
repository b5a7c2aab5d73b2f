//! Symptom checker tool - mock symptom summary formatter

/// Format a basic symptom assessment
///
/// Pure formatting over the inputs; always succeeds. A real implementation
/// would query a medical knowledge base.
pub fn summarize_symptoms(symptoms: &str, age: u64, gender: &str) -> String {
    format!(
        "Symptom Analysis for {age}-year-old {gender}:\n\
         Symptoms: {symptoms}\n\
         \n\
         Basic Assessment:\n\
         - Symptoms categorized and analyzed\n\
         - Common conditions considered based on age and gender\n\
         - General recommendations provided\n\
         \n\
         Note: This is preliminary analysis and should be verified by healthcare professionals."
    )
}
