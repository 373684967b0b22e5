//! Prompts and request bodies for the generative-language API.
//!
//! Bodies follow the `generateContent` REST shape: `contents[].parts[]` plus an optional
//! `systemInstruction` and `generationConfig`.

use serde_json::{json, Value};

/// Instruction sent alongside the prescription photo.
pub const PRESCRIPTION_PROMPT: &str = "Extract medication details from this prescription. Use simple, clear English for senior citizens. Provide the medication name, dosage, timing (Morning, Afternoon, Evening, Before Bed), and instructions. Also provide a friendly summary of how to take these and any important warnings.";

/// System instruction for the health-guidance chat.
pub const GUIDANCE_SYSTEM_INSTRUCTION: &str = "You are a professional and kind medical assistant for a Filipino telehealth platform called MediliverPH. Always use simple English. Advise consulting their physician for critical changes.";

/// Allowed values of a medication's `timing` field.
pub const TIMING_VALUES: [&str; 4] = ["Morning", "Afternoon", "Evening", "Before Bed"];

/// User prompt for a guidance question.
pub fn make_guidance_prompt(question: &str, medications_json: &str) -> String {
    format!(
        r#"As a medical assistant for MediliverPH, answer the following question for a senior citizen.
User Question: {}
Current Medications: {}
Provide an answer in clear, simple English. Focus on being reassuring, professional, and easy to understand."#,
        question, medications_json
    )
}

/// Structured-output schema for prescription analysis.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "medications": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "id": { "type": "STRING" },
                        "name": { "type": "STRING" },
                        "dosage": { "type": "STRING" },
                        "timing": { "type": "STRING", "enum": TIMING_VALUES },
                        "frequency": { "type": "STRING" },
                        "instruction": { "type": "STRING" }
                    },
                    "required": ["name", "dosage", "timing", "instruction"]
                }
            },
            "summary": { "type": "STRING" },
            "warnings": { "type": "ARRAY", "items": { "type": "STRING" } }
        },
        "required": ["medications", "summary", "warnings"]
    })
}

/// Request body for analysing a base64-encoded JPEG prescription.
pub fn prescription_request(image_base64: &str) -> Value {
    json!({
        "contents": [{
            "parts": [
                { "inlineData": { "mimeType": "image/jpeg", "data": image_base64 } },
                { "text": PRESCRIPTION_PROMPT }
            ]
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": response_schema()
        }
    })
}

/// Request body for a guidance question.
pub fn guidance_request(question: &str, medications_json: &str) -> Value {
    json!({
        "systemInstruction": {
            "parts": [{ "text": GUIDANCE_SYSTEM_INSTRUCTION }]
        },
        "contents": [{
            "role": "user",
            "parts": [{ "text": make_guidance_prompt(question, medications_json) }]
        }]
    })
}
