//! Prescription scanning and health guidance, configured from [`AssistantSettings`].

use mediliver_llm::{
    Assistant, ExtractedMedication, GeminiClient, GenerativeModel, ModelResult, Timing,
};
#[cfg(test)]
use mediliver_llm::MockModel;
use serde_json::Value;

use crate::config::AssistantSettings;
use crate::models::{DosePeriod, Medication};

/// Model backing the session's assistant.
pub enum AssistantModel {
    Gemini(GeminiClient),
    #[cfg(test)]
    Scripted(MockModel),
}

impl GenerativeModel for AssistantModel {
    async fn generate(&self, request: &Value) -> ModelResult<String> {
        match self {
            AssistantModel::Gemini(client) => client.generate(request).await,
            #[cfg(test)]
            AssistantModel::Scripted(mock) => mock.generate(request).await,
        }
    }
}

/// Build the assistant, or `None` when no API key is configured.
pub fn from_settings(settings: &AssistantSettings) -> Option<Assistant<AssistantModel>> {
    let key = settings
        .api_key
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty());

    match key {
        Some(key) => {
            tracing::info!(model = %settings.model, "assistant configured");
            let client = GeminiClient::new(&settings.endpoint, &settings.model, key);
            Some(Assistant::with_timeout(
                AssistantModel::Gemini(client),
                settings.timeout(),
            ))
        }
        None => {
            tracing::info!("no assistant API key; scanning and guidance disabled");
            None
        }
    }
}

pub fn period_of(timing: Timing) -> DosePeriod {
    match timing {
        Timing::Morning => DosePeriod::Morning,
        Timing::Afternoon => DosePeriod::Afternoon,
        Timing::Evening => DosePeriod::Evening,
        Timing::BeforeBed => DosePeriod::BeforeBed,
    }
}

/// A pack entry for an extracted medication. Unverified until a pharmacist confirms it.
pub fn to_medication(extracted: ExtractedMedication) -> Medication {
    let mut med = Medication::new(extracted.name, extracted.dosage, period_of(extracted.timing));
    if !extracted.frequency.is_empty() {
        med.frequency = extracted.frequency;
    }
    med.instruction = extracted.instruction;
    med
}
