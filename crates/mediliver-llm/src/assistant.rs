//! Prescription analysis and health guidance over a [`GenerativeModel`].
//!
//! Each operation allows one call in flight; a second submission while the first is
//! outstanding is rejected with [`AssistantError::Busy`]. Calls carry a timeout and are
//! not cancellable.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::client::{GenerativeModel, ModelError};
use crate::extraction::{parse_prescription_analysis, ExtractionError, PrescriptionAnalysis};
use crate::guidance::{finalize_answer, FALLBACK_MESSAGE};
use crate::prompts::{guidance_request, prescription_request};

/// Default per-call timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Assistant errors.
#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("A request is already in progress")]
    Busy,

    #[error("Model did not answer within {0:?}")]
    TimedOut(Duration),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}

pub type AssistantResult<T> = Result<T, AssistantError>;

/// Clears the in-flight flag when the call ends, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> AssistantResult<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| InFlight(flag))
            .map_err(|_| AssistantError::Busy)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct Assistant<M> {
    model: M,
    timeout: Duration,
    scanning: AtomicBool,
    answering: AtomicBool,
}

impl<M: GenerativeModel> Assistant<M> {
    pub fn new(model: M) -> Self {
        Self::with_timeout(model, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(model: M, timeout: Duration) -> Self {
        Self {
            model,
            timeout,
            scanning: AtomicBool::new(false),
            answering: AtomicBool::new(false),
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    async fn call(&self, request: serde_json::Value) -> AssistantResult<String> {
        match tokio::time::timeout(self.timeout, self.model.generate(&request)).await {
            Ok(reply) => Ok(reply?),
            Err(_) => Err(AssistantError::TimedOut(self.timeout)),
        }
    }

    /// Read medications from a base64 JPEG prescription.
    ///
    /// Malformed model output is an error; nothing is partially returned.
    pub async fn analyze_prescription(
        &self,
        image_base64: &str,
    ) -> AssistantResult<PrescriptionAnalysis> {
        let _guard = InFlight::acquire(&self.scanning)?;
        tracing::info!(bytes = image_base64.len(), "analysing prescription");

        let result = self
            .call(prescription_request(image_base64))
            .await
            .and_then(|text| Ok(parse_prescription_analysis(&text)?));

        match &result {
            Ok(analysis) => {
                tracing::info!(medications = analysis.medications.len(), "prescription read")
            }
            Err(e) => tracing::warn!(error = %e, "prescription analysis failed"),
        }
        result
    }

    /// Answer a health question about the given medications.
    ///
    /// Model failures become [`FALLBACK_MESSAGE`] and an empty answer becomes the
    /// "didn't catch that" message. Only [`AssistantError::Busy`] is returned as an error.
    pub async fn health_guidance<T: Serialize + ?Sized>(
        &self,
        question: &str,
        medications: &T,
    ) -> AssistantResult<String> {
        let _guard = InFlight::acquire(&self.answering)?;
        let context = serde_json::to_string(medications).unwrap_or_else(|_| "[]".into());
        tracing::info!("requesting health guidance");

        match self.call(guidance_request(question, &context)).await {
            Ok(text) => Ok(finalize_answer(&text)),
            Err(e) => {
                tracing::warn!(error = %e, "guidance failed, using fallback");
                Ok(FALLBACK_MESSAGE.to_string())
            }
        }
    }

    pub fn is_scanning(&self) -> bool {
        self.scanning.load(Ordering::Acquire)
    }

    pub fn is_answering(&self) -> bool {
        self.answering.load(Ordering::Acquire)
    }
}
