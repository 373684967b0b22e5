//! Generative-language boundary for Mediliver.
//!
//! Builds `generateContent` requests for prescription-photo extraction and health
//! guidance, validates structured answers, and substitutes fixed messages when the
//! model fails. The HTTP backend is behind the `gemini` feature; tests use
//! [`MockModel`].

pub mod assistant;
pub mod client;
pub mod extraction;
#[cfg(feature = "gemini")]
pub mod gemini;
pub mod guidance;
pub mod prompts;

pub use assistant::*;
pub use client::*;
pub use extraction::*;
#[cfg(feature = "gemini")]
pub use gemini::GeminiClient;
pub use guidance::*;
pub use prompts::*;
