// Recommendation engine: prompt → Gemini → free-text extraction → normalized records.
// All Gemini calls go through llm_client — no direct HTTP calls here.

pub mod extractor;
pub mod handlers;
pub mod mock;
pub mod prompts;
pub mod record;
