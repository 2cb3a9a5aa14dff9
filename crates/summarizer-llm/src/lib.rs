pub mod groq;
pub mod protocol;
pub mod provider;

pub use groq::{GroqConfig, GroqProvider, DEFAULT_GROQ_BASE_URL, DEFAULT_GROQ_MODEL};
pub use provider::{LLMError, Result, TextGenerator};
