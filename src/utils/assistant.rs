//! Generative-text collaborator facade. The engine only ever consumes it as
//! prompt-in/text-out; any backend failure degrades to a fixed placeholder
//! string rather than surfacing as an error.

use tracing::warn;

pub const PLACEHOLDER: &str =
    "The assistant is temporarily unavailable. Please try again later.";

pub trait TextGenerator: Send + Sync {
    fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String, String>;
}

/// Default backend when no provider is wired in.
pub struct Unconfigured;

impl TextGenerator for Unconfigured {
    fn generate(&self, _prompt: &str, _system: Option<&str>) -> Result<String, String> {
        Err("no text generation backend configured".to_string())
    }
}

pub struct Assistant {
    backend: Box<dyn TextGenerator>,
}

impl Assistant {
    pub fn new(backend: Box<dyn TextGenerator>) -> Self {
        Self { backend }
    }

    pub fn unconfigured() -> Self {
        Self::new(Box::new(Unconfigured))
    }

    /// Never fails: backend errors come back as the placeholder text.
    pub fn generate(&self, prompt: &str, system: Option<&str>) -> String {
        match self.backend.generate(prompt, system) {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Text generation failed, returning placeholder");
                PLACEHOLDER.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;
    impl TextGenerator for Echo {
        fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String, String> {
            Ok(format!("{}|{}", system.unwrap_or(""), prompt))
        }
    }

    struct Failing;
    impl TextGenerator for Failing {
        fn generate(&self, _: &str, _: Option<&str>) -> Result<String, String> {
            Err("backend down".to_string())
        }
    }

    #[test]
    fn backend_output_passes_through() {
        let assistant = Assistant::new(Box::new(Echo));
        assert_eq!(assistant.generate("hi", Some("sys")), "sys|hi");
    }

    #[test]
    fn failures_degrade_to_placeholder() {
        let assistant = Assistant::new(Box::new(Failing));
        assert_eq!(assistant.generate("hi", None), PLACEHOLDER);
    }

    #[test]
    fn unconfigured_backend_degrades_to_placeholder() {
        let assistant = Assistant::unconfigured();
        assert_eq!(assistant.generate("hi", None), PLACEHOLDER);
    }
}
