//! Natural-language annotation of control hubs through a local model.

use crate::{Classification, Network};
use std::process::Command;

pub const DEFAULT_MODEL: &str = "llama2";
pub const DEFAULT_PROMPT: &str = "Explain the role of {name} in cancer.";

/// Something that can answer a prompt.
pub trait ModelBackend {
    fn query(&self, prompt: &str) -> Result<String, String>;
}

/// Runs `ollama run <model> <prompt>` and returns its trimmed stdout.
#[derive(Debug, Clone)]
pub struct Ollama {
    pub model: String,
}

impl ModelBackend for Ollama {
    fn query(&self, prompt: &str) -> Result<String, String> {
        let output = Command::new("ollama")
            .args(["run", &self.model, prompt])
            .output()
            .map_err(|e| e.to_string())?;
        if !output.status.success() {
            return Err(format!(
                "{}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }
        String::from_utf8(output.stdout)
            .map(|s| s.trim().to_string())
            .map_err(|e| e.to_string())
    }
}

/// Annotation of one control hub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub node: usize,
    pub name: String,
    pub answer: String,
}

pub struct Validator<B> {
    backend: B,
    prompt_template: String,
}

impl<B: ModelBackend> Validator<B> {
    /// `prompt_template` has every `{name}` replaced by the hub's name.
    pub fn new(backend: B, prompt_template: impl Into<String>) -> Self {
        Validator {
            backend,
            prompt_template: prompt_template.into(),
        }
    }

    /// Query the backend once per control hub, in ascending id order.
    /// A failed query becomes an inline answer rather than an error.
    pub fn annotate(&self, network: &Network, classification: &Classification) -> Vec<Annotation> {
        classification
            .control_hub
            .iter()
            .map(|&node| {
                let name = network.display_name(node);
                let prompt = self.prompt_template.replace("{name}", &name);
                let answer = self
                    .backend
                    .query(&prompt)
                    .unwrap_or_else(|e| format!("Failed to query model: {}", e));
                Annotation { node, name, answer }
            })
            .collect()
    }
}

pub fn render(annotations: &[Annotation]) -> String {
    annotations
        .iter()
        .map(|a| format!("{}: {}\n", a.name, a.answer))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify;
    use std::cell::RefCell;

    struct Scripted {
        prompts: RefCell<Vec<String>>,
    }

    impl ModelBackend for Scripted {
        fn query(&self, prompt: &str) -> Result<String, String> {
            self.prompts.borrow_mut().push(prompt.to_string());
            if prompt.contains("MDM2") {
                Err("connection refused".to_string())
            } else {
                Ok("a tumour suppressor".to_string())
            }
        }
    }

    #[test]
    fn failures_are_inline() {
        let g = Network::with_names(
            4,
            vec![(1, 2), (2, 3), (3, 4)],
            vec![None, Some("TP53".into()), Some("MDM2".into())],
        )
        .unwrap();
        let backend = Scripted {
            prompts: RefCell::new(Vec::new()),
        };
        let validator = Validator::new(backend, DEFAULT_PROMPT);
        let annotations = validator.annotate(&g, &classify(&g));

        assert_eq!(
            render(&annotations),
            "TP53: a tumour suppressor\nMDM2: Failed to query model: connection refused\n"
        );
        assert_eq!(
            validator.backend.prompts.borrow().as_slice(),
            [
                "Explain the role of TP53 in cancer.",
                "Explain the role of MDM2 in cancer."
            ]
        );
    }

    #[test]
    fn unnamed_hub_uses_id() {
        let g = Network::new(3, vec![(1, 2), (2, 3)]).unwrap();
        let backend = Scripted {
            prompts: RefCell::new(Vec::new()),
        };
        let annotations = Validator::new(backend, "{name}?").annotate(&g, &classify(&g));
        assert_eq!(annotations.len(), 1);
        assert_eq!(annotations[0].node, 2);
        assert_eq!(annotations[0].name, "2");
    }
}
