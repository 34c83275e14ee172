//! Prompt Templates
//!
//! The online helper sends a fixed system instruction with every request, and
//! the quiz and outline tools send their own user prompts. Built-in defaults
//! are always available; a prompts directory can override any of them with a
//! `<key>.md` file.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

pub const SYSTEM_PROMPT_KEY: &str = "system_prompt";
pub const QUIZ_PROMPT_KEY: &str = "generate_quiz";
pub const OUTLINE_PROMPT_KEY: &str = "create_outline";

const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant for teachers. You specialize in two areas:\n\
1. IEP (Individualized Education Program) support: writing SMART goals, choosing accommodations, and tracking student progress.\n\
2. Mechatronics education: mechanical, electrical, computer, and control engineering concepts, hands-on classroom projects, and career guidance.\n\
Give practical, encouraging answers that a classroom teacher can use right away.";

const DEFAULT_QUIZ_PROMPT: &str = "Create a 5-question multiple-choice quiz that mixes mechatronics fundamentals and IEP best practices. Give four options (a-d) per question and list the answer key at the end.";

const DEFAULT_OUTLINE_PROMPT: &str = "Create a 7-slide presentation outline based on this recent conversation:\n\n{context}\n\nFor each slide give a title and two or three bullet points.";

/// The set of prompt templates used by the online helper.
#[derive(Debug, Clone)]
pub struct Prompts {
    templates: HashMap<String, String>,
}

impl Default for Prompts {
    fn default() -> Self {
        let templates = [
            (SYSTEM_PROMPT_KEY, DEFAULT_SYSTEM_PROMPT),
            (QUIZ_PROMPT_KEY, DEFAULT_QUIZ_PROMPT),
            (OUTLINE_PROMPT_KEY, DEFAULT_OUTLINE_PROMPT),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
        Self { templates }
    }
}

impl Prompts {
    /// Loads the defaults, then overrides them with any `*.md` file in
    /// `prompts_path`. A missing directory leaves the defaults in place.
    pub fn load(prompts_path: &Path) -> Result<Self> {
        let mut prompts = Self::default();
        if !prompts_path.is_dir() {
            debug!(path = %prompts_path.display(), "No prompts directory; using built-in prompts");
            return Ok(prompts);
        }

        for entry in fs::read_dir(prompts_path)
            .with_context(|| format!("Failed to read {}", prompts_path.display()))?
        {
            let path = entry?.path();
            if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("md") {
                let key = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .context("Could not get file stem")?
                    .to_string();
                let content = fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                info!(prompt = %key, "Loaded prompt override");
                prompts.templates.insert(key, content);
            }
        }
        Ok(prompts)
    }

    pub fn system_prompt(&self) -> &str {
        self.get(SYSTEM_PROMPT_KEY)
    }

    pub fn quiz_prompt(&self) -> &str {
        self.get(QUIZ_PROMPT_KEY)
    }

    /// The outline request with `{context}` replaced by the recent chat.
    pub fn outline_prompt(&self, context: &str) -> String {
        self.get(OUTLINE_PROMPT_KEY).replace("{context}", context)
    }

    fn get(&self, key: &str) -> &str {
        self.templates.get(key).map(String::as_str).unwrap_or_default()
    }
}
