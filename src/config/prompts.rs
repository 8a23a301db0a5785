//! Prompt templates for Klipp.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub selection: SelectionPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: std::collections::HashMap<String, String>,
}

/// Prompts for clip selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionPrompts {
    pub system: String,
    pub user: String,
}

impl Default for SelectionPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are an expert video editor who finds the most compelling moments in videos.

When selecting clips, focus on:
1. Interesting statements or stories
2. Emotional moments
3. Surprising revelations or insights
4. Quotable or memorable segments
5. Self-contained moments that work well in isolation

Format your response as JSON with this structure:
{
  "clips": [
    {
      "start": "mm:ss",
      "end": "mm:ss",
      "reason": "brief explanation",
      "caption": "suggested caption"
    }
  ]
}"#
            .to_string(),

            user: r#"Here's a transcript with timestamps:

{{transcript}}

Please identify {{min_clips}}-{{max_clips}} moments that would make {{intent}} great short clips (roughly {{min_seconds}}-{{max_seconds}} seconds each).

Most important of all: {{intent}}."#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&std::collections::HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let selection_path = custom_path.join("selection.toml");
            if selection_path.exists() {
                let content = std::fs::read_to_string(&selection_path)?;
                prompts.selection = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &std::collections::HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(
        &self,
        template: &str,
        vars: &std::collections::HashMap<String, String>,
    ) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompts() {
        let prompts = Prompts::default();
        assert!(!prompts.selection.system.is_empty());
        assert!(prompts.selection.user.contains("{{transcript}}"));
    }

    #[test]
    fn test_render_template() {
        let template = "Find {{min_clips}}-{{max_clips}} clips about {{intent}}.";
        let mut vars = std::collections::HashMap::new();
        vars.insert("min_clips".to_string(), "3".to_string());
        vars.insert("max_clips".to_string(), "10".to_string());
        vars.insert("intent".to_string(), "cooking".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "Find 3-10 clips about cooking.");
    }

    #[test]
    fn test_custom_variables_are_overridden_by_provided() {
        let mut prompts = Prompts::default();
        prompts
            .variables
            .insert("intent".to_string(), "default".to_string());

        let mut vars = std::collections::HashMap::new();
        vars.insert("intent".to_string(), "provided".to_string());

        let result = prompts.render_with_custom("{{intent}}", &vars);
        assert_eq!(result, "provided");
    }
}
