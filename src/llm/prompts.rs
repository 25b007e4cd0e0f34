//! Prompt templates with `{name}` placeholders

use std::collections::HashMap;

use crate::errors::DocBotError;
use crate::errors::Result;

/// Template for generating prompts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    template: String,
    variables: Vec<String>,
}

impl PromptTemplate {
    /// Create a new prompt template
    pub fn new(template: impl Into<String>) -> Self {
        let template = template.into();
        let variables = extract_variables(&template);
        Self {
            template,
            variables,
        }
    }

    /// Fill in every placeholder; a missing value is an error
    pub fn render(&self, values: &HashMap<&str, &str>) -> Result<String> {
        let mut result = self.template.clone();
        for var in &self.variables {
            let value = values.get(var.as_str()).ok_or_else(|| {
                DocBotError::InvalidInput(format!("missing prompt variable '{var}'"))
            })?;
            result = result.replace(&format!("{{{var}}}"), value);
        }
        Ok(result)
    }

    /// Get required variables
    #[must_use]
    pub fn variables(&self) -> &[String] {
        &self.variables
    }
}

/// Extract placeholder names (identifier characters between single braces)
fn extract_variables(template: &str) -> Vec<String> {
    let mut variables = Vec::new();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '{' {
            continue;
        }

        let mut var_name = String::new();
        while let Some(&ch) = chars.peek() {
            if ch.is_alphanumeric() || ch == '_' {
                var_name.push(ch);
                chars.next();
            } else {
                break;
            }
        }

        if chars.peek() == Some(&'}') && !var_name.is_empty() {
            chars.next();
            if !variables.contains(&var_name) {
                variables.push(var_name);
            }
        }
    }

    variables
}
