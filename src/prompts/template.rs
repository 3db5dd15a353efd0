// file: src/prompts/template.rs
// description: prompt templates with named placeholders and single-pass rendering
// reference: Internal code standards

use crate::error::{PipelineError, Result};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::collections::HashMap;

lazy_static! {
    static ref PLACEHOLDER: Regex =
        Regex::new(r"\{([a-z_][a-z0-9_]*)\}").expect("PLACEHOLDER regex is valid");
}

#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
    input_variables: Vec<String>,
}

impl PromptTemplate {
    pub fn new(template: &str, input_variables: &[&str]) -> Self {
        Self {
            template: template.to_string(),
            input_variables: input_variables.iter().map(|v| v.to_string()).collect(),
        }
    }

    pub fn input_variables(&self) -> &[String] {
        &self.input_variables
    }

    /// Substitutes every declared placeholder in one pass, so values that
    /// themselves contain `{name}` are inserted verbatim.
    pub fn render(&self, values: &[(&str, &str)]) -> Result<String> {
        let map: HashMap<&str, &str> = values.iter().copied().collect();

        if let Some(missing) = self
            .input_variables
            .iter()
            .find(|v| !map.contains_key(v.as_str()))
        {
            return Err(PipelineError::Prompt(format!(
                "missing value for prompt variable '{}'",
                missing
            )));
        }

        let rendered = PLACEHOLDER.replace_all(&self.template, |caps: &Captures| {
            let name = &caps[1];
            if self.input_variables.iter().any(|v| v == name) {
                map[name].to_string()
            } else {
                caps[0].to_string()
            }
        });

        Ok(rendered.into_owned())
    }
}
