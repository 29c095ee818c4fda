//! Comma-separated policy text
//!
//! One rule per line, policy type first:
//!
//! ```text
//! p, alice, data1, read
//! g, alice, admin
//! ```

use crate::codec::section_of;
use crate::error::CoreError;
use crate::models::{Model, Rule};

/// Parse one line into `(ptype, rule)`; blank lines and `#` comments yield `None`
pub fn parse_policy_line(line: &str) -> Option<(String, Rule)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let mut tokens = line.split(',').map(|t| t.trim().to_string());
    let ptype = tokens.next()?;
    Some((ptype, tokens.collect()))
}

/// Load every rule in `text` into `model`, returning how many were added
pub fn parse_policy_text(text: &str, model: &mut Model) -> Result<usize, CoreError> {
    let mut count = 0;
    for (idx, line) in text.lines().enumerate() {
        let Some((ptype, rule)) = parse_policy_line(line) else {
            continue;
        };
        if ptype.is_empty() {
            return Err(CoreError::InvalidPolicyLine {
                line: idx + 1,
                reason: "missing policy type".to_string(),
            });
        }
        model.add_policy(section_of(&ptype), &ptype, rule);
        count += 1;
    }
    Ok(count)
}

pub fn format_policy_line<S: AsRef<str>>(ptype: &str, rule: &[S]) -> String {
    let mut line = ptype.to_string();
    for field in rule {
        line.push_str(", ");
        line.push_str(field.as_ref());
    }
    line
}

impl Model {
    /// Render the whole model as policy text, sections and types in key order
    pub fn to_policy_text(&self) -> String {
        let mut out = String::new();
        for (_, assertions) in self.sections() {
            for (ptype, ast) in assertions {
                for rule in &ast.policy {
                    out.push_str(&format_policy_line(ptype, rule.as_slice()));
                    out.push('\n');
                }
            }
        }
        out
    }
}
