//! Plain-text rendering of declaration lists.
//!
//! # Example
//!
//! ```
//! use fdset::constraint::Constraint;
//! use fdset::registry::Registry;
//! use fdset::render::RenderConfig;
//!
//! let mut registry = Registry::new();
//! let x = registry.declare(Constraint::between(0, 5));
//! registry.declare(Constraint::between(-2, 2) & (Constraint::less_than(x) | Constraint::greater_than(x)));
//!
//! let config = RenderConfig {
//!     names: vec!["x".to_string(), "y".to_string()],
//!     ..Default::default()
//! };
//! let text = registry.to_text_with_config(&config).unwrap();
//! assert_eq!(text, "x in between(0, 5)\ny in and(between(-2, 2), or(< x, > x))\n");
//! ```

use std::fmt::Write;

use crate::registry::Registry;

/// Configuration for [`Registry::to_text_with_config`].
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Variable names by index (default: none, variables print as `x{index}`)
    pub names: Vec<String>,
    /// Word between a variable and its constraint (default: "in")
    pub relation: &'static str,
    /// Line terminator (default: "\n")
    pub line_end: &'static str,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            names: Vec::new(),
            relation: "in",
            line_end: "\n",
        }
    }
}

impl RenderConfig {
    fn name(&self, index: usize) -> String {
        match self.names.get(index) {
            Some(name) => name.clone(),
            None => format!("x{}", index),
        }
    }
}

impl Registry {
    /// Renders every declaration on its own line, with default settings.
    pub fn to_text(&self) -> Result<String, std::fmt::Error> {
        self.to_text_with_config(&RenderConfig::default())
    }

    /// Renders every declaration on its own line.
    pub fn to_text_with_config(&self, config: &RenderConfig) -> Result<String, std::fmt::Error> {
        let mut text = String::new();
        for (var, constraint) in self.iter() {
            write!(
                text,
                "{} {} {}{}",
                config.name(var.index()),
                config.relation,
                constraint.display_with(&config.names),
                config.line_end
            )?;
        }
        Ok(text)
    }
}
