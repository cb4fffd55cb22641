//! Generator options.

use serde::{Deserialize, Serialize};

/// Line terminator written after every generated line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    /// `\n`
    #[default]
    Lf,
    /// `\r\n`
    CrLf,
}

impl LineEnding {
    /// Returns the terminator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }
}

/// Options for the code generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CodegenOptions {
    /// Spaces per indentation level.
    pub indent_width: usize,
    /// Line terminator.
    pub line_ending: LineEnding,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl CodegenOptions {
    /// Creates default options: four-space indent, `\n` line endings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            indent_width: 4,
            line_ending: LineEnding::Lf,
        }
    }

    /// Sets the indentation width.
    #[must_use]
    pub const fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    /// Sets the line terminator.
    #[must_use]
    pub const fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = CodegenOptions::default();
        assert_eq!(options.indent_width, 4);
        assert_eq!(options.line_ending.as_str(), "\n");
    }

    #[test]
    fn builder_methods() {
        let options = CodegenOptions::new()
            .with_indent_width(2)
            .with_line_ending(LineEnding::CrLf);
        assert_eq!(options.indent_width, 2);
        assert_eq!(options.line_ending, LineEnding::CrLf);
    }

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let options: CodegenOptions = serde_json::from_str(r#"{ "lineEnding": "crlf" }"#).unwrap();
        assert_eq!(options, CodegenOptions::new().with_line_ending(LineEnding::CrLf));
    }
}
