//! Indentation-aware text buffer.

use crate::options::CodegenOptions;

/// Accumulates generated lines at the current indentation level.
#[derive(Debug)]
pub struct IndentedWriter {
    out: String,
    unit: String,
    eol: &'static str,
    level: usize,
}

impl IndentedWriter {
    pub fn new(options: &CodegenOptions) -> Self {
        Self {
            out: String::new(),
            unit: " ".repeat(options.indent_width),
            eol: options.line_ending.as_str(),
            level: 0,
        }
    }

    /// Writes one full line.
    pub fn line(&mut self, text: &str) {
        for _ in 0..self.level {
            self.out.push_str(&self.unit);
        }
        self.out.push_str(text);
        self.out.push_str(self.eol);
    }

    pub const fn indent(&mut self) {
        self.level += 1;
    }

    pub const fn dedent(&mut self) {
        self.level = self.level.saturating_sub(1);
    }

    pub fn into_string(self) -> String {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::LineEnding;

    #[test]
    fn indents_lines() {
        let mut w = IndentedWriter::new(&CodegenOptions::default());
        w.line("a(");
        w.indent();
        w.line("b");
        w.dedent();
        w.line(");");
        assert_eq!(w.into_string(), "a(\n    b\n);\n");
    }

    #[test]
    fn honours_options() {
        let options = CodegenOptions::new()
            .with_indent_width(2)
            .with_line_ending(LineEnding::CrLf);
        let mut w = IndentedWriter::new(&options);
        w.indent();
        w.indent();
        w.line("x");
        w.dedent();
        w.dedent();
        w.dedent();
        w.line("y");
        assert_eq!(w.into_string(), "    x\r\ny\r\n");
    }
}
