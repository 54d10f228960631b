const INDENT: &str = "    ";

#[derive(Debug, Clone, PartialEq, Eq)]
struct Line {
    depth: usize,
    text:  String,
}

/// Line-oriented builder for generated source.
///
/// Indentation belongs to the writer, not to the text: each line remembers
/// its depth, and appending one writer into another re-bases every line at
/// the receiver's current depth. This is what lets a whole document be
/// wrapped in namespace modules after its types were emitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeWriter {
    lines: Vec<Line>,
    depth: usize,
}

impl CodeWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Adds one line at the current depth. Embedded newlines start new lines
    /// at the same depth.
    pub fn line(&mut self, text: impl AsRef<str>) -> &mut Self {
        for part in text.as_ref().split('\n') {
            self.lines.push(Line {
                depth: self.depth,
                text:  part.trim_end().to_string(),
            });
        }
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.lines.push(Line {
            depth: 0,
            text:  String::new(),
        });
        self
    }

    pub fn indent(&mut self) -> &mut Self {
        self.depth += 1;
        self
    }

    pub fn dedent(&mut self) -> &mut Self {
        self.depth = self.depth.saturating_sub(1);
        self
    }

    /// Writes `header {` and indents.
    pub fn open(&mut self, header: impl AsRef<str>) -> &mut Self {
        let header = header.as_ref();
        if header.is_empty() {
            self.line("{");
        } else {
            self.line(format!("{} {{", header));
        }
        self.indent()
    }

    /// Dedents and writes `}`.
    pub fn close(&mut self) -> &mut Self {
        self.close_with("}")
    }

    /// Dedents and writes `text`, for closers such as `});`.
    pub fn close_with(&mut self, text: &str) -> &mut Self {
        self.dedent();
        self.line(text)
    }

    /// Closes the current block and opens a sibling on the same line, as in
    /// `} else {`.
    pub fn reopen(&mut self, header: &str) -> &mut Self {
        self.dedent();
        self.line(format!("}} {} {{", header));
        self.indent()
    }

    /// `header { .. }` with the body written by `body`.
    pub fn block<F>(&mut self, header: impl AsRef<str>, body: F) -> &mut Self
    where
        F: FnOnce(&mut CodeWriter),
    {
        self.open(header);
        body(self);
        self.close()
    }

    /// Copies every line of `other`, shifted to this writer's current depth.
    pub fn append(&mut self, other: &CodeWriter) -> &mut Self {
        for line in &other.lines {
            if line.text.is_empty() {
                self.blank();
            } else {
                self.lines.push(Line {
                    depth: self.depth + line.depth,
                    text:  line.text.clone(),
                });
            }
        }
        self
    }

    /// Renders with four spaces per level. Blank lines carry no indentation.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            if !line.text.is_empty() {
                for _ in 0..line.depth {
                    out.push_str(INDENT);
                }
                out.push_str(&line.text);
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_indents_body() {
        let mut w = CodeWriter::new();
        w.block("fn main()", |w| {
            w.line("let x = 1;");
            w.block("if x > 0", |w| {
                w.line("println!(\"{}\", x);");
            });
        });
        assert_eq!(
            w.render(),
            "fn main() {\n    let x = 1;\n    if x > 0 {\n        println!(\"{}\", x);\n    }\n}\n"
        );
    }

    #[test]
    fn test_append_rebases_lines() {
        let mut inner = CodeWriter::new();
        inner.block("pub struct A", |w| {
            w.line("pub x: i32,");
        });
        inner.blank();

        let mut outer = CodeWriter::new();
        outer.block("pub mod a", |w| {
            w.append(&inner);
        });
        assert_eq!(
            outer.render(),
            "pub mod a {\n    pub struct A {\n        pub x: i32,\n    }\n\n}\n"
        );
    }

    #[test]
    fn test_close_with_and_multiline() {
        let mut w = CodeWriter::new();
        w.open("let y = match x");
        w.line("0 => 1,\n_ => 2,");
        w.close_with("};");
        assert_eq!(w.render(), "let y = match x {\n    0 => 1,\n    _ => 2,\n};\n");
        assert_eq!(w.depth(), 0);
    }

    #[test]
    fn test_reopen() {
        let mut w = CodeWriter::new();
        w.open("if done");
        w.line("a();");
        w.reopen("else");
        w.line("b();");
        w.close();
        assert_eq!(w.render(), "if done {\n    a();\n} else {\n    b();\n}\n");
    }

    #[test]
    fn test_dedent_saturates() {
        let mut w = CodeWriter::new();
        w.close();
        assert_eq!(w.render(), "}\n");
        assert!(!w.is_empty());
    }
}
