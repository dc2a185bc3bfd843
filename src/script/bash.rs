//! Bash rendering of script emissions.
//!
//! Output shape:
//!
//! ```text
//! if [[ <guard> ]]; then
//!   echo -en 'fold:start:<id>\r'
//!   echo '$ <command>'            # echoed commands only
//!   <command> || true             # non-asserted
//!   <command> || { echo '...' >&2; exit 1; }   # asserted
//!   echo -en 'fold:end:<id>\r'
//! fi
//! ```

use super::{Body, CommandOptions, ScriptEmitter};

const INDENT: &str = "  ";

/// Accumulates bash text.
#[derive(Debug, Clone, Default)]
pub struct BashScript {
    lines: Vec<String>,
    depth: usize,
}

impl BashScript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Rendered script, newline terminated (empty when nothing was emitted)
    pub fn finish(self) -> String {
        let mut out = self.lines.join("\n");
        if !out.is_empty() {
            out.push('\n');
        }
        out
    }

    fn push(&mut self, line: String) {
        self.lines
            .push(format!("{}{}", INDENT.repeat(self.depth), line));
    }

    fn nested(&self, body: Body<'_>) -> Vec<String> {
        let mut child = BashScript {
            lines: Vec::new(),
            depth: self.depth + 1,
        };
        body(&mut child);
        child.lines
    }

    fn emit(&mut self, text: &str, options: CommandOptions) {
        if options.echo {
            self.push(format!("echo {}", shell_quote(&format!("$ {}", text))));
        }
        if options.assert {
            let failure = format!("The command \"{}\" failed.", text);
            self.push(format!(
                "{} || {{ echo {} >&2; exit 1; }}",
                text,
                shell_quote(&failure)
            ));
        } else {
            self.push(format!("{} || true", text));
        }
    }
}

impl ScriptEmitter for BashScript {
    fn conditional(&mut self, guard: &str, body: Body<'_>) {
        let inner = self.nested(body);
        self.push(format!("if [[ {} ]]; then", guard));
        if inner.is_empty() {
            // bash rejects an empty then-branch
            self.depth += 1;
            self.push(":".to_string());
            self.depth -= 1;
        } else {
            self.lines.extend(inner);
        }
        self.push("fi".to_string());
    }

    fn command(&mut self, text: &str, options: CommandOptions) {
        self.emit(text, options);
    }

    fn folded_section(&mut self, id: &str, body: Body<'_>) {
        let inner = self.nested(body);
        self.push(format!("echo -en 'fold:start:{}\\r'", id));
        // fold bodies render at the fold's own depth
        self.lines
            .extend(inner.into_iter().map(|line| outdent(&line)));
        self.push(format!("echo -en 'fold:end:{}\\r'", id));
    }

    fn set_env(&mut self, name: &str, value: &str, options: CommandOptions) {
        let export = format!("export {}={}", name, double_quote(value));
        self.emit(&export, options);
    }
}

/// Single-quote a string for bash; nothing inside is expanded.
pub fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

/// Double-quote a string for bash, leaving `$` expansions live.
pub fn double_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        if matches!(c, '"' | '\\' | '`') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

fn outdent(line: &str) -> String {
    line.strip_prefix(INDENT).unwrap_or(line).to_string()
}
