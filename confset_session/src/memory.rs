use crate::{Session, SessionError};

/// Deterministic in-memory transport.
///
/// Stores applied set lines in arrival order and answers
/// `show configuration <path> | display set relative` by prefix filtering,
/// wrapped in the standard envelope markers. `delete` lines remove by path
/// prefix. Used by integration tests and examples; it is not a device
/// emulator beyond what the lifecycle flows need.
#[derive(Debug, Clone, Default)]
pub struct MemorySession {
    lines: Vec<String>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently applied absolute set lines.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl Session for MemorySession {
    fn command(&mut self, query: &str) -> Result<String, SessionError> {
        let Some(path) = parse_show(query) else {
            return Err(SessionError::Transport(format!(
                "unsupported query `{query}`"
            )));
        };

        let exact = format!("set {path}");
        let prefixed = format!("set {path} ");

        let mut out = String::from("<configuration-set>\n");
        for line in &self.lines {
            if let Some(rest) = line.strip_prefix(prefixed.as_str()) {
                out.push_str("set ");
                out.push_str(rest);
                out.push('\n');
            } else if line == &exact {
                // Bare declaration line: the resource exists with no
                // attributes below it.
                out.push_str(line);
                out.push('\n');
            }
        }
        out.push_str("</configuration-set>\n");
        Ok(out)
    }

    fn config_set(&mut self, lines: &[String]) -> Result<(), SessionError> {
        for line in lines {
            if let Some(path) = line.strip_prefix("delete ") {
                let exact = format!("set {path}");
                let prefixed = format!("set {path} ");
                self.lines
                    .retain(|existing| existing != &exact && !existing.starts_with(&prefixed));
            } else if line.starts_with("set ") {
                if !self.lines.contains(line) {
                    self.lines.push(line.clone());
                }
            } else {
                return Err(SessionError::CommitFailed(format!(
                    "unrecognized configuration line `{line}`"
                )));
            }
        }
        Ok(())
    }
}

fn parse_show(query: &str) -> Option<&str> {
    query
        .strip_prefix("show configuration ")?
        .strip_suffix(" | display set relative")
}
