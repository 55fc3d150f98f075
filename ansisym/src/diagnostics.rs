//! Per-run diagnostics sink.
//!
//! Every validation rule reports into a [`Diagnostics`] value owned by the
//! run. Info, warning and fatal reports are accumulated; a panic report is
//! recorded and then returned as an [`Aborted`] error so the caller unwinds.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Fatal,
    Panic,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Fatal => "FATAL",
            Severity::Panic => "PANIC",
        }
    }

    /// Fatal and panic reports block rendering.
    pub fn is_blocking(&self) -> bool {
        matches!(self, Severity::Fatal | Severity::Panic)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub id: String,
    pub rule_id: String,
    pub severity: Severity,
    pub message: String,
    /// Reference name of the block the report concerns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block: Option<String>,
    /// Source line, when the model carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)?;
        if let Some(line) = self.line {
            write!(f, " Line: {}", line)?;
        }
        Ok(())
    }
}

/// Returned when a panic-level diagnostic aborts the current operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("aborted: {0}")]
pub struct Aborted(pub String);

/// Report counts per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub info: usize,
    pub warning: usize,
    pub fatal: usize,
    pub panic: usize,
}

impl SeverityCounts {
    pub fn total(&self) -> usize {
        self.info + self.warning + self.fatal + self.panic
    }
}

/// Where a report points: the block reference name and the source line.
#[derive(Debug, Clone, Copy, Default)]
pub struct Origin<'a> {
    pub block: Option<&'a str>,
    pub line: Option<usize>,
}

impl<'a> Origin<'a> {
    pub const NONE: Origin<'static> = Origin {
        block: None,
        line: None,
    };

    pub fn block(block: &'a str) -> Self {
        Self {
            block: Some(block),
            line: None,
        }
    }

    pub fn at_line(self, line: Option<usize>) -> Self {
        Self {
            line: line.or(self.line),
            ..self
        }
    }
}

/// Accumulates diagnostics for one run.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
    counts: SeverityCounts,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a report. Returns `Err` for panic-level reports, after
    /// recording them.
    pub fn report(
        &mut self,
        severity: Severity,
        rule_id: &str,
        message: impl Into<String>,
        origin: Origin<'_>,
    ) -> Result<(), Aborted> {
        let message = message.into();
        match severity {
            Severity::Info => self.counts.info += 1,
            Severity::Warning => self.counts.warning += 1,
            Severity::Fatal => self.counts.fatal += 1,
            Severity::Panic => self.counts.panic += 1,
        }
        tracing::debug!("{}: {} ({})", severity, message, rule_id);
        self.entries.push(Diagnostic {
            id: uuid::Uuid::new_v4().to_string(),
            rule_id: rule_id.to_string(),
            severity,
            message: message.clone(),
            block: origin.block.map(str::to_string),
            line: origin.line,
        });
        if severity == Severity::Panic {
            return Err(Aborted(message));
        }
        Ok(())
    }

    pub fn info(&mut self, rule_id: &str, message: impl Into<String>, origin: Origin<'_>) {
        self.record(Severity::Info, rule_id, message, origin);
    }

    pub fn warning(&mut self, rule_id: &str, message: impl Into<String>, origin: Origin<'_>) {
        self.record(Severity::Warning, rule_id, message, origin);
    }

    pub fn fatal(&mut self, rule_id: &str, message: impl Into<String>, origin: Origin<'_>) {
        self.record(Severity::Fatal, rule_id, message, origin);
    }

    /// Record a panic and hand back the error to propagate.
    pub fn panic(&mut self, rule_id: &str, message: impl Into<String>, origin: Origin<'_>) -> Aborted {
        match self.report(Severity::Panic, rule_id, message, origin) {
            Err(aborted) => aborted,
            Ok(()) => Aborted(String::new()),
        }
    }

    fn record(&mut self, severity: Severity, rule_id: &str, message: impl Into<String>, origin: Origin<'_>) {
        // Non-panic severities never abort.
        let _ = self.report(severity, rule_id, message, origin);
    }

    pub fn counts(&self) -> SeverityCounts {
        self.counts
    }

    pub fn has_fatal_errors(&self) -> bool {
        self.counts.fatal > 0 || self.counts.panic > 0
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<Diagnostic> {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reports carrying `rule_id`, in report order.
    pub fn with_rule<'s>(&'s self, rule_id: &'s str) -> impl Iterator<Item = &'s Diagnostic> + 's {
        self.entries.iter().filter(move |d| d.rule_id == rule_id)
    }
}
