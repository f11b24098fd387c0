//! Diagnostics produced while checking a grammar's decisions.
//!
//! Ambiguities, unreachable alternatives and left recursion are reported
//! here rather than as errors: a grammar with conflicts is still usable,
//! the generated parser simply prefers the earlier branch.

use std::fmt;
use std::sync::Arc;

use smol_str::SmolStr;

use crate::base::BlockId;

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A diagnostic message attached to a rule and, where it applies, a block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Diagnostic code (e.g., "W0001").
    pub code: Option<Arc<str>>,
    pub message: Arc<str>,
    /// Rule the diagnostic is about.
    pub rule: Option<SmolStr>,
    /// Decision block the diagnostic is about.
    pub block: Option<BlockId>,
    /// Additional notes, e.g. how a conflict is resolved.
    pub notes: Vec<Arc<str>>,
}

impl Diagnostic {
    fn new(severity: Severity, message: impl Into<Arc<str>>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            rule: None,
            block: None,
            notes: Vec::new(),
        }
    }

    /// Create a new error diagnostic.
    pub fn error(message: impl Into<Arc<str>>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a new warning diagnostic.
    pub fn warning(message: impl Into<Arc<str>>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Set the diagnostic code.
    pub fn with_code(mut self, code: impl Into<Arc<str>>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_rule(mut self, rule: impl Into<SmolStr>) -> Self {
        self.rule = Some(rule.into());
        self
    }

    pub fn with_block(mut self, block: BlockId) -> Self {
        self.block = Some(block);
        self
    }

    /// Add a note.
    pub fn with_note(mut self, note: impl Into<Arc<str>>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{}[{}]: {}", self.severity, code, self.message)?,
            None => write!(f, "{}: {}", self.severity, self.message)?,
        }
        for note in &self.notes {
            write!(f, "\n  note: {}", note)?;
        }
        Ok(())
    }
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

/// Diagnostic codes for grammar analysis.
///
/// - **E0001-E0099**: grammar defects the generated parser cannot work around
/// - **W0001-W0099**: conflicts resolved by branch order, dead alternatives
pub mod codes {
    /// A rule reaches itself without consuming a token.
    pub const LEFT_RECURSION: &str = "E0001";

    /// Two alternatives share lookahead.
    pub const AMBIGUOUS_ALTERNATIVES: &str = "W0001";
    /// An alternative shares lookahead with the block's exit.
    pub const EXIT_AMBIGUITY: &str = "W0002";
    /// An alternative can never be predicted.
    pub const UNREACHABLE_ALTERNATIVE: &str = "W0003";
}

// ============================================================================
// DIAGNOSTIC COLLECTOR
// ============================================================================

/// Collects diagnostics while a grammar is checked.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic.
    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Add a left recursion error.
    pub fn left_recursion(&mut self, rule: &str) {
        self.add(
            Diagnostic::error(format!(
                "rule '{}' is left-recursive: it can reach itself without consuming a token",
                rule
            ))
            .with_code(codes::LEFT_RECURSION)
            .with_rule(rule),
        );
    }

    /// Add a warning for an alternative with empty lookahead.
    pub fn unreachable_alternative(
        &mut self,
        rule: &str,
        block: BlockId,
        location: &str,
        alternative: usize,
    ) {
        self.add(
            Diagnostic::warning(format!(
                "alternative {} of {} can never be chosen: no token sequence predicts it",
                alternative + 1,
                location
            ))
            .with_code(codes::UNREACHABLE_ALTERNATIVE)
            .with_rule(rule)
            .with_block(block),
        );
    }

    /// Add an ambiguity warning. `branches` names the two branches,
    /// `evidence` the rendered overlapping sequences.
    pub fn ambiguity(
        &mut self,
        rule: &str,
        block: BlockId,
        location: &str,
        branches: (&str, &str),
        evidence: &str,
        involves_exit: bool,
    ) {
        let code = if involves_exit {
            codes::EXIT_AMBIGUITY
        } else {
            codes::AMBIGUOUS_ALTERNATIVES
        };
        self.add(
            Diagnostic::warning(format!(
                "{}: {} and {} are both predicted by {}",
                location, branches.0, branches.1, evidence
            ))
            .with_code(code)
            .with_rule(rule)
            .with_block(block)
            .with_note(format!("resolved in favour of {}", branches.0)),
        );
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Diagnostics about one rule.
    pub fn diagnostics_for_rule(&self, rule: &str) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.rule.as_deref() == Some(rule))
            .collect()
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Take all diagnostics, leaving the collector empty.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}
