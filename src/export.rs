//! JSON form of an [`AnalysisReport`], for code generators written in
//! other languages. Token sequences are rendered with their names.

use serde::Serialize;

use crate::base::BlockId;
use crate::grammar::{BlockKind, Grammar};
use crate::lookahead::LookaheadSet;
use crate::report::{AnalysisReport, Branch, Diagnostic};

#[derive(Debug, Serialize)]
struct ReportJson<'a> {
    max_k: usize,
    tokens: Vec<&'a str>,
    rules: Vec<RuleJson<'a>>,
    decisions: Vec<DecisionJson<'a>>,
    ambiguities: Vec<AmbiguityJson<'a>>,
    diagnostics: Vec<DiagnosticJson<'a>>,
}

#[derive(Debug, Serialize)]
struct RuleJson<'a> {
    name: &'a str,
    entry: bool,
    left_recursive: bool,
}

#[derive(Debug, Serialize)]
struct DecisionJson<'a> {
    block: BlockId,
    rule: &'a str,
    kind: BlockKind,
    depth: usize,
    deterministic: bool,
    branches: Vec<BranchJson>,
}

#[derive(Debug, Serialize)]
struct BranchJson {
    /// Alternative index, or `null` for the exit branch.
    alternative: Option<usize>,
    lookahead: Vec<String>,
}

#[derive(Debug, Serialize)]
struct AmbiguityJson<'a> {
    block: BlockId,
    rule: &'a str,
    first: Option<usize>,
    second: Option<usize>,
    depth: usize,
    overlap: Vec<String>,
    overlap_size: usize,
}

#[derive(Debug, Serialize)]
struct DiagnosticJson<'a> {
    severity: &'static str,
    code: Option<&'a str>,
    message: &'a str,
    rule: Option<&'a str>,
    notes: Vec<&'a str>,
}

fn branch_index(branch: Branch) -> Option<usize> {
    match branch {
        Branch::Alternative(index) => Some(index),
        Branch::Exit => None,
    }
}

fn diagnostic_json(diagnostic: &Diagnostic) -> DiagnosticJson<'_> {
    DiagnosticJson {
        severity: diagnostic.severity.as_str(),
        code: diagnostic.code.as_deref(),
        message: &diagnostic.message,
        rule: diagnostic.rule.as_deref(),
        notes: diagnostic.notes.iter().map(|n| n.as_ref()).collect(),
    }
}

impl AnalysisReport {
    fn to_export<'a>(&'a self, grammar: &'a Grammar) -> ReportJson<'a> {
        let vocabulary = grammar.vocabulary();
        let render = |set: &LookaheadSet| set.render(vocabulary);
        ReportJson {
            max_k: grammar.max_k(),
            tokens: vocabulary.iter().map(|t| vocabulary.name(t)).collect(),
            rules: grammar
                .rules()
                .map(|(id, rule)| RuleJson {
                    name: &rule.name,
                    entry: rule.entry,
                    left_recursive: self.left_recursive.contains(&id),
                })
                .collect(),
            decisions: self
                .decisions
                .iter()
                .map(|decision| DecisionJson {
                    block: decision.block,
                    rule: &grammar.rule(decision.rule).name,
                    kind: decision.kind,
                    depth: decision.depth,
                    deterministic: decision.deterministic,
                    branches: decision
                        .branches
                        .iter()
                        .map(|b| BranchJson {
                            alternative: branch_index(b.branch),
                            lookahead: render(&b.lookahead),
                        })
                        .collect(),
                })
                .collect(),
            ambiguities: self
                .ambiguities
                .iter()
                .map(|ambiguity| AmbiguityJson {
                    block: ambiguity.block,
                    rule: &grammar.rule(ambiguity.rule).name,
                    first: branch_index(ambiguity.first),
                    second: branch_index(ambiguity.second),
                    depth: ambiguity.depth,
                    overlap: render(&ambiguity.overlap),
                    overlap_size: ambiguity.overlap_size,
                })
                .collect(),
            diagnostics: self.diagnostics.iter().map(diagnostic_json).collect(),
        }
    }

    /// Pretty-printed JSON, naming tokens and rules from `grammar`.
    ///
    /// # Errors
    ///
    /// Returns the serializer's error; the report itself always serializes.
    pub fn to_json(&self, grammar: &Grammar) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.to_export(grammar))
    }

    /// The same document as a [`serde_json::Value`].
    ///
    /// # Errors
    ///
    /// Returns the serializer's error.
    pub fn to_json_value(&self, grammar: &Grammar) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self.to_export(grammar))
    }
}
