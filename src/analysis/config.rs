/// Settings for one analysis pass.
///
/// The lookahead depth itself belongs to the grammar (`max_k`); these only
/// shape what the reporter emits.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "export", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "export", serde(default))]
pub struct AnalyzerConfig {
    /// Report conflicts between a loop/optional alternative and the block's
    /// exit. Blocks with an explicit `greedy` option are never reported.
    pub warn_exit_ambiguities: bool,
    /// Maximum number of overlapping sequences kept as evidence per ambiguity.
    pub max_evidence: usize,
    /// Report alternatives whose lookahead is empty.
    pub report_unreachable: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            warn_exit_ambiguities: true,
            max_evidence: 8,
            report_unreachable: true,
        }
    }
}

impl AnalyzerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_exit_ambiguities(mut self, warn: bool) -> Self {
        self.warn_exit_ambiguities = warn;
        self
    }

    pub fn with_max_evidence(mut self, max: usize) -> Self {
        self.max_evidence = max;
        self
    }

    pub fn with_unreachable(mut self, report: bool) -> Self {
        self.report_unreachable = report;
        self
    }
}
