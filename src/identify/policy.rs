//! Turning a raw `(label, score)` into the label we report.
//!
//! Below-threshold predictions fall back to `txt` when the predicted label
//! is tagged `text` in the content-type table and to `unknown` otherwise.
//! The fallback trusts the classifier's text/binary call even when it does
//! not trust the specific label, and it never looks at the bytes again.
//!
//! High confidence compares against the label's own threshold, raised to
//! the medium one when it is lower, so a stricter mode never accepts a
//! prediction that a looser mode rejects.

use crate::config::PredictionMode;
use crate::constants::labels;
use crate::content::ContentTypeTable;
use crate::model::{ModelConfig, ModelOutput};

#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub label: String,
    pub score: f32,
    /// Whether the (overwritten) model label was kept.
    pub accepted: bool,
}

pub struct DecisionPolicy<'a> {
    mode: PredictionMode,
    config: &'a ModelConfig,
    table: &'a ContentTypeTable,
}

impl<'a> DecisionPolicy<'a> {
    pub fn new(
        mode: PredictionMode,
        config: &'a ModelConfig,
        table: &'a ContentTypeTable,
    ) -> Self {
        Self {
            mode,
            config,
            table,
        }
    }

    pub fn mode(&self) -> PredictionMode {
        self.mode
    }

    /// Minimum score `label` needs under `mode`; `None` means always
    /// accepted. The high-confidence bar never drops below the medium one.
    pub fn threshold(
        &self,
        mode: PredictionMode,
        label: &str,
    ) -> Option<f32> {
        let medium = self.config.medium_confidence_threshold;
        match mode {
            PredictionMode::BestGuess => None,
            PredictionMode::MediumConfidence => Some(medium),
            PredictionMode::HighConfidence => Some(self.config.threshold_for(label).max(medium)),
        }
    }

    pub fn accepts(
        &self,
        mode: PredictionMode,
        label: &str,
        score: f32,
    ) -> bool {
        self.threshold(mode, label).is_none_or(|t| score >= t)
    }

    pub fn decide(
        &self,
        raw: &ModelOutput,
    ) -> Decision {
        let label = self.config.overwrite(&raw.label);
        if self.accepts(self.mode, label, raw.score) {
            return Decision {
                label: label.to_string(),
                score: raw.score,
                accepted: true,
            };
        }
        let fallback = if self.table.is_text(label) {
            labels::TXT
        } else {
            labels::UNKNOWN
        };
        Decision {
            label: fallback.to_string(),
            score: raw.score,
            accepted: false,
        }
    }
}
