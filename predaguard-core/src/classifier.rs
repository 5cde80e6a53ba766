//! Argmax classification over per-class scores

use crate::traits::Indicator;
use crate::NUM_CLASSES;

/// Result of one inference cycle
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClassificationResult {
    /// Winning class
    pub predicted: Indicator,
    /// Score of the winning class, as reported (not softmaxed)
    pub confidence: f32,
    /// Per-class scores in class-index order
    pub scores: [f32; NUM_CLASSES],
}

impl ClassificationResult {
    /// Class index of the prediction
    pub fn class(&self) -> usize {
        self.predicted.class()
    }
}

/// Index of the highest score; the first maximum wins ties
///
/// NaN scores never win over a number.
pub fn argmax(scores: &[f32; NUM_CLASSES]) -> usize {
    let mut best = 0;
    for (i, &score) in scores.iter().enumerate().skip(1) {
        if score > scores[best] || (scores[best].is_nan() && !score.is_nan()) {
            best = i;
        }
    }
    best
}

/// Classify a score vector
pub fn classify(scores: [f32; NUM_CLASSES]) -> ClassificationResult {
    let best = argmax(&scores);
    ClassificationResult {
        // NUM_CLASSES matches Indicator::ALL
        predicted: Indicator::ALL[best],
        confidence: scores[best],
        scores,
    }
}
