use crate::ClassifierError;

/// Predicted class and the per-class scores it was chosen from
///
/// Built once per classification and never modified.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    class_index: usize,
    scores: Vec<f32>,
}

impl ClassificationResult {
    /// Pick the highest score (first one wins on ties, NaN never wins)
    pub fn from_scores(scores: Vec<f32>) -> Result<Self, ClassifierError> {
        if scores.is_empty() {
            return Err(ClassifierError::EmptyOutput);
        }
        let mut class_index = 0;
        let mut best = f32::NEG_INFINITY;
        for (i, &score) in scores.iter().enumerate() {
            if score > best {
                best = score;
                class_index = i;
            }
        }
        Ok(Self {
            class_index,
            scores,
        })
    }

    /// All-zero scores with the first class selected
    pub fn fallback(class_count: usize) -> Self {
        Self {
            class_index: 0,
            scores: vec![0.0; class_count],
        }
    }

    pub fn class_index(&self) -> usize {
        self.class_index
    }

    pub fn scores(&self) -> &[f32] {
        &self.scores
    }

    pub fn class_count(&self) -> usize {
        self.scores.len()
    }
}
