//! Sequenced classification requests
//!
//! Every request takes a [`Ticket`] with a strictly increasing sequence
//! number. A finished [`Prediction`] is only applied while its ticket is still
//! the newest one issued, so a slow inference can never overwrite the result
//! for a later drawing.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use painting::Preprocessed;
use scribble_config::CanvasConfig;
use scribble_ipc::{PredictionSource, PredictionUpdate};
use tracing::{debug, info, warn};

use crate::{ClassificationResult, ClassifierBackend, ClassifierError};

/// Sequence number of one classification request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

/// Outcome of a classification request
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub ticket: Ticket,
    pub result: ClassificationResult,
    pub source: PredictionSource,
}

impl Prediction {
    /// Label of the predicted class
    pub fn label(&self, config: &CanvasConfig) -> String {
        config.label(self.result.class_index())
    }

    /// Message form for the page UI
    pub fn to_update(&self, config: &CanvasConfig) -> PredictionUpdate {
        PredictionUpdate {
            sequence: self.ticket.sequence(),
            class_index: self.result.class_index(),
            label: self.label(config),
            scores: self.result.scores().to_vec(),
            source: self.source,
        }
    }
}

/// Issues tickets and filters out stale predictions
///
/// Clones share the same counters, so a clone can be moved into a spawned
/// task while the original keeps issuing tickets.
#[derive(Debug, Clone, Default)]
pub struct ClassificationDispatcher {
    issued: Arc<AtomicU64>,
    applied: Arc<AtomicU64>,
}

impl ClassificationDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding every earlier one
    pub fn issue(&self) -> Ticket {
        Ticket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Sequence number of the newest ticket (0 before the first request)
    pub fn latest(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }

    /// Sequence number of the last applied prediction (0 if none)
    pub fn last_applied(&self) -> u64 {
        self.applied.load(Ordering::SeqCst)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.sequence() == self.latest()
    }

    /// Accept a finished prediction if no newer request has been issued
    pub fn apply(&self, prediction: &Prediction) -> bool {
        if !self.is_current(prediction.ticket) {
            debug!(
                "Discarding stale prediction {} (latest is {}, showing {})",
                prediction.ticket.sequence(),
                self.latest(),
                self.last_applied()
            );
            return false;
        }
        self.applied
            .store(prediction.ticket.sequence(), Ordering::SeqCst);
        true
    }

    /// Classify the current drawing
    ///
    /// Returns None without issuing a ticket when the backend is not ready.
    /// An empty drawing and a failed model call both produce the fallback
    /// result instead of an error.
    pub async fn classify<B: ClassifierBackend>(
        &self,
        backend: &B,
        drawing: &Preprocessed,
    ) -> Option<Prediction> {
        if !backend.is_ready() {
            info!("Model not loaded yet");
            return None;
        }

        let ticket = self.issue();
        let class_count = backend.class_count();

        let Some(image) = drawing.image() else {
            debug!("Request {}: empty drawing", ticket.sequence());
            return Some(Prediction {
                ticket,
                result: ClassificationResult::fallback(class_count),
                source: PredictionSource::EmptyDrawing,
            });
        };

        match run_backend(backend, image, class_count).await {
            Ok(result) => {
                debug!(
                    "Request {}: class {} scores {:?}",
                    ticket.sequence(),
                    result.class_index(),
                    result.scores()
                );
                Some(Prediction {
                    ticket,
                    result,
                    source: PredictionSource::Model,
                })
            }
            Err(e) => {
                warn!("Classification failed, using fallback: {}", e);
                Some(Prediction {
                    ticket,
                    result: ClassificationResult::fallback(class_count),
                    source: PredictionSource::Fallback,
                })
            }
        }
    }
}

async fn run_backend<B: ClassifierBackend>(
    backend: &B,
    image: &painting::SquareImage,
    class_count: usize,
) -> Result<ClassificationResult, ClassifierError> {
    let result = backend.classify(image).await?;
    if result.class_count() != class_count {
        return Err(ClassifierError::ShapeMismatch {
            expected: class_count,
            found: result.class_count(),
        });
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use painting::{PixelBuffer, Preprocessor, SquareImage};
    use std::cell::Cell;

    /// Backend returning canned scores
    struct FakeBackend {
        ready: bool,
        scores: Result<Vec<f32>, ()>,
        calls: Cell<usize>,
    }

    impl FakeBackend {
        fn with_scores(scores: Vec<f32>) -> Self {
            Self {
                ready: true,
                scores: Ok(scores),
                calls: Cell::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                ready: true,
                scores: Err(()),
                calls: Cell::new(0),
            }
        }
    }

    impl ClassifierBackend for FakeBackend {
        fn is_ready(&self) -> bool {
            self.ready
        }

        fn class_count(&self) -> usize {
            10
        }

        async fn classify(
            &self,
            _image: &SquareImage,
        ) -> Result<ClassificationResult, ClassifierError> {
            self.calls.set(self.calls.get() + 1);
            match &self.scores {
                Ok(scores) => ClassificationResult::from_scores(scores.clone()),
                Err(()) => Err(ClassifierError::Model("boom".into())),
            }
        }
    }

    fn drawing() -> Preprocessed {
        let mut buffer = PixelBuffer::new(64, 64).unwrap();
        buffer.stamp(30.0, 30.0).unwrap();
        Preprocessor::new(4, 28).prepare(&buffer)
    }

    fn scores_for(class: usize) -> Vec<f32> {
        let mut scores = vec![0.0; 10];
        scores[class] = 5.0;
        scores
    }

    #[tokio::test]
    async fn test_model_prediction() {
        let dispatcher = ClassificationDispatcher::new();
        let backend = FakeBackend::with_scores(scores_for(7));

        let prediction = dispatcher.classify(&backend, &drawing()).await.unwrap();
        assert_eq!(prediction.source, PredictionSource::Model);
        assert_eq!(prediction.result.class_index(), 7);
        assert_eq!(prediction.ticket.sequence(), 1);
        assert!(dispatcher.apply(&prediction));
        assert_eq!(dispatcher.last_applied(), 1);

        let update = prediction.to_update(&CanvasConfig::default());
        assert_eq!(update.label, "7");
        assert_eq!(update.scores.len(), 10);
    }

    #[tokio::test]
    async fn test_empty_drawing_skips_model() {
        let dispatcher = ClassificationDispatcher::new();
        let backend = FakeBackend::with_scores(scores_for(3));

        let prediction = dispatcher
            .classify(&backend, &Preprocessed::Empty)
            .await
            .unwrap();
        assert_eq!(prediction.source, PredictionSource::EmptyDrawing);
        assert_eq!(prediction.result, ClassificationResult::fallback(10));
        assert_eq!(backend.calls.get(), 0);
    }

    #[tokio::test]
    async fn test_model_failure_falls_back() {
        let dispatcher = ClassificationDispatcher::new();
        let prediction = dispatcher
            .classify(&FakeBackend::failing(), &drawing())
            .await
            .unwrap();
        assert_eq!(prediction.source, PredictionSource::Fallback);
        assert_eq!(prediction.result.class_index(), 0);
        assert!(prediction.result.scores().iter().all(|&s| s == 0.0));
    }

    #[tokio::test]
    async fn test_wrong_score_count_falls_back() {
        let dispatcher = ClassificationDispatcher::new();
        let backend = FakeBackend::with_scores(vec![1.0, 2.0]);
        let prediction = dispatcher.classify(&backend, &drawing()).await.unwrap();
        assert_eq!(prediction.source, PredictionSource::Fallback);
        assert_eq!(prediction.result.class_count(), 10);
    }

    #[tokio::test]
    async fn test_not_ready_is_skipped() {
        let dispatcher = ClassificationDispatcher::new();
        let mut backend = FakeBackend::with_scores(scores_for(1));
        backend.ready = false;

        assert!(dispatcher.classify(&backend, &drawing()).await.is_none());
        assert_eq!(dispatcher.latest(), 0);
        assert_eq!(backend.calls.get(), 0);

        let unloaded: Option<FakeBackend> = None;
        assert!(dispatcher.classify(&unloaded, &drawing()).await.is_none());
    }

    #[tokio::test]
    async fn test_loaded_option_backend() {
        let dispatcher = ClassificationDispatcher::new();
        let loaded = Some(FakeBackend::with_scores(scores_for(4)));
        let prediction = dispatcher.classify(&loaded, &drawing()).await.unwrap();
        assert_eq!(prediction.result.class_index(), 4);
    }

    #[tokio::test]
    async fn test_stale_prediction_discarded() {
        let dispatcher = ClassificationDispatcher::new();
        let first_backend = FakeBackend::with_scores(scores_for(2));
        let second_backend = FakeBackend::with_scores(scores_for(8));

        let first = dispatcher
            .classify(&first_backend, &drawing())
            .await
            .unwrap();
        let second = dispatcher
            .classify(&second_backend, &drawing())
            .await
            .unwrap();

        // Second request finishes first, then the slow first one arrives
        assert!(dispatcher.apply(&second));
        assert!(!dispatcher.apply(&first));
        assert_eq!(dispatcher.last_applied(), second.ticket.sequence());
    }

    #[test]
    fn test_tickets_increase_across_clones() {
        let dispatcher = ClassificationDispatcher::new();
        let clone = dispatcher.clone();
        let a = dispatcher.issue();
        let b = clone.issue();
        assert!(b > a);
        assert!(!dispatcher.is_current(a));
        assert!(dispatcher.is_current(b));
    }
}
