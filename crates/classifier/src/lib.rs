//! Sketch classification for Scribble
//!
//! The model is an external collaborator behind [`ClassifierBackend`]. The
//! [`ClassificationDispatcher`] numbers every request so that only the newest
//! result reaches the display, and substitutes a fixed fallback result for
//! empty drawings and model failures.

mod dispatch;
mod result;

#[cfg(feature = "local")]
mod local;

pub use dispatch::{ClassificationDispatcher, Prediction, Ticket};
pub use result::ClassificationResult;

#[cfg(feature = "local")]
pub use local::{CnnClassifier, CnnConfig};

use std::rc::Rc;

use painting::SquareImage;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Model not loaded")]
    NotReady,

    #[error("Model failed: {0}")]
    Model(String),

    #[error("Input is {found}x{found}, model expects {expected}x{expected}")]
    InvalidInput { expected: u32, found: u32 },

    #[error("Model produced {found} scores, expected {expected}")]
    ShapeMismatch { expected: usize, found: usize },

    #[error("Model produced no scores")]
    EmptyOutput,
}

/// Trait for classifier backends
#[allow(async_fn_in_trait)]
pub trait ClassifierBackend {
    /// Whether the model is loaded and can be called
    fn is_ready(&self) -> bool;

    /// Number of classes scored by the model
    fn class_count(&self) -> usize;

    /// Score a preprocessed square image
    async fn classify(&self, image: &SquareImage) -> Result<ClassificationResult, ClassifierError>;
}

/// A shared backend, e.g. one moved into a spawned browser task
impl<B: ClassifierBackend> ClassifierBackend for Rc<B> {
    fn is_ready(&self) -> bool {
        self.as_ref().is_ready()
    }

    fn class_count(&self) -> usize {
        self.as_ref().class_count()
    }

    async fn classify(&self, image: &SquareImage) -> Result<ClassificationResult, ClassifierError> {
        self.as_ref().classify(image).await
    }
}

/// A backend that may not have been loaded yet
impl<B: ClassifierBackend> ClassifierBackend for Option<B> {
    fn is_ready(&self) -> bool {
        self.as_ref().is_some_and(|backend| backend.is_ready())
    }

    fn class_count(&self) -> usize {
        self.as_ref().map_or(0, |backend| backend.class_count())
    }

    async fn classify(&self, image: &SquareImage) -> Result<ClassificationResult, ClassifierError> {
        match self {
            Some(backend) => backend.classify(image).await,
            None => Err(ClassifierError::NotReady),
        }
    }
}
