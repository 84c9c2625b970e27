//! Browser-independent canvas controller
//!
//! Translates input and UI messages into drawing surface transitions. Nothing
//! here touches the DOM, so the whole interaction model is testable natively.

use painting::{
    CoordinateMapper, DrawingSurface, Preprocessed, Preprocessor, SurfaceResponse, ValidationError,
};
use scribble_classifier::ClassificationDispatcher;
use scribble_config::CanvasConfig;
use scribble_ipc::{CanvasToUi, KeyboardEvent, PointerEvent, PointerPhase, UiToCanvas};
use tracing::{debug, warn};

pub struct CanvasApp {
    config: CanvasConfig,
    surface: DrawingSurface,
    preprocessor: Preprocessor,
    dispatcher: ClassificationDispatcher,
}

impl CanvasApp {
    pub fn new(config: CanvasConfig) -> Result<Self, ValidationError> {
        let surface = DrawingSurface::from_config(&config)?;
        Ok(Self {
            preprocessor: Preprocessor::from_config(&config),
            surface,
            config,
            dispatcher: ClassificationDispatcher::new(),
        })
    }

    /// Build from `config`, falling back to the defaults if its grid is unusable
    pub fn with_fallback(config: CanvasConfig) -> Result<Self, ValidationError> {
        Self::new(config).or_else(|e| {
            warn!("Unusable canvas config ({}), using defaults", e);
            Self::new(CanvasConfig::default())
        })
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn surface(&self) -> &DrawingSurface {
        &self.surface
    }

    pub fn dispatcher(&self) -> &ClassificationDispatcher {
        &self.dispatcher
    }

    /// Apply a pointer event given the current display geometry
    pub fn pointer(&mut self, event: &PointerEvent, mapper: &CoordinateMapper) -> SurfaceResponse {
        let point = event.position.and_then(|[x, y]| mapper.map(x, y));
        match event.phase {
            PointerPhase::Down => self.surface.pointer_down(point),
            PointerPhase::Move => self.surface.pointer_move(point),
            PointerPhase::Up => self.surface.pointer_up(),
            PointerPhase::Leave => self.surface.pointer_leave(),
        }
    }

    /// Handle a key press; None if the key is not bound
    pub fn key(&mut self, event: &KeyboardEvent) -> Option<SurfaceResponse> {
        if !event.is_undo_chord() {
            return None;
        }
        debug!("Undo shortcut");
        Some(self.surface.undo())
    }

    pub fn command(&mut self, msg: &UiToCanvas) -> SurfaceResponse {
        match msg {
            UiToCanvas::Undo => self.surface.undo(),
            UiToCanvas::Clear => self.surface.clear(),
        }
    }

    /// Crop/pad/resize the current drawing for the classifier
    pub fn classifier_input(&self) -> Preprocessed {
        self.preprocessor.prepare(self.surface.buffer())
    }

    pub fn history_message(&self) -> CanvasToUi {
        CanvasToUi::HistoryChanged {
            undo_levels: self.surface.undo_count(),
        }
    }
}
