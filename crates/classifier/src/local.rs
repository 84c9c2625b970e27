//! Local CPU inference via candle
//!
//! A small two-block convolutional network over single-channel square input:
//! conv -> relu -> maxpool, twice, then two dense layers producing raw logits.
//! Weights are read from a safetensors buffer with the tensor names
//! `conv1.*`, `conv2.*`, `fc1.*` and `fc2.*`.

use candle_core::{DType, Device, Module, Tensor};
use candle_nn::{Conv2d, Conv2dConfig, Linear, VarBuilder, conv2d, linear};
use painting::SquareImage;
use scribble_config::CanvasConfig;
use tracing::{debug, info};

use crate::{ClassificationResult, ClassifierBackend, ClassifierError};

/// Layer sizes of the network
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CnnConfig {
    pub input_size: usize,
    pub class_count: usize,
    pub conv1_channels: usize,
    pub conv2_channels: usize,
    pub kernel_size: usize,
    pub hidden: usize,
}

impl Default for CnnConfig {
    fn default() -> Self {
        Self {
            input_size: 28,
            class_count: 10,
            conv1_channels: 32,
            conv2_channels: 64,
            kernel_size: 3,
            hidden: 128,
        }
    }
}

impl From<&CanvasConfig> for CnnConfig {
    fn from(config: &CanvasConfig) -> Self {
        Self {
            input_size: config.input_size as usize,
            class_count: config.class_count(),
            ..Self::default()
        }
    }
}

impl CnnConfig {
    /// Side length after both conv/pool blocks
    fn feature_size(&self) -> Option<usize> {
        let after_block = |size: usize| size.checked_sub(self.kernel_size - 1).map(|s| s / 2);
        after_block(self.input_size)
            .and_then(after_block)
            .filter(|&size| size > 0)
    }

    fn flattened_len(&self) -> Option<usize> {
        self.feature_size()
            .map(|size| size * size * self.conv2_channels)
    }
}

pub struct CnnClassifier {
    conv1: Conv2d,
    conv2: Conv2d,
    fc1: Linear,
    fc2: Linear,
    config: CnnConfig,
    device: Device,
}

impl CnnClassifier {
    /// Load weights from an in-memory safetensors file
    pub fn from_safetensors(bytes: Vec<u8>, config: CnnConfig) -> Result<Self, ClassifierError> {
        let device = Device::Cpu;
        let vb = VarBuilder::from_buffered_safetensors(bytes, DType::F32, &device)
            .map_err(|e| ClassifierError::Model(format!("Failed to read weights: {}", e)))?;
        let model = Self::load(vb, config)?;
        info!(
            "Loaded CNN classifier: {}x{} input, {} classes",
            config.input_size, config.input_size, config.class_count
        );
        Ok(model)
    }

    /// Build the network from a variable builder
    pub fn load(vb: VarBuilder, config: CnnConfig) -> Result<Self, ClassifierError> {
        if config.kernel_size == 0 || config.class_count == 0 {
            return Err(ClassifierError::Model(format!(
                "Invalid network config: {:?}",
                config
            )));
        }
        let flattened = config.flattened_len().ok_or_else(|| {
            ClassifierError::Model(format!(
                "Input size {} too small for kernel {}",
                config.input_size, config.kernel_size
            ))
        })?;

        let conv_cfg = Conv2dConfig::default();
        let build = || -> candle_core::Result<Self> {
            Ok(Self {
                conv1: conv2d(1, config.conv1_channels, config.kernel_size, conv_cfg, vb.pp("conv1"))?,
                conv2: conv2d(
                    config.conv1_channels,
                    config.conv2_channels,
                    config.kernel_size,
                    conv_cfg,
                    vb.pp("conv2"),
                )?,
                fc1: linear(flattened, config.hidden, vb.pp("fc1"))?,
                fc2: linear(config.hidden, config.class_count, vb.pp("fc2"))?,
                config,
                device: vb.device().clone(),
            })
        };
        build().map_err(|e| ClassifierError::Model(format!("Failed to build network: {}", e)))
    }

    pub fn config(&self) -> &CnnConfig {
        &self.config
    }

    fn forward(&self, xs: &Tensor) -> candle_core::Result<Tensor> {
        let xs = self.conv1.forward(xs)?.relu()?.max_pool2d(2)?;
        let xs = self.conv2.forward(&xs)?.relu()?.max_pool2d(2)?;
        let xs = xs.flatten_from(1)?;
        let xs = self.fc1.forward(&xs)?.relu()?;
        self.fc2.forward(&xs)
    }

    /// Raw logits for one image
    pub fn logits(&self, image: &SquareImage) -> Result<Vec<f32>, ClassifierError> {
        let size = image.size() as usize;
        if size != self.config.input_size {
            return Err(ClassifierError::InvalidInput {
                expected: self.config.input_size as u32,
                found: image.size(),
            });
        }

        let run = || -> candle_core::Result<Vec<f32>> {
            let input = Tensor::from_slice(image.as_slice(), (1, 1, size, size), &self.device)?;
            self.forward(&input)?.squeeze(0)?.to_vec1::<f32>()
        };
        let logits = run().map_err(|e| ClassifierError::Model(e.to_string()))?;
        debug!("Logits: {:?}", logits);
        Ok(logits)
    }
}

impl ClassifierBackend for CnnClassifier {
    fn is_ready(&self) -> bool {
        true
    }

    fn class_count(&self) -> usize {
        self.config.class_count
    }

    async fn classify(&self, image: &SquareImage) -> Result<ClassificationResult, ClassifierError> {
        ClassificationResult::from_scores(self.logits(image)?)
    }
}
