//! Affine quantization and tensor binding
//!
//! The engine reports each tensor's element type and quantization
//! parameters once after init. [`TensorBinding::bind`] turns that into a
//! tagged choice per tensor, so the per-cycle code never reinterprets raw
//! bytes without knowing what they hold:
//!
//! - Int8 input: `q = clamp(round(x / scale) + zero_point, -128, 127)`
//! - Float32 input: features written as-is
//! - Int8 output: `score = (q - zero_point) * scale`
//! - Float32 output: scores read as-is

use micromath::F32Ext;

use crate::traits::{ElementType, InferenceEngine, InitError, QuantParams, TensorInfo};
use crate::{FEATURE_COUNT, NUM_CLASSES};

/// Quantize one value to int8
///
/// Out-of-range values saturate to `[-128, 127]`. NaN maps to the zero point.
/// `params.scale` must be positive and `params.zero_point` within the int8
/// range; binding enforces both.
pub fn quantize(value: f32, params: QuantParams) -> i8 {
    let scaled = value / params.scale;
    if scaled.is_nan() {
        return params.zero_point.clamp(i8::MIN as i32, i8::MAX as i32) as i8;
    }

    // Clamp before the integer conversion so +-inf and huge values saturate.
    // Fully qualified so host builds with std round the same way as the target.
    let limit = 512.0;
    let rounded = F32Ext::round(scaled.clamp(-limit, limit)) as i32;
    rounded
        .saturating_add(params.zero_point)
        .clamp(i8::MIN as i32, i8::MAX as i32) as i8
}

/// Map an int8 value back to a real value
pub fn dequantize(raw: i8, params: QuantParams) -> f32 {
    (raw as i32 - params.zero_point) as f32 * params.scale
}

/// How features are written into the input tensor
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputBinding {
    Int8(QuantParams),
    Float32,
}

/// How scores are read from the output tensor
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputBinding {
    Int8(QuantParams),
    Float32,
}

/// Validated input/output layout of an engine
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TensorBinding {
    pub input: InputBinding,
    pub output: OutputBinding,
}

fn required_len(info: &TensorInfo, count: usize) -> Option<usize> {
    info.element_type.size().map(|size| size * count)
}

fn zero_point_in_range(params: &QuantParams) -> bool {
    (i8::MIN as i32..=i8::MAX as i32).contains(&params.zero_point)
}

impl TensorBinding {
    /// Inspect an initialized engine and choose the tensor bindings
    ///
    /// Every error returned here is fatal.
    pub fn bind<E: InferenceEngine + ?Sized>(engine: &E) -> Result<Self, InitError> {
        let input = engine.input_tensor().ok_or(InitError::MissingTensor)?;
        let output = engine.output_tensor().ok_or(InitError::MissingTensor)?;

        let expected = required_len(&input, FEATURE_COUNT).ok_or(InitError::UnsupportedInputType)?;
        if input.byte_len < expected {
            return Err(InitError::InputTooSmall {
                expected,
                actual: input.byte_len,
            });
        }

        let expected = required_len(&output, NUM_CLASSES).ok_or(InitError::UnsupportedOutputType)?;
        if output.byte_len < expected {
            return Err(InitError::OutputTooSmall {
                expected,
                actual: output.byte_len,
            });
        }

        let input = match input.element_type {
            ElementType::Float32 => InputBinding::Float32,
            ElementType::Int8
                if input.quant.scale > 0.0
                    && input.quant.scale.is_finite()
                    && zero_point_in_range(&input.quant) =>
            {
                InputBinding::Int8(input.quant)
            }
            ElementType::Int8 => return Err(InitError::InvalidQuantization),
            ElementType::Other(_) => return Err(InitError::UnsupportedInputType),
        };

        let output = match output.element_type {
            ElementType::Float32 => OutputBinding::Float32,
            ElementType::Int8
                if output.quant.is_native_float() || !zero_point_in_range(&output.quant) =>
            {
                return Err(InitError::InvalidQuantization)
            }
            ElementType::Int8 => OutputBinding::Int8(output.quant),
            ElementType::Other(_) => return Err(InitError::UnsupportedOutputType),
        };

        Ok(Self { input, output })
    }

    /// Write the feature vector into the raw input tensor
    pub fn write_features(&self, features: &[f32; FEATURE_COUNT], buffer: &mut [u8]) {
        match self.input {
            InputBinding::Int8(params) => {
                for (slot, &value) in buffer.iter_mut().zip(features.iter()) {
                    *slot = quantize(value, params) as u8;
                }
            }
            InputBinding::Float32 => {
                for (slot, &value) in buffer.chunks_exact_mut(4).zip(features.iter()) {
                    slot.copy_from_slice(&value.to_ne_bytes());
                }
            }
        }
    }

    /// Read per-class scores from the raw output tensor
    ///
    /// No renormalization: scores need not sum to one.
    pub fn read_scores(&self, buffer: &[u8]) -> [f32; NUM_CLASSES] {
        let mut scores = [0.0; NUM_CLASSES];
        match self.output {
            OutputBinding::Int8(params) => {
                for (score, &raw) in scores.iter_mut().zip(buffer.iter()) {
                    *score = dequantize(raw as i8, params);
                }
            }
            OutputBinding::Float32 => {
                for (score, chunk) in scores.iter_mut().zip(buffer.chunks_exact(4)) {
                    *score = f32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
                }
            }
        }
        scores
    }
}
