//! Stub inference engine
//!
//! Float32 tensors and a distance-from-baseline heuristic instead of a
//! model. The z-scored features are near zero in the training baseline;
//! the further they drift, the higher the class.

use defmt::*;

use predaguard_core::traits::{
    ElementType, InferenceEngine, InitError, InvokeError, QuantParams, TensorInfo,
};
use predaguard_core::{FEATURE_COUNT, NUM_CLASSES};

const INPUT_LEN: usize = FEATURE_COUNT * 4;
const OUTPUT_LEN: usize = NUM_CLASSES * 4;

pub struct StubEngine {
    input: [u8; INPUT_LEN],
    output: [u8; OUTPUT_LEN],
    initialized: bool,
}

impl StubEngine {
    pub const fn new() -> Self {
        Self {
            input: [0; INPUT_LEN],
            output: [0; OUTPUT_LEN],
            initialized: false,
        }
    }

    fn tensor(&self, byte_len: usize) -> Option<TensorInfo> {
        self.initialized.then_some(TensorInfo {
            element_type: ElementType::Float32,
            byte_len,
            quant: QuantParams::NONE,
        })
    }
}

impl InferenceEngine for StubEngine {
    fn init(&mut self) -> Result<(), InitError> {
        warn!("Using stub inference engine (build with --features tflm for the model)");
        self.initialized = true;
        Ok(())
    }

    fn input_tensor(&self) -> Option<TensorInfo> {
        self.tensor(INPUT_LEN)
    }

    fn output_tensor(&self) -> Option<TensorInfo> {
        self.tensor(OUTPUT_LEN)
    }

    fn input_buffer(&mut self) -> &mut [u8] {
        if self.initialized {
            &mut self.input
        } else {
            &mut []
        }
    }

    fn output_buffer(&self) -> &[u8] {
        if self.initialized {
            &self.output
        } else {
            &[]
        }
    }

    fn invoke(&mut self) -> Result<(), InvokeError> {
        if !self.initialized {
            return Err(InvokeError::NotInitialized);
        }

        let mut drift: f32 = 0.0;
        for chunk in self.input.chunks_exact(4) {
            let value = f32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            // NaN compares false and leaves the drift unchanged
            if value.abs() > drift {
                drift = value.abs();
            }
        }

        let scores: [f32; NUM_CLASSES] = if drift < 1.0 {
            [0.85, 0.10, 0.05]
        } else if drift < 2.5 {
            [0.10, 0.80, 0.10]
        } else {
            [0.05, 0.15, 0.80]
        };
        trace!("Stub inference: drift = {}, scores = {}", drift, scores);

        for (chunk, score) in self.output.chunks_exact_mut(4).zip(scores) {
            chunk.copy_from_slice(&score.to_ne_bytes());
        }
        Ok(())
    }
}
