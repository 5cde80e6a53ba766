//! TensorFlow Lite Micro binding
//!
//! Talks to the C wrapper (`tflm_wrapper.cpp`) linked as a static library.
//! The wrapper owns the model, op resolver and tensor arena; this side only
//! sees raw tensor pointers.
//!
//! The wrapper only accepts int8 and float32 tensors, and a float32 tensor
//! reports `scale == 0`, so the element type follows from the scale.

use core::ptr;

use predaguard_core::traits::{
    ElementType, InferenceEngine, InitError, InvokeError, QuantParams, TensorInfo,
};

extern "C" {
    fn tflm_init() -> i32;
    fn tflm_input_ptr(nbytes: *mut i32) -> *mut i8;
    fn tflm_output_ptr(nbytes: *mut i32) -> *mut i8;
    fn tflm_input_scale() -> f32;
    fn tflm_input_zero_point() -> i32;
    fn tflm_output_scale() -> f32;
    fn tflm_output_zero_point() -> i32;
    fn tflm_invoke() -> i32;
    fn tflm_arena_used_bytes() -> i32;
}

/// Raw view of one wrapper tensor
#[derive(Clone, Copy)]
struct RawTensor {
    data: *mut u8,
    len: usize,
    quant: QuantParams,
}

impl RawTensor {
    const EMPTY: Self = Self {
        data: ptr::null_mut(),
        len: 0,
        quant: QuantParams::NONE,
    };

    fn info(&self) -> Option<TensorInfo> {
        if self.data.is_null() {
            return None;
        }
        let element_type = if self.quant.is_native_float() {
            ElementType::Float32
        } else {
            ElementType::Int8
        };
        Some(TensorInfo {
            element_type,
            byte_len: self.len,
            quant: self.quant,
        })
    }
}

fn init_error(code: i32) -> InitError {
    match code {
        1 => InitError::LoadFailed,
        2 => InitError::SchemaMismatch,
        3 => InitError::AllocationFailed,
        4 => InitError::MissingTensor,
        5 => InitError::UnsupportedInputType,
        6 => InitError::UnsupportedOutputType,
        other => InitError::Engine(other),
    }
}

/// The linked TFLM interpreter
///
/// Only one may exist: the wrapper keeps a single static interpreter.
pub struct TflmEngine {
    input: RawTensor,
    output: RawTensor,
}

impl TflmEngine {
    pub const fn new() -> Self {
        Self {
            input: RawTensor::EMPTY,
            output: RawTensor::EMPTY,
        }
    }
}

impl InferenceEngine for TflmEngine {
    fn init(&mut self) -> Result<(), InitError> {
        let code = unsafe { tflm_init() };
        if code != 0 {
            return Err(init_error(code));
        }

        let mut input_len: i32 = 0;
        let mut output_len: i32 = 0;
        // SAFETY: init succeeded, so the wrapper's tensor pointers are set and
        // stay valid for the lifetime of the static interpreter
        unsafe {
            self.input = RawTensor {
                data: tflm_input_ptr(&mut input_len) as *mut u8,
                len: input_len.max(0) as usize,
                quant: QuantParams::new(tflm_input_scale(), tflm_input_zero_point()),
            };
            self.output = RawTensor {
                data: tflm_output_ptr(&mut output_len) as *mut u8,
                len: output_len.max(0) as usize,
                quant: QuantParams::new(tflm_output_scale(), tflm_output_zero_point()),
            };
        }

        if self.input.data.is_null() || self.output.data.is_null() {
            return Err(InitError::MissingTensor);
        }
        Ok(())
    }

    fn input_tensor(&self) -> Option<TensorInfo> {
        self.input.info()
    }

    fn output_tensor(&self) -> Option<TensorInfo> {
        self.output.info()
    }

    fn input_buffer(&mut self) -> &mut [u8] {
        if self.input.data.is_null() {
            return &mut [];
        }
        // SAFETY: non-null pointer from the wrapper, `len` bytes long, and
        // only this engine writes to it
        unsafe { core::slice::from_raw_parts_mut(self.input.data, self.input.len) }
    }

    fn output_buffer(&self) -> &[u8] {
        if self.output.data.is_null() {
            return &[];
        }
        // SAFETY: as above; the interpreter only writes during invoke
        unsafe { core::slice::from_raw_parts(self.output.data, self.output.len) }
    }

    fn invoke(&mut self) -> Result<(), InvokeError> {
        match unsafe { tflm_invoke() } {
            0 => Ok(()),
            1 => Err(InvokeError::NotInitialized),
            code => Err(InvokeError::Failed(code)),
        }
    }

    fn arena_used_bytes(&self) -> Option<usize> {
        let used = unsafe { tflm_arena_used_bytes() };
        usize::try_from(used).ok()
    }
}
