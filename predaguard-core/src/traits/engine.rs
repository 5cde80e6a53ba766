//! Inference engine trait
//!
//! The engine (model loading, operator execution, arena management) is an
//! opaque collaborator. The pipeline only needs raw access to the input and
//! output tensor bytes, their quantization parameters and an invoke call.

/// Errors that make the engine unusable (fatal at startup)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitError {
    /// Model could not be loaded
    LoadFailed,
    /// Model schema version does not match the runtime
    SchemaMismatch,
    /// Tensor arena allocation failed
    AllocationFailed,
    /// Input or output tensor missing (null pointer)
    MissingTensor,
    /// Input tensor element type is neither int8 nor float32
    UnsupportedInputType,
    /// Output tensor element type is neither int8 nor float32
    UnsupportedOutputType,
    /// Input tensor smaller than the feature vector
    InputTooSmall { expected: usize, actual: usize },
    /// Output tensor smaller than the class vector
    OutputTooSmall { expected: usize, actual: usize },
    /// Quantization parameters cannot represent the tensor
    InvalidQuantization,
    /// Engine-specific failure code
    Engine(i32),
}

/// Errors from a single inference run (recoverable)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InvokeError {
    /// Engine was never initialized
    NotInitialized,
    /// Engine reported a failure code
    Failed(i32),
}

/// Tensor element type as reported by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ElementType {
    Int8,
    Float32,
    /// Any other engine type code
    Other(u8),
}

impl ElementType {
    /// Size of one element in bytes, if supported
    pub const fn size(&self) -> Option<usize> {
        match self {
            ElementType::Int8 => Some(1),
            ElementType::Float32 => Some(4),
            ElementType::Other(_) => None,
        }
    }
}

/// Affine quantization parameters of one tensor
///
/// `scale == 0.0` is the engine's marker for a native float32 tensor.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QuantParams {
    pub scale: f32,
    pub zero_point: i32,
}

impl QuantParams {
    /// Parameters reported for float32 tensors
    pub const NONE: Self = Self {
        scale: 0.0,
        zero_point: 0,
    };

    pub const fn new(scale: f32, zero_point: i32) -> Self {
        Self { scale, zero_point }
    }

    /// Whether these parameters mark an unquantized float32 tensor
    pub fn is_native_float(&self) -> bool {
        self.scale == 0.0
    }
}

/// Shape-independent description of a tensor
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TensorInfo {
    pub element_type: ElementType,
    pub byte_len: usize,
    pub quant: QuantParams,
}

/// Opaque classifier
///
/// Call order: [`init`](Self::init) once, then any number of
/// write-input / [`invoke`](Self::invoke) / read-output cycles.
pub trait InferenceEngine {
    /// Load the model and allocate tensors
    fn init(&mut self) -> Result<(), InitError>;

    /// Input tensor description, `None` if the tensor does not exist
    fn input_tensor(&self) -> Option<TensorInfo>;

    /// Output tensor description, `None` if the tensor does not exist
    fn output_tensor(&self) -> Option<TensorInfo>;

    /// Raw input tensor bytes (empty before a successful init)
    fn input_buffer(&mut self) -> &mut [u8];

    /// Raw output tensor bytes (empty before a successful init)
    fn output_buffer(&self) -> &[u8];

    /// Run the model on the current input tensor
    fn invoke(&mut self) -> Result<(), InvokeError>;

    /// Arena bytes in use, if the engine reports it
    fn arena_used_bytes(&self) -> Option<usize> {
        None
    }
}
