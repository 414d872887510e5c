use thiserror::Error;

/// Errors raised synchronously by process calls.
///
/// The named contract errors carry the exact messages published by the
/// openEO process catalogue so callers can match on the text as well.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProcessError {
    #[error("Process '{0}' does not exist.")]
    ProcessNotFound(String),

    #[error("Datatype unknown: {0}")]
    UnknownDatatype(String),

    #[error("Process '{process}' has no implementation for {category} data.")]
    Unsupported { process: String, category: String },

    #[error("Process '{process}' requires the parameter '{parameter}'.")]
    MissingParameter { process: String, parameter: String },

    #[error("Process '{process}' has no parameter '{parameter}'.")]
    UnknownParameter { process: String, parameter: String },

    #[error("Process '{process}' takes at most {expected} positional arguments but {given} were given.")]
    TooManyArguments {
        process: String,
        expected: usize,
        given: usize,
    },

    #[error("Process '{process}' got multiple values for parameter '{parameter}'.")]
    DuplicateArgument { process: String, parameter: String },

    #[error("Invalid value for '{parameter}': {message}")]
    InvalidArgument { parameter: String, message: String },

    #[error("The process 'quantiles' requires either the 'probabilities' or 'q' parameter to be set.")]
    QuantilesParameterMissing,

    #[error("The process 'quantiles' only allows that either the 'probabilities' or the 'q' parameter is set.")]
    QuantilesParameterConflict,

    #[error("The process 'array_element' requires either the 'index' or 'labels' parameter to be set.")]
    ArrayElementParameterMissing,

    #[error("The process 'array_element' only allows that either the 'index' or the 'labels' parameter is set.")]
    ArrayElementParameterConflict,

    #[error("The array has no element with the specified index or label.")]
    ArrayElementNotAvailable,

    #[error("Addition requires at least two numbers.")]
    SummandMissing,

    #[error("Subtraction requires at least two numbers (a minuend and one or more subtrahends).")]
    SubtrahendMissing,

    #[error("Multiplication requires at least two numbers.")]
    MultiplicandMissing,

    #[error("Division requires at least two numbers (a dividend and one or more divisors).")]
    DivisorMissing,

    #[error("Index {index} is out of bounds for an axis of length {len}.")]
    IndexOutOfBounds { index: i64, len: usize },

    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Invalid temporal value: {0}")]
    Temporal(String),
}

impl ProcessError {
    pub fn invalid(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        ProcessError::InvalidArgument {
            parameter: parameter.into(),
            message: message.into(),
        }
    }
}
