/// Errors raised while decoding a client response and handing it to a form's handler.
#[derive(thiserror::Error, Debug)]
pub enum SubmitError {
    #[error("Malformed response data: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Expected {expected} element values, got {actual}")]
    ElementCount { expected: usize, actual: usize },

    #[error("Element {index} expected a {expected} value")]
    UnexpectedValue { index: usize, expected: &'static str },

    #[error("Slider value {value} of element {index} is outside [{min}, {max}]")]
    SliderOutOfRange {
        index: usize,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Selection {selected} is out of range for {len} choices")]
    SelectionOutOfRange { selected: u64, len: usize },

    #[error("Submit handler failed: {0}")]
    Handler(color_eyre::Report),
}
