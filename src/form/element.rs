use serde_json::Value;

use super::SubmitError;

/// A single input or display unit of a custom form.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Toggle {
        text: String,
        default: bool,
    },
    Input {
        text: String,
        default: String,
        placeholder: String,
    },
    Label {
        text: String,
    },
    Slider {
        text: String,
        min: f64,
        max: f64,
        step: f64,
        default: f64,
    },
    Dropdown {
        text: String,
        options: Vec<String>,
        default_index: usize,
    },
    StepSlider {
        text: String,
        options: Vec<String>,
        default_index: usize,
    },
}

/// The value the client submitted for one element, in element order.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementValue {
    Toggle(bool),
    Input(String),
    Label,
    Slider(f64),
    Dropdown(usize),
    StepSlider(usize),
}

impl Element {
    pub fn toggle(text: impl Into<String>, default: bool) -> Self {
        Self::Toggle {
            text: text.into(),
            default,
        }
    }

    pub fn input(
        text: impl Into<String>,
        default: impl Into<String>,
        placeholder: impl Into<String>,
    ) -> Self {
        Self::Input {
            text: text.into(),
            default: default.into(),
            placeholder: placeholder.into(),
        }
    }

    pub fn label(text: impl Into<String>) -> Self {
        Self::Label { text: text.into() }
    }

    pub fn slider(text: impl Into<String>, min: f64, max: f64, step: f64, default: f64) -> Self {
        Self::Slider {
            text: text.into(),
            min,
            max,
            step,
            default,
        }
    }

    pub fn dropdown<I, S>(text: impl Into<String>, options: I, default_index: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Dropdown {
            text: text.into(),
            options: options.into_iter().map(Into::into).collect(),
            default_index,
        }
    }

    pub fn step_slider<I, S>(text: impl Into<String>, options: I, default_index: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::StepSlider {
            text: text.into(),
            options: options.into_iter().map(Into::into).collect(),
            default_index,
        }
    }

    /// Interprets the value the client sent for this element at position `index`.
    pub(crate) fn parse_value(&self, index: usize, value: Value) -> Result<ElementValue, SubmitError> {
        let unexpected = |expected: &'static str| SubmitError::UnexpectedValue { index, expected };

        match self {
            Self::Toggle { .. } => value
                .as_bool()
                .map(ElementValue::Toggle)
                .ok_or_else(|| unexpected("boolean")),
            Self::Input { .. } => match value {
                Value::String(s) => Ok(ElementValue::Input(s)),
                _ => Err(unexpected("string")),
            },
            // Labels carry no input; clients send null for them.
            Self::Label { .. } => Ok(ElementValue::Label),
            Self::Slider { min, max, .. } => {
                let value = value.as_f64().ok_or_else(|| unexpected("number"))?;
                if value < *min || value > *max {
                    return Err(SubmitError::SliderOutOfRange {
                        index,
                        value,
                        min: *min,
                        max: *max,
                    });
                }
                Ok(ElementValue::Slider(value))
            }
            Self::Dropdown { options, .. } => {
                select(&value, options.len(), unexpected).map(ElementValue::Dropdown)
            }
            Self::StepSlider { options, .. } => {
                select(&value, options.len(), unexpected).map(ElementValue::StepSlider)
            }
        }
    }
}

fn select(
    value: &Value,
    len: usize,
    unexpected: impl Fn(&'static str) -> SubmitError,
) -> Result<usize, SubmitError> {
    let selected = value.as_u64().ok_or_else(|| unexpected("index"))?;
    checked_index(selected, len)
}

/// Validates an index chosen by the client against the number of choices offered.
pub(crate) fn checked_index(selected: u64, len: usize) -> Result<usize, SubmitError> {
    usize::try_from(selected)
        .ok()
        .filter(|index| *index < len)
        .ok_or(SubmitError::SelectionOutOfRange { selected, len })
}
