use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("Row {row}: cannot parse '{value}' in column '{column}' as a currency amount: {reason}")]
    MalformedCurrency {
        column: String,
        row: usize,
        value: String,
        reason: String,
    },

    #[error("Row {row}: cannot parse '{value}' in column '{column}' as an integer: {reason}")]
    MalformedInteger {
        column: String,
        row: usize,
        value: String,
        reason: String,
    },

    #[error("Row {row}: cannot parse '{value}' in column '{column}' as a float: {reason}")]
    MalformedFloat {
        column: String,
        row: usize,
        value: String,
        reason: String,
    },

    #[error("Row {row}: cannot parse '{value}' in column '{column}' as a date/time: {reason}")]
    MalformedDate {
        column: String,
        row: usize,
        value: String,
        reason: String,
    },

    #[error("Missing required field: {column}")]
    MissingField { column: String },

    #[error("Row {row}: column '{column}' does not hold a {expected} value")]
    UnexpectedType {
        column: String,
        row: usize,
        expected: &'static str,
    },

    #[error("Cannot {stage} on an empty dataset")]
    EmptyDataset { stage: &'static str },

    #[error("Unsupported JSON layout: {0}")]
    UnsupportedLayout(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
