use thiserror::Error;

/// Value errors raised while parsing selectors, style strings and option flags.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LineplotError {
    #[error("Column '{0}' not found")]
    UnknownColumn(String),

    #[error("Column position {position} out of range (table has {width} columns)")]
    ColumnOutOfRange { position: usize, width: usize },

    #[error("Invalid column selector '{0}'")]
    InvalidSelector(String),

    #[error("Range '{0}' is not of the form start:end")]
    InvalidRange(String),

    #[error("Invalid range bound '{bound}' in '{range}'")]
    InvalidRangeBound { range: String, bound: String },

    #[error("Style segment '{0}' is not of the form key=value")]
    MissingAssignment(String),

    #[error("Invalid value '{value}' for {option}")]
    InvalidOption { option: &'static str, value: String },

    #[error("Unknown colormap '{0}'")]
    UnknownColormap(String),

    #[error("Invalid color '{0}'")]
    InvalidColor(String),

    #[error("Invalid legend location '{0}'")]
    InvalidLegendLocation(String),
}

impl LineplotError {
    pub fn invalid_option(option: &'static str, value: impl Into<String>) -> Self {
        LineplotError::InvalidOption {
            option,
            value: value.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LineplotError>;
