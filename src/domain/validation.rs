use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    TooLong { field: &'static str, max: usize, actual: usize },
    InvalidCharacters { field: &'static str, input: String },
    TooManyMessages { max: usize, actual: usize },
    TooManyMessageIds { max: usize, actual: usize },
    DuplicateClientId { client_id: String },
    InvalidPhoneNumber { input: String },
    InvalidTime { input: String },
    ValidityOutOfRange { min: u32, max: u32, actual: u32 },
    InvalidCallbackUrl { input: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::TooLong { field, max, actual } => {
                write!(f, "{field} is too long: {actual} characters (max {max})")
            }
            Self::InvalidCharacters { field, input } => {
                write!(f, "{field} contains characters the gateway cannot carry: {input:?}")
            }
            Self::TooManyMessages { max, actual } => {
                write!(f, "too many messages in batch: {actual} (max {max})")
            }
            Self::TooManyMessageIds { max, actual } => {
                write!(f, "too many message ids: {actual} (max {max})")
            }
            Self::DuplicateClientId { client_id } => {
                write!(f, "duplicate client id in batch: {client_id}")
            }
            Self::InvalidPhoneNumber { input } => write!(f, "invalid phone number: {input}"),
            Self::InvalidTime { input } => write!(
                f,
                "invalid time: {input} (expected YYYY-MM-DD HH:MM:SS or YYYYMMDDHHMMSS)"
            ),
            Self::ValidityOutOfRange { min, max, actual } => {
                write!(
                    f,
                    "validity seconds out of range: {actual} (expected {min}..={max})"
                )
            }
            Self::InvalidCallbackUrl { input } => write!(f, "invalid callback url: {input}"),
        }
    }
}

impl std::error::Error for ValidationError {}
