//! Parser for the gateway's line-oriented text replies.
//!
//! Replies are a loose mix of `[header]` lines, `key=value` lines and
//! delimiter-separated records. Everything here works on literal strings so the
//! quirks stay testable without a network.

use crate::domain::{MessageId, StatusCode};

const BOM: &str = "\u{feff}";

pub const STATUS_CODE_KEY: &str = "statuscode";
pub const MSGID_KEY: &str = "msgid";
pub const ACCOUNT_POINT_KEY: &str = "AccountPoint";
pub const DUPLICATE_KEY: &str = "Duplicate";
const STATUS_TEXT_KEYS: [&str; 2] = ["Error", "statusstr"];

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("response body is not valid UTF-8")]
    NotUtf8(#[from] std::str::Utf8Error),

    #[error("response body is empty")]
    Empty,

    #[error("response is missing `{field}`")]
    MissingField { field: &'static str },

    #[error("invalid value for `{field}`: {value:?}")]
    InvalidValue { field: &'static str, value: String },

    #[error("unexpected line in response: {line:?}")]
    UnexpectedLine { line: String },

    #[error("response contains unknown client id: {client_id}")]
    UnknownClientId { client_id: String },

    #[error("response repeats client id: {client_id}")]
    RepeatedClientId { client_id: String },

    #[error("response contains unknown message id: {msgid}")]
    UnknownMessageId { msgid: String },

    #[error("expected {expected} results in response, got {actual}")]
    CountMismatch { expected: usize, actual: usize },
}

/// Outcome of a reply whose shape was understood.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayReply<T> {
    Accepted(T),
    Rejected(Rejection),
}

/// The gateway answered with a status code instead of data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub status_code: StatusCode,
    pub status_text: Option<String>,
}

/// Decode a raw body as UTF-8, dropping a leading byte-order mark.
pub fn decode_utf8(bytes: &[u8]) -> Result<&str, ParseError> {
    let text = std::str::from_utf8(bytes)?;
    Ok(text.strip_prefix(BOM).unwrap_or(text))
}

/// One `[header]` block and the `key=value` lines that follow it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section<'a> {
    pub header: Option<&'a str>,
    pub fields: Vec<(&'a str, &'a str)>,
}

impl<'a> Section<'a> {
    /// First value for `key`, compared case-insensitively.
    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.fields
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| *v)
    }

    pub fn status_code(&self) -> Option<StatusCode> {
        self.get(STATUS_CODE_KEY)
            .filter(|code| !code.is_empty())
            .map(StatusCode::new)
    }

    /// Descriptive text the gateway attached, preserved verbatim.
    pub fn status_text(&self) -> Option<String> {
        STATUS_TEXT_KEYS
            .iter()
            .find_map(|key| self.get(key))
            .filter(|text| !text.is_empty())
            .map(str::to_owned)
    }

    pub fn msgid(&self) -> Result<Option<MessageId>, ParseError> {
        self.get(MSGID_KEY)
            .filter(|id| !id.is_empty())
            .map(|id| {
                MessageId::new(id).map_err(|_| ParseError::InvalidValue {
                    field: MSGID_KEY,
                    value: id.to_owned(),
                })
            })
            .transpose()
    }

    pub fn duplicate(&self) -> bool {
        self.get(DUPLICATE_KEY)
            .is_some_and(|flag| flag.eq_ignore_ascii_case("Y"))
    }
}

/// A reply split into sections plus any lines that were neither headers nor pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document<'a> {
    pub sections: Vec<Section<'a>>,
    pub loose: Vec<&'a str>,
}

impl<'a> Document<'a> {
    pub fn parse(body: &'a str) -> Self {
        let mut doc = Document::default();

        for line in body.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(header) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                doc.sections.push(Section {
                    header: Some(header.trim()),
                    fields: Vec::new(),
                });
                continue;
            }

            match line.split_once('=') {
                Some((key, value)) => {
                    if doc.sections.is_empty() {
                        doc.sections.push(Section::default());
                    }
                    if let Some(section) = doc.sections.last_mut() {
                        section.fields.push((key.trim(), value.trim()));
                    }
                }
                None => doc.loose.push(line),
            }
        }

        doc
    }

    /// Last value for `key` in any section (trailer lines land in the final section).
    pub fn last_value(&self, key: &str) -> Option<&'a str> {
        self.sections.iter().rev().find_map(|section| section.get(key))
    }

    /// The first section carrying a status code, with that code.
    pub fn status_section(&self) -> Result<(&Section<'a>, StatusCode), ParseError> {
        self.sections
            .iter()
            .find_map(|section| section.status_code().map(|code| (section, code)))
            .ok_or_else(|| self.shape_error(STATUS_CODE_KEY))
    }

    /// Best description of why a required field could not be found.
    pub fn shape_error(&self, field: &'static str) -> ParseError {
        if self.sections.iter().all(|s| s.fields.is_empty()) {
            if let Some(line) = self.loose.first() {
                return ParseError::UnexpectedLine {
                    line: (*line).to_owned(),
                };
            }
            if self.sections.is_empty() {
                return ParseError::Empty;
            }
        }
        ParseError::MissingField { field }
    }

    pub fn account_points(&self) -> Result<Option<i64>, ParseError> {
        self.last_value(ACCOUNT_POINT_KEY)
            .map(|value| parse_points(ACCOUNT_POINT_KEY, value))
            .transpose()
    }
}

pub fn parse_points(field: &'static str, value: &str) -> Result<i64, ParseError> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| ParseError::InvalidValue {
            field,
            value: value.to_owned(),
        })
}

/// Split a positional record on tab, pipe, or comma, whichever the line uses.
pub fn split_record(line: &str) -> Vec<&str> {
    let delimiter = if line.contains('\t') {
        '\t'
    } else if line.contains('|') {
        '|'
    } else {
        ','
    };
    line.split(delimiter).map(str::trim).collect()
}
