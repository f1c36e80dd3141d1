use std::collections::BTreeMap;

use crate::domain::value::{ClientId, MessageId, StatusCode};

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SendSmsResponse {
    pub status_code: StatusCode,
    pub status_text: Option<String>,
    pub msgid: Option<MessageId>,
    pub account_points: Option<i64>,
    pub duplicate: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BatchSendResponse {
    /// One entry per submitted message, in submission order.
    pub results: Vec<BatchItemResult>,
    pub account_points: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BatchItemResult {
    pub client_id: ClientId,
    pub msgid: Option<MessageId>,
    pub status_code: StatusCode,
    pub status_text: Option<String>,
    pub duplicate: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BalanceResponse {
    pub account_points: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StatusResponse {
    pub messages: BTreeMap<MessageId, MessageStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MessageStatus {
    pub status_code: StatusCode,
    /// Time of the last status change, as reported (usually `YYYYMMDDHHMMSS`).
    pub status_time: Option<String>,
}
