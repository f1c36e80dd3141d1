//! Typed, blocking Rust client for the Mitake (三竹資訊) SMS gateway HTTP API.
//!
//! The crate is split into a domain layer of validated types, a transport layer
//! that owns the gateway's wire formats, and a small client layer issuing one
//! HTTP request per operation.
//!
//! ```rust,no_run
//! use mitake::{MessageText, MitakeClient, RawPhoneNumber, SendSms};
//!
//! fn main() -> Result<(), mitake::MitakeError> {
//!     // Reads MITAKE_USERNAME / MITAKE_PASSWORD.
//!     let client = MitakeClient::from_env()?;
//!     let phone = RawPhoneNumber::new("0912345678")?;
//!     let msg = MessageText::new("你好，這是一則測試簡訊")?;
//!     let resp = client.send_sms(SendSms::new(phone, msg))?;
//!     println!("msgid: {:?}", resp.msgid);
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;

pub use client::{
    Credentials, ErrorKind, MitakeClient, MitakeClientBuilder, MitakeError, PASSWORD_ENV,
    USERNAME_ENV,
};
pub use domain::{
    BalanceResponse, BatchItemResult, BatchSendResponse, CallbackUrl, ClientId, DestName,
    GatewayTime, KnownStatusCode, MessageId, MessageStatus, MessageText, Password, PhoneNumber,
    RawPhoneNumber, SEND_BATCH_MAX_MESSAGES, STATUS_QUERY_MAX_IDS, SendBatch, SendOptions,
    SendSms, SendSmsResponse, StatusCode, StatusQuery, StatusResponse, Username, ValidationError,
    Validity,
};
