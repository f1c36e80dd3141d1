use std::fmt;

use chrono::NaiveDateTime;
use phonenumber::country;

use crate::domain::validation::ValidationError;

/// Character the gateway interprets as a line break inside a message body.
pub const GATEWAY_LINE_BREAK: char = '\u{6}';

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Mitake account username.
///
/// Invariant: non-empty after trimming.
pub struct Username(String);

impl Username {
    /// Form field name used by Mitake (`username`).
    pub const FIELD: &'static str = "username";

    /// Create a validated [`Username`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated username.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
/// Mitake account password.
///
/// Invariant: must not be empty (whitespace is preserved and allowed).
pub struct Password(String);

impl Password {
    /// Form field name used by Mitake (`password`).
    pub const FIELD: &'static str = "password";

    /// Create a validated [`Password`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the password as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
/// SMS message body (`smbody`).
///
/// Invariant: non-empty after trimming. The original value (including whitespace) is preserved.
pub struct MessageText(String);

impl MessageText {
    /// Form field name used by Mitake (`smbody`).
    pub const FIELD: &'static str = "smbody";

    /// Create validated message text.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the message text as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Text as transmitted: CR/LF sequences become [`GATEWAY_LINE_BREAK`].
    pub fn to_wire(&self) -> String {
        self.0
            .replace("\r\n", "\n")
            .replace(['\n', '\r'], &GATEWAY_LINE_BREAK.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
/// Gateway-assigned message id (`msgid`).
///
/// Invariant: non-empty after trimming and free of the characters that delimit ids
/// and status records on the wire (`,` `|` `=`, tabs, line breaks).
pub struct MessageId(String);

impl MessageId {
    /// Form field name used by Mitake (`msgid`).
    pub const FIELD: &'static str = "msgid";

    /// Create a validated [`MessageId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        if trimmed.contains([',', '|', '=', '\t', '\r', '\n']) {
            return Err(ValidationError::InvalidCharacters {
                field: Self::FIELD,
                input: trimmed.to_owned(),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated message id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
/// Caller-chosen message id (`clientid`), echoed back by the gateway.
///
/// Invariant: non-empty after trimming, at most [`ClientId::MAX_LEN`] characters,
/// and free of the batch field separator and line breaks.
pub struct ClientId(String);

impl ClientId {
    /// Form field name used by Mitake (`clientid`).
    pub const FIELD: &'static str = "clientid";

    /// Longest id the gateway accepts.
    pub const MAX_LEN: usize = 36;

    /// Create a validated [`ClientId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        let len = trimmed.chars().count();
        if len > Self::MAX_LEN {
            return Err(ValidationError::TooLong {
                field: Self::FIELD,
                max: Self::MAX_LEN,
                actual: len,
            });
        }
        reject_batch_separators(Self::FIELD, trimmed)?;
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated client id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Recipient display name (`destname`).
///
/// Invariant: non-empty after trimming and free of the batch field separator and line breaks.
pub struct DestName(String);

impl DestName {
    /// Form field name used by Mitake (`destname`).
    pub const FIELD: &'static str = "destname";

    /// Create a validated [`DestName`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        reject_batch_separators(Self::FIELD, trimmed)?;
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Delivery-report callback URL (`response`).
///
/// Invariant: an absolute `http` or `https` URL.
pub struct CallbackUrl(url::Url);

impl CallbackUrl {
    /// Form field name used by Mitake (`response`).
    pub const FIELD: &'static str = "response";

    /// Parse and validate a callback URL.
    pub fn new(value: impl AsRef<str>) -> Result<Self, ValidationError> {
        let raw = value.as_ref().trim();
        if raw.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        let parsed = url::Url::parse(raw).map_err(|_| ValidationError::InvalidCallbackUrl {
            input: raw.to_owned(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ValidationError::InvalidCallbackUrl {
                input: raw.to_owned(),
            });
        }
        Ok(Self(parsed))
    }

    /// Borrow the URL as serialized.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// The URL with `$` percent-encoded, so it cannot split a `$$`-delimited batch line.
    pub fn to_batch_field(&self) -> String {
        self.0.as_str().replace('$', "%24")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Unvalidated-format phone number as sent to Mitake (`dstaddr`).
///
/// Invariant: non-empty after trimming, digits only with an optional leading `+`.
/// No country-specific normalization happens here; parse into [`PhoneNumber`] and
/// convert if you want that.
pub struct RawPhoneNumber(String);

impl RawPhoneNumber {
    /// Form field name used by Mitake (`dstaddr`).
    pub const FIELD: &'static str = "dstaddr";

    /// Create a loosely validated raw phone number.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::InvalidPhoneNumber {
                input: trimmed.to_owned(),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Raw (trimmed) value as sent to Mitake.
    pub fn raw(&self) -> &str {
        &self.0
    }
}

impl From<PhoneNumber> for RawPhoneNumber {
    /// Taiwanese numbers become the national `09…` form, everything else E.164.
    fn from(value: PhoneNumber) -> Self {
        Self(value.dialable)
    }
}

#[derive(Debug, Clone)]
/// Parsed phone number, normalized to the form Mitake dials.
///
/// Equality, ordering, and hashing are based on the E.164 form.
pub struct PhoneNumber {
    raw: String,
    e164: String,
    dialable: String,
    parsed: phonenumber::PhoneNumber,
}

impl PhoneNumber {
    /// Form field name used by Mitake (`dstaddr`).
    pub const FIELD: &'static str = "dstaddr";

    /// Country calling code for Taiwan.
    pub const TAIWAN_CODE: u16 = 886;

    /// Parse a number, treating inputs without a country prefix as Taiwanese.
    pub fn parse(input: impl Into<String>) -> Result<Self, ValidationError> {
        Self::parse_with_region(Some(country::Id::TW), input)
    }

    /// Parse a number with an explicit default region.
    pub fn parse_with_region(
        default_region: Option<country::Id>,
        input: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let input = input.into();
        let raw = input.trim().to_owned();
        if raw.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }

        let parsed = phonenumber::parse(default_region, &raw)
            .map_err(|_| ValidationError::InvalidPhoneNumber { input: raw.clone() })?;

        let e164 = phonenumber::format(&parsed)
            .mode(phonenumber::Mode::E164)
            .to_string();
        let dialable = if parsed.code().value() == Self::TAIWAN_CODE {
            format!("0{}", parsed.national().value())
        } else {
            e164.clone()
        };

        Ok(Self {
            raw,
            e164,
            dialable,
            parsed,
        })
    }

    /// Raw input after trimming.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Normalized E.164 representation.
    pub fn e164(&self) -> &str {
        &self.e164
    }

    /// The value sent as `dstaddr`.
    pub fn dialable(&self) -> &str {
        &self.dialable
    }

    /// The parsed phone number from the `phonenumber` crate.
    pub fn parsed(&self) -> &phonenumber::PhoneNumber {
        &self.parsed
    }
}

impl PartialEq for PhoneNumber {
    fn eq(&self, other: &Self) -> bool {
        self.e164 == other.e164
    }
}

impl Eq for PhoneNumber {}

impl std::hash::Hash for PhoneNumber {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.e164.hash(state);
    }
}

impl std::cmp::PartialOrd for PhoneNumber {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl std::cmp::Ord for PhoneNumber {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.e164.cmp(&other.e164)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Point in time in the gateway's local clock.
///
/// Accepts `YYYY-MM-DD HH:MM:SS` or `YYYYMMDDHHMMSS` and always renders as
/// `YYYYMMDDHHMMSS`.
pub struct GatewayTime(NaiveDateTime);

impl GatewayTime {
    /// Form field name used by Mitake for scheduled sends (`dlvtime`).
    pub const FIELD: &'static str = "dlvtime";

    const HUMAN_FORMAT: &'static str = "%Y-%m-%d %H:%M:%S";
    const WIRE_FORMAT: &'static str = "%Y%m%d%H%M%S";

    /// Parse either accepted textual form.
    pub fn parse(value: impl AsRef<str>) -> Result<Self, ValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        let invalid = || ValidationError::InvalidTime {
            input: trimmed.to_owned(),
        };

        let human = if trimmed.len() == 14 && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            // Widths are fixed here; chrono's `%Y` would happily eat more digits.
            format!(
                "{}-{}-{} {}:{}:{}",
                &trimmed[0..4],
                &trimmed[4..6],
                &trimmed[6..8],
                &trimmed[8..10],
                &trimmed[10..12],
                &trimmed[12..14]
            )
        } else {
            trimmed.to_owned()
        };

        NaiveDateTime::parse_from_str(&human, Self::HUMAN_FORMAT)
            .map(Self)
            .map_err(|_| invalid())
    }

    /// Wrap an already-constructed timestamp.
    pub fn from_naive(value: NaiveDateTime) -> Self {
        Self(value)
    }

    /// The underlying timestamp.
    pub fn naive(self) -> NaiveDateTime {
        self.0
    }

    /// `YYYYMMDDHHMMSS`, as the gateway expects.
    pub fn to_wire(self) -> String {
        self.0.format(Self::WIRE_FORMAT).to_string()
    }
}

impl fmt::Display for GatewayTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// How long the gateway keeps retrying delivery (`vldtime`).
pub enum Validity {
    /// Give up at this point in time.
    Until(GatewayTime),
    /// Give up after this many seconds.
    Seconds(u32),
}

impl Validity {
    /// Form field name used by Mitake (`vldtime`).
    pub const FIELD: &'static str = "vldtime";

    /// Minimum relative validity.
    pub const MIN_SECONDS: u32 = 1;
    /// Maximum relative validity (one day).
    pub const MAX_SECONDS: u32 = 86_400;

    /// Create a validated relative validity window.
    pub fn seconds(value: u32) -> Result<Self, ValidationError> {
        if !(Self::MIN_SECONDS..=Self::MAX_SECONDS).contains(&value) {
            return Err(ValidationError::ValidityOutOfRange {
                min: Self::MIN_SECONDS,
                max: Self::MAX_SECONDS,
                actual: value,
            });
        }
        Ok(Self::Seconds(value))
    }

    /// Absolute validity deadline in either accepted time format.
    pub fn until(value: impl AsRef<str>) -> Result<Self, ValidationError> {
        Ok(Self::Until(GatewayTime::parse(value)?))
    }

    pub fn to_wire(self) -> String {
        match self {
            Self::Until(time) => time.to_wire(),
            Self::Seconds(seconds) => seconds.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
/// Mitake status code (`statuscode`).
///
/// This value is preserved verbatim even when the code is unknown to this crate.
pub struct StatusCode(String);

impl StatusCode {
    /// Construct a status code from its textual representation.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_owned())
    }

    /// The code as sent by the gateway.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Map this code to a known status code variant, if one exists.
    pub fn known(&self) -> Option<KnownStatusCode> {
        KnownStatusCode::from_code(&self.0)
    }

    /// Returns `true` if the gateway took the message (queued, scheduled, sent or delivered).
    pub fn is_accepted(&self) -> bool {
        matches!(self.known(), Some(kind) if kind.is_accepted())
    }

    /// Returns `true` if this status code represents an authentication/authorization error.
    pub fn is_auth_error(&self) -> bool {
        matches!(self.known(), Some(kind) if kind.is_auth_error())
    }

    /// Returns `true` once the handset acknowledged the message.
    pub fn is_delivered(&self) -> bool {
        self.known() == Some(KnownStatusCode::Delivered)
    }

    /// Returns `true` if the message will not change status again.
    pub fn is_final(&self) -> bool {
        matches!(self.known(), Some(kind) if kind.is_final())
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
/// Known Mitake status codes.
///
/// Unknown codes are preserved as [`StatusCode`] and return `None` from [`KnownStatusCode::from_code`].
pub enum KnownStatusCode {
    SystemError,
    SendingSuspended,
    SendingTemporarilySuspended,
    MissingUsername,
    MissingPassword,
    InvalidCredentials,
    AccountExpired,
    AccountDisabled,
    InvalidSourceAddress,
    ConnectionLimitReached,
    PasswordChangeRequired,
    PasswordExpired,
    HttpAccessDenied,
    ServicePaused,
    BillingFailed,
    MessageExpired,
    EmptyMessageBody,
    InvalidPhoneNumber,
    QueryLimitExceeded,
    PayloadTooLarge,
    InvalidParameter,
    NoData,
    Scheduled,
    SentToCarrier,
    Sent,
    Delivered,
    ContentError,
    NumberError,
    MessagingDisabled,
    DeliveryTimedOut,
    ScheduleCancelled,
}

impl KnownStatusCode {
    /// Convert a raw Mitake code into a known variant.
    pub fn from_code(code: &str) -> Option<Self> {
        Some(match code.trim() {
            "*" => Self::SystemError,
            "a" => Self::SendingSuspended,
            "b" => Self::SendingTemporarilySuspended,
            "c" => Self::MissingUsername,
            "d" => Self::MissingPassword,
            "e" => Self::InvalidCredentials,
            "f" => Self::AccountExpired,
            "h" => Self::AccountDisabled,
            "k" => Self::InvalidSourceAddress,
            "l" => Self::ConnectionLimitReached,
            "m" => Self::PasswordChangeRequired,
            "n" => Self::PasswordExpired,
            "p" => Self::HttpAccessDenied,
            "r" => Self::ServicePaused,
            "s" => Self::BillingFailed,
            "t" => Self::MessageExpired,
            "u" => Self::EmptyMessageBody,
            "v" => Self::InvalidPhoneNumber,
            "w" => Self::QueryLimitExceeded,
            "x" => Self::PayloadTooLarge,
            "y" => Self::InvalidParameter,
            "z" => Self::NoData,
            "0" => Self::Scheduled,
            "1" => Self::SentToCarrier,
            "2" => Self::Sent,
            "4" => Self::Delivered,
            "5" => Self::ContentError,
            "6" => Self::NumberError,
            "7" => Self::MessagingDisabled,
            "8" => Self::DeliveryTimedOut,
            "9" => Self::ScheduleCancelled,
            _ => return None,
        })
    }

    /// Short English description of the code.
    pub fn description(self) -> &'static str {
        match self {
            Self::SystemError => "system error",
            Self::SendingSuspended => "sending service suspended",
            Self::SendingTemporarilySuspended => "sending service temporarily suspended",
            Self::MissingUsername => "username is required",
            Self::MissingPassword => "password is required",
            Self::InvalidCredentials => "invalid username or password",
            Self::AccountExpired => "account expired",
            Self::AccountDisabled => "account disabled",
            Self::InvalidSourceAddress => "connection address not allowed",
            Self::ConnectionLimitReached => "too many concurrent connections",
            Self::PasswordChangeRequired => "password must be changed",
            Self::PasswordExpired => "password expired",
            Self::HttpAccessDenied => "account may not use the HTTP interface",
            Self::ServicePaused => "service paused",
            Self::BillingFailed => "billing failed",
            Self::MessageExpired => "message expired",
            Self::EmptyMessageBody => "message body must not be empty",
            Self::InvalidPhoneNumber => "invalid phone number",
            Self::QueryLimitExceeded => "too many records queried",
            Self::PayloadTooLarge => "payload too large",
            Self::InvalidParameter => "invalid parameter",
            Self::NoData => "no data",
            Self::Scheduled => "scheduled",
            Self::SentToCarrier | Self::Sent => "sent to carrier",
            Self::Delivered => "delivered to handset",
            Self::ContentError => "message content error",
            Self::NumberError => "phone number error",
            Self::MessagingDisabled => "messaging disabled for recipient",
            Self::DeliveryTimedOut => "delivery timed out",
            Self::ScheduleCancelled => "scheduled message cancelled",
        }
    }

    /// Whether the gateway took the message.
    pub fn is_accepted(self) -> bool {
        matches!(
            self,
            Self::Scheduled | Self::SentToCarrier | Self::Sent | Self::Delivered
        )
    }

    /// Whether this status indicates missing, invalid, or unusable credentials.
    pub fn is_auth_error(self) -> bool {
        matches!(
            self,
            Self::MissingUsername
                | Self::MissingPassword
                | Self::InvalidCredentials
                | Self::AccountExpired
                | Self::AccountDisabled
                | Self::PasswordChangeRequired
                | Self::PasswordExpired
                | Self::HttpAccessDenied
        )
    }

    /// Whether a delivery status will not change anymore.
    pub fn is_final(self) -> bool {
        matches!(
            self,
            Self::Delivered
                | Self::ContentError
                | Self::NumberError
                | Self::MessagingDisabled
                | Self::DeliveryTimedOut
                | Self::ScheduleCancelled
                | Self::MessageExpired
        )
    }
}

fn reject_batch_separators(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.contains("$$") || value.contains(['\r', '\n']) {
        return Err(ValidationError::InvalidCharacters {
            field,
            input: value.to_owned(),
        });
    }
    Ok(())
}
