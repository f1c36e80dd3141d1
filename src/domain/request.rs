use std::collections::HashSet;

use crate::domain::validation::ValidationError;
use crate::domain::value::{
    CallbackUrl, ClientId, DestName, GatewayTime, MessageId, MessageText, RawPhoneNumber, Validity,
};

pub const SEND_BATCH_MAX_MESSAGES: usize = 500;
pub const STATUS_QUERY_MAX_IDS: usize = 100;

/// Optional per-message parameters.
#[derive(Debug, Clone, Default)]
pub struct SendOptions {
    /// Sent as `clientid`, the gateway's field for de-duplicating retries; not as `msgid`.
    pub client_id: Option<ClientId>,
    pub send_time: Option<GatewayTime>,
    pub validity: Option<Validity>,
    pub dest_name: Option<DestName>,
    pub callback_url: Option<CallbackUrl>,
}

/// One outbound message.
#[derive(Debug, Clone)]
pub struct SendSms {
    to: RawPhoneNumber,
    text: MessageText,
    options: SendOptions,
}

impl SendSms {
    pub fn new(to: RawPhoneNumber, text: MessageText) -> Self {
        Self::with_options(to, text, SendOptions::default())
    }

    pub fn with_options(to: RawPhoneNumber, text: MessageText, options: SendOptions) -> Self {
        Self { to, text, options }
    }

    pub fn to(&self) -> &RawPhoneNumber {
        &self.to
    }

    pub fn text(&self) -> &MessageText {
        &self.text
    }

    pub fn options(&self) -> &SendOptions {
        &self.options
    }
}

/// Several independent messages submitted in one request.
///
/// Every message gets a client id on the wire: the caller's, or its 1-based
/// position in the batch. Those ids must be unique since results are matched
/// back through them.
#[derive(Debug, Clone)]
pub struct SendBatch {
    messages: Vec<SendSms>,
    client_ids: Vec<ClientId>,
}

impl SendBatch {
    pub fn new(messages: Vec<SendSms>) -> Result<Self, ValidationError> {
        if messages.is_empty() {
            return Err(ValidationError::Empty { field: "messages" });
        }
        if messages.len() > SEND_BATCH_MAX_MESSAGES {
            return Err(ValidationError::TooManyMessages {
                max: SEND_BATCH_MAX_MESSAGES,
                actual: messages.len(),
            });
        }

        let client_ids = messages
            .iter()
            .enumerate()
            .map(|(idx, message)| match &message.options.client_id {
                Some(id) => Ok(id.clone()),
                None => ClientId::new((idx + 1).to_string()),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut seen = HashSet::with_capacity(client_ids.len());
        for id in &client_ids {
            if !seen.insert(id.as_str()) {
                return Err(ValidationError::DuplicateClientId {
                    client_id: id.as_str().to_owned(),
                });
            }
        }

        Ok(Self {
            messages,
            client_ids,
        })
    }

    pub fn messages(&self) -> &[SendSms] {
        &self.messages
    }

    /// Client ids as sent, aligned with [`SendBatch::messages`].
    pub fn client_ids(&self) -> &[ClientId] {
        &self.client_ids
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Delivery status lookup for previously sent messages.
#[derive(Debug, Clone)]
pub struct StatusQuery {
    message_ids: Vec<MessageId>,
}

impl StatusQuery {
    pub fn new(message_ids: Vec<MessageId>) -> Result<Self, ValidationError> {
        if message_ids.is_empty() {
            return Err(ValidationError::Empty {
                field: MessageId::FIELD,
            });
        }
        if message_ids.len() > STATUS_QUERY_MAX_IDS {
            return Err(ValidationError::TooManyMessageIds {
                max: STATUS_QUERY_MAX_IDS,
                actual: message_ids.len(),
            });
        }
        Ok(Self { message_ids })
    }

    pub fn one(message_id: MessageId) -> Self {
        Self {
            message_ids: vec![message_id],
        }
    }

    pub fn message_ids(&self) -> &[MessageId] {
        &self.message_ids
    }
}
