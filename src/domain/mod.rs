//! Domain layer: strong types with validation and invariants (no I/O).

mod request;
mod response;
mod validation;
mod value;

pub use request::{
    SEND_BATCH_MAX_MESSAGES, STATUS_QUERY_MAX_IDS, SendBatch, SendOptions, SendSms, StatusQuery,
};
pub use response::{
    BalanceResponse, BatchItemResult, BatchSendResponse, MessageStatus, SendSmsResponse,
    StatusResponse,
};
pub use validation::ValidationError;
pub use value::{
    CallbackUrl, ClientId, DestName, GATEWAY_LINE_BREAK, GatewayTime, KnownStatusCode, MessageId,
    MessageText, Password, PhoneNumber, RawPhoneNumber, StatusCode, Username, Validity,
};

#[cfg(test)]
mod tests {
    use super::*;

    fn message(to: &str, text: &str) -> SendSms {
        SendSms::new(
            RawPhoneNumber::new(to).unwrap(),
            MessageText::new(text).unwrap(),
        )
    }

    fn with_client_id(to: &str, text: &str, client_id: &str) -> SendSms {
        SendSms::with_options(
            RawPhoneNumber::new(to).unwrap(),
            MessageText::new(text).unwrap(),
            SendOptions {
                client_id: Some(ClientId::new(client_id).unwrap()),
                ..Default::default()
            },
        )
    }

    #[test]
    fn send_sms_rejects_empty_recipient_or_text_before_building() {
        assert!(matches!(
            RawPhoneNumber::new(""),
            Err(ValidationError::Empty {
                field: RawPhoneNumber::FIELD
            })
        ));
        assert!(matches!(
            MessageText::new(""),
            Err(ValidationError::Empty {
                field: MessageText::FIELD
            })
        ));
    }

    #[test]
    fn send_batch_requires_non_empty() {
        let err = SendBatch::new(Vec::new()).unwrap_err();
        assert!(matches!(err, ValidationError::Empty { field: "messages" }));
    }

    #[test]
    fn send_batch_message_limit_is_enforced() {
        let messages = vec![message("0912345678", "hi"); SEND_BATCH_MAX_MESSAGES + 1];
        let err = SendBatch::new(messages).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::TooManyMessages {
                max: SEND_BATCH_MAX_MESSAGES,
                ..
            }
        ));
    }

    #[test]
    fn send_batch_assigns_positional_client_ids() {
        let batch = SendBatch::new(vec![
            message("0912345678", "first"),
            with_client_id("0987654321", "second", "msg2"),
            message("0966666666", "third"),
        ])
        .unwrap();

        let ids = batch
            .client_ids()
            .iter()
            .map(ClientId::as_str)
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["1", "msg2", "3"]);
        assert_eq!(batch.len(), 3);
    }

    #[test]
    fn send_batch_rejects_colliding_client_ids() {
        let err = SendBatch::new(vec![
            message("0912345678", "first"),
            with_client_id("0987654321", "second", "1"),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            ValidationError::DuplicateClientId {
                client_id: "1".to_owned()
            }
        );
    }

    #[test]
    fn status_query_id_limits_are_enforced() {
        assert!(matches!(
            StatusQuery::new(Vec::new()),
            Err(ValidationError::Empty {
                field: MessageId::FIELD
            })
        ));

        let ids = (0..(STATUS_QUERY_MAX_IDS + 1))
            .map(|idx| MessageId::new(format!("10100{idx:05}")).unwrap())
            .collect::<Vec<_>>();
        let err = StatusQuery::new(ids).unwrap_err();
        assert!(matches!(err, ValidationError::TooManyMessageIds { .. }));
    }

    #[test]
    fn status_code_known_mapping() {
        let code = StatusCode::new("1");
        assert_eq!(code.known(), Some(KnownStatusCode::SentToCarrier));

        let unknown = StatusCode::new("Q");
        assert_eq!(unknown.known(), None);
    }
}
