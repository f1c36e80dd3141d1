use tracing::warn;

use super::text::{Document, GatewayReply, ParseError, Rejection};
use crate::domain::{
    CallbackUrl, ClientId, DestName, GatewayTime, MessageText, RawPhoneNumber, SendSms,
    SendSmsResponse, Validity,
};

/// Query parameter telling the gateway the form body is UTF-8.
pub const SEND_CHARSET_PARAM: (&str, &str) = ("CharsetURL", "UTF8");

pub fn encode_send_sms_form(request: &SendSms) -> Vec<(String, String)> {
    let mut params = vec![
        (
            RawPhoneNumber::FIELD.to_owned(),
            request.to().raw().to_owned(),
        ),
        (MessageText::FIELD.to_owned(), request.text().to_wire()),
    ];

    let options = request.options();
    if let Some(client_id) = options.client_id.as_ref() {
        params.push((ClientId::FIELD.to_owned(), client_id.as_str().to_owned()));
    }
    if let Some(send_time) = options.send_time {
        params.push((GatewayTime::FIELD.to_owned(), send_time.to_wire()));
    }
    if let Some(validity) = options.validity {
        params.push((Validity::FIELD.to_owned(), validity.to_wire()));
    }
    if let Some(dest_name) = options.dest_name.as_ref() {
        params.push((DestName::FIELD.to_owned(), dest_name.as_str().to_owned()));
    }
    if let Some(callback_url) = options.callback_url.as_ref() {
        params.push((
            CallbackUrl::FIELD.to_owned(),
            callback_url.as_str().to_owned(),
        ));
    }

    params
}

pub fn decode_send_sms_response(
    body: &str,
) -> Result<GatewayReply<SendSmsResponse>, ParseError> {
    let doc = Document::parse(body);
    let (section, status_code) = doc.status_section()?;
    if !status_code.is_accepted() {
        return Ok(GatewayReply::Rejected(Rejection {
            status_code,
            status_text: section.status_text(),
        }));
    }

    // Accepted replies stay accepted even when the balance is unreadable.
    let account_points = doc.account_points().unwrap_or_else(|err| {
        warn!(error = %err, "ignoring unreadable account points in accepted reply");
        None
    });

    Ok(GatewayReply::Accepted(SendSmsResponse {
        status_code,
        status_text: section.status_text(),
        msgid: section.msgid()?,
        account_points,
        duplicate: section.duplicate(),
    }))
}
