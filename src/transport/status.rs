use std::collections::BTreeMap;

use super::text::{Document, GatewayReply, ParseError, Rejection, STATUS_CODE_KEY, split_record};
use crate::domain::{MessageId, MessageStatus, StatusCode, StatusQuery, StatusResponse};

pub fn encode_status_form(request: &StatusQuery) -> Vec<(String, String)> {
    vec![(
        MessageId::FIELD.to_owned(),
        request
            .message_ids()
            .iter()
            .map(MessageId::as_str)
            .collect::<Vec<_>>()
            .join(","),
    )]
}

/// Decode one `msgid<TAB>statuscode<TAB>statustime` record per line.
///
/// A `key=value` body instead means the whole query was refused.
pub fn decode_status_response(
    request: &StatusQuery,
    body: &str,
) -> Result<GatewayReply<StatusResponse>, ParseError> {
    if body.lines().any(|line| line.contains('=')) {
        let doc = Document::parse(body);
        let (section, status_code) = doc.status_section()?;
        if status_code.is_accepted() {
            return Err(ParseError::UnexpectedLine {
                line: format!("{STATUS_CODE_KEY}={status_code}"),
            });
        }
        return Ok(GatewayReply::Rejected(Rejection {
            status_code,
            status_text: section.status_text(),
        }));
    }

    let mut messages = BTreeMap::new();
    for line in body.lines() {
        let line = line.trim();
        if line.is_empty() || (line.starts_with('[') && line.ends_with(']')) {
            continue;
        }

        let fields = split_record(line);
        let (raw_id, raw_code) = match fields.as_slice() {
            [id, code, ..] if !code.is_empty() => (*id, *code),
            _ => {
                return Err(ParseError::UnexpectedLine {
                    line: line.to_owned(),
                });
            }
        };

        let msgid = request
            .message_ids()
            .iter()
            .find(|id| id.as_str() == raw_id)
            .cloned()
            .ok_or_else(|| ParseError::UnknownMessageId {
                msgid: raw_id.to_owned(),
            })?;

        let status_time = fields
            .get(2)
            .filter(|time| !time.is_empty())
            .map(|time| (*time).to_owned());

        messages.insert(
            msgid,
            MessageStatus {
                status_code: StatusCode::new(raw_code),
                status_time,
            },
        );
    }

    Ok(GatewayReply::Accepted(StatusResponse { messages }))
}
