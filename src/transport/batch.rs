use super::text::{Document, GatewayReply, ParseError, Rejection, STATUS_CODE_KEY};
use crate::domain::{BatchItemResult, BatchSendResponse, SendBatch};

/// Query parameter telling the gateway the batch body is UTF-8.
pub const BATCH_ENCODING_PARAM: (&str, &str) = ("Encoding_PostIn", "UTF8");

const FIELD_SEPARATOR: &str = "$$";

/// One line per message:
/// `ClientID$$dstaddr$$dlvtime$$vldtime$$destname$$response$$smbody`.
pub fn encode_batch_body(request: &SendBatch) -> String {
    request
        .messages()
        .iter()
        .zip(request.client_ids())
        .map(|(message, client_id)| {
            let options = message.options();
            let fields = [
                client_id.as_str().to_owned(),
                message.to().raw().to_owned(),
                options.send_time.map(|t| t.to_wire()).unwrap_or_default(),
                options.validity.map(|v| v.to_wire()).unwrap_or_default(),
                options
                    .dest_name
                    .as_ref()
                    .map(|n| n.as_str().to_owned())
                    .unwrap_or_default(),
                options
                    .callback_url
                    .as_ref()
                    .map(|u| u.to_batch_field())
                    .unwrap_or_default(),
                message.text().to_wire(),
            ];
            fields.join(FIELD_SEPARATOR)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Decode a batch reply: one `[ClientID]` section per message, then an optional
/// `AccountPoint=` trailer.
///
/// A reply without any section header carrying a failure code is a batch-wide answer
/// (bad credentials and the like). With an accepted code it stands for the only
/// message of a one-message batch; for larger batches it is a count mismatch.
pub fn decode_batch_response(
    request: &SendBatch,
    body: &str,
) -> Result<GatewayReply<BatchSendResponse>, ParseError> {
    let doc = Document::parse(body);
    let account_points = doc.account_points()?;

    if doc.sections.iter().all(|s| s.header.is_none()) {
        let (section, status_code) = doc.status_section()?;
        if !status_code.is_accepted() {
            return Ok(GatewayReply::Rejected(Rejection {
                status_code,
                status_text: section.status_text(),
            }));
        }
        // An accepted answer without headers only accounts for one message.
        let client_id = match request.client_ids() {
            [only] => only.clone(),
            ids => {
                return Err(ParseError::CountMismatch {
                    expected: ids.len(),
                    actual: 1,
                });
            }
        };
        return Ok(GatewayReply::Accepted(BatchSendResponse {
            results: vec![BatchItemResult {
                client_id,
                msgid: section.msgid()?,
                status_code,
                status_text: section.status_text(),
                duplicate: section.duplicate(),
            }],
            account_points,
        }));
    }

    let mut slots: Vec<Option<BatchItemResult>> = vec![None; request.len()];
    let mut found = 0usize;

    for section in doc.sections.iter() {
        let Some(header) = section.header else {
            continue;
        };
        let idx = request
            .client_ids()
            .iter()
            .position(|id| id.as_str() == header)
            .ok_or_else(|| ParseError::UnknownClientId {
                client_id: header.to_owned(),
            })?;
        if slots[idx].is_some() {
            return Err(ParseError::RepeatedClientId {
                client_id: header.to_owned(),
            });
        }
        let status_code = section.status_code().ok_or(ParseError::MissingField {
            field: STATUS_CODE_KEY,
        })?;

        slots[idx] = Some(BatchItemResult {
            client_id: request.client_ids()[idx].clone(),
            msgid: section.msgid()?,
            status_code,
            status_text: section.status_text(),
            duplicate: section.duplicate(),
        });
        found += 1;
    }

    if found != request.len() {
        return Err(ParseError::CountMismatch {
            expected: request.len(),
            actual: found,
        });
    }

    let results = slots.into_iter().flatten().collect::<Vec<_>>();

    // Every line refused for the same credential reason is really a batch-wide refusal.
    if let Some(first) = results.first() {
        if first.status_code.is_auth_error()
            && results.iter().all(|r| r.status_code == first.status_code)
        {
            return Ok(GatewayReply::Rejected(Rejection {
                status_code: first.status_code.clone(),
                status_text: first.status_text.clone(),
            }));
        }
    }

    Ok(GatewayReply::Accepted(BatchSendResponse {
        results,
        account_points,
    }))
}
