use super::text::{ACCOUNT_POINT_KEY, Document, GatewayReply, ParseError, Rejection, parse_points};
use crate::domain::BalanceResponse;

/// Decode `AccountPoint=<n>` (possibly under a `[1]` header), a bare number, or a
/// status-code refusal.
pub fn decode_balance_response(body: &str) -> Result<GatewayReply<BalanceResponse>, ParseError> {
    let doc = Document::parse(body);

    if let Some(account_points) = doc.account_points()? {
        return Ok(GatewayReply::Accepted(BalanceResponse { account_points }));
    }

    if doc.sections.is_empty() {
        if let [line] = doc.loose.as_slice() {
            let account_points = parse_points(ACCOUNT_POINT_KEY, line)?;
            return Ok(GatewayReply::Accepted(BalanceResponse { account_points }));
        }
    }

    let (section, status_code) = doc.status_section()?;
    if status_code.is_accepted() {
        return Err(ParseError::MissingField {
            field: ACCOUNT_POINT_KEY,
        });
    }
    Ok(GatewayReply::Rejected(Rejection {
        status_code,
        status_text: section.status_text(),
    }))
}
