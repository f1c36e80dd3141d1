//! Transport layer: HTTP and wire-format details (serialization/deserialization).

mod balance;
mod batch;
mod send_sms;
mod status;
mod text;

use url::form_urlencoded;

pub use balance::decode_balance_response;
pub use batch::{BATCH_ENCODING_PARAM, decode_batch_response, encode_batch_body};
pub use send_sms::{SEND_CHARSET_PARAM, decode_send_sms_response, encode_send_sms_form};
pub use status::{decode_status_response, encode_status_form};
pub use text::{GatewayReply, ParseError, Rejection, decode_utf8};

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
pub const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Percent-encode form params; non-ASCII text is encoded from its UTF-8 bytes.
pub fn encode_form(params: &[(String, String)]) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}
