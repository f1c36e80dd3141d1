//! Client layer: orchestrates transport calls and maps transport ↔ domain.

mod credentials;

use std::error::Error as StdError;
use std::sync::Arc;

use tracing::{debug, warn};
use url::Url;

use crate::domain::{
    BalanceResponse, BatchSendResponse, SendBatch, SendSms, SendSmsResponse, StatusCode,
    StatusQuery, StatusResponse, ValidationError,
};
use crate::transport::{self, GatewayReply, ParseError, Rejection};

pub use credentials::{Credentials, PASSWORD_ENV, USERNAME_ENV};

const DEFAULT_BASE_URL: &str = "https://smsapi.mitake.com.tw";
const SEND_PATH: &str = "api/mtk/SmSend";
const BATCH_PATH: &str = "api/mtk/SmBulkSend";
const BALANCE_PATH: &str = "api/mtk/SmQuery";
const STATUS_PATH: &str = "api/mtk/SmQueryGet";

type BoxError = Box<dyn StdError + Send + Sync>;

#[derive(Debug, Clone)]
struct HttpRequest {
    url: Url,
    content_type: &'static str,
    body: Vec<u8>,
}

impl HttpRequest {
    fn form(url: Url, params: &[(String, String)]) -> Self {
        Self {
            url,
            content_type: transport::FORM_CONTENT_TYPE,
            body: transport::encode_form(params).into_bytes(),
        }
    }

    fn text(url: Url, body: String) -> Self {
        Self {
            url,
            content_type: transport::TEXT_CONTENT_TYPE,
            body: body.into_bytes(),
        }
    }
}

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    body: Vec<u8>,
}

trait HttpTransport: Send + Sync {
    fn post(&self, request: HttpRequest) -> Result<HttpResponse, BoxError>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport for ReqwestTransport {
    fn post(&self, request: HttpRequest) -> Result<HttpResponse, BoxError> {
        let response = self
            .client
            .post(request.url)
            .header(reqwest::header::CONTENT_TYPE, request.content_type)
            .body(request.body)
            .send()?;
        let status = response.status().as_u16();
        let body = response.bytes()?.to_vec();
        Ok(HttpResponse { status, body })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Broad category of a [`MitakeError`].
pub enum ErrorKind {
    /// Credentials missing or refused by the gateway.
    Authentication,
    /// Transport failure, HTTP failure, gateway refusal, or an unreadable reply.
    Api,
    /// Invalid input or configuration caught before any request was sent.
    Other,
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`MitakeClient`].
///
/// Every failure is one of these variants, so callers can match broadly through
/// [`MitakeError::kind`] or on the exact variant. API-category variants keep the
/// HTTP status and raw body where one was received.
pub enum MitakeError {
    /// Credentials are missing, or the gateway refused them.
    #[error("authentication failed: {message}")]
    Authentication {
        message: String,
        status_code: Option<StatusCode>,
    },

    /// HTTP client / transport failure (DNS, TLS, connection reset, etc).
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),

    /// Non-successful HTTP status code returned by the server.
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: u16, body: Option<String> },

    /// The gateway answered with a failure status code.
    #[error("gateway rejected request with status {status_code}{}", describe(.status_code, .status_text))]
    Gateway {
        status_code: StatusCode,
        status_text: Option<String>,
        status: u16,
        body: String,
    },

    /// Response body could not be understood.
    #[error("malformed gateway response: {source}")]
    MalformedResponse {
        #[source]
        source: BoxError,
        status: u16,
        body: String,
    },

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The configured base URL cannot be used to build endpoint URLs.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
}

impl MitakeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Authentication { .. } => ErrorKind::Authentication,
            Self::Transport(_)
            | Self::HttpStatus { .. }
            | Self::Gateway { .. }
            | Self::MalformedResponse { .. } => ErrorKind::Api,
            Self::Validation(_) | Self::InvalidBaseUrl(_) => ErrorKind::Other,
        }
    }

    pub fn is_authentication(&self) -> bool {
        self.kind() == ErrorKind::Authentication
    }

    pub fn is_api(&self) -> bool {
        self.kind() == ErrorKind::Api
    }

    /// HTTP status of the response that caused this error, if one was received.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. }
            | Self::Gateway { status, .. }
            | Self::MalformedResponse { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw response body that caused this error, if there was one.
    pub fn raw_body(&self) -> Option<&str> {
        match self {
            Self::HttpStatus { body, .. } => body.as_deref(),
            Self::Gateway { body, .. } | Self::MalformedResponse { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Gateway status code behind this error, if the gateway sent one.
    pub fn status_code(&self) -> Option<&StatusCode> {
        match self {
            Self::Authentication { status_code, .. } => status_code.as_ref(),
            Self::Gateway { status_code, .. } => Some(status_code),
            _ => None,
        }
    }
}

fn describe(status_code: &StatusCode, status_text: &Option<String>) -> String {
    match (status_text, status_code.known()) {
        (Some(text), _) => format!(" ({text})"),
        (None, Some(known)) => format!(" ({})", known.description()),
        (None, None) => String::new(),
    }
}

#[derive(Debug, Clone)]
struct Endpoints {
    send: Url,
    batch: Url,
    balance: Url,
    status: Url,
}

impl Endpoints {
    fn new(base_url: &str) -> Result<Self, url::ParseError> {
        let mut base = Url::parse(base_url.trim())?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let mut send = base.join(SEND_PATH)?;
        send.query_pairs_mut()
            .append_pair(transport::SEND_CHARSET_PARAM.0, transport::SEND_CHARSET_PARAM.1);

        Ok(Self {
            send,
            batch: base.join(BATCH_PATH)?,
            balance: base.join(BALANCE_PATH)?,
            status: base.join(STATUS_PATH)?,
        })
    }
}

#[derive(Debug, Clone)]
/// Builder for [`MitakeClient`].
///
/// Use this when you need to customize the base URL or user-agent.
pub struct MitakeClientBuilder {
    credentials: Credentials,
    base_url: String,
    user_agent: Option<String>,
}

impl MitakeClientBuilder {
    /// Create a builder with the default base URL and no user-agent override.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            base_url: DEFAULT_BASE_URL.to_owned(),
            user_agent: None,
        }
    }

    /// Start from credentials found in `MITAKE_USERNAME` / `MITAKE_PASSWORD`.
    pub fn from_env() -> Result<Self, MitakeError> {
        Ok(Self::new(Credentials::from_env()?))
    }

    /// Override the gateway base URL (default `https://smsapi.mitake.com.tw`).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build a [`MitakeClient`].
    pub fn build(self) -> Result<MitakeClient, MitakeError> {
        let endpoints = Endpoints::new(&self.base_url)?;

        let mut builder = reqwest::blocking::Client::builder();
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }
        let client = builder
            .build()
            .map_err(|err| MitakeError::Transport(Box::new(err)))?;

        Ok(MitakeClient {
            credentials: self.credentials,
            endpoints,
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

#[derive(Clone)]
/// Blocking Mitake SMS gateway client.
///
/// Each method performs exactly one HTTP round trip. The client only holds
/// read-only state, so a single instance can be shared between threads.
pub struct MitakeClient {
    credentials: Credentials,
    endpoints: Endpoints,
    http: Arc<dyn HttpTransport>,
}

impl MitakeClient {
    /// Create a client using the default base URL.
    ///
    /// For more customization, use [`MitakeClient::builder`].
    pub fn new(credentials: Credentials) -> Result<Self, MitakeError> {
        MitakeClientBuilder::new(credentials).build()
    }

    /// Create a client from `MITAKE_USERNAME` / `MITAKE_PASSWORD`.
    pub fn from_env() -> Result<Self, MitakeError> {
        MitakeClientBuilder::from_env()?.build()
    }

    /// Start building a client with custom settings.
    pub fn builder(credentials: Credentials) -> MitakeClientBuilder {
        MitakeClientBuilder::new(credentials)
    }

    /// Send one message.
    ///
    /// Errors:
    /// - [`MitakeError::Authentication`] when the gateway refuses the credentials,
    /// - [`MitakeError::Gateway`] for any other failure status code,
    /// - [`MitakeError::HttpStatus`] for non-2xx HTTP responses,
    /// - [`MitakeError::MalformedResponse`] when the reply has no status code.
    pub fn send_sms(&self, request: SendSms) -> Result<SendSmsResponse, MitakeError> {
        const OPERATION: &str = "send_sms";

        let mut params = Vec::<(String, String)>::new();
        self.credentials.push_form_params(&mut params);
        params.extend(transport::encode_send_sms_form(&request));

        debug!(
            operation = OPERATION,
            scheduled = request.options().send_time.is_some(),
            "posting message"
        );
        let received = self.exchange(
            OPERATION,
            HttpRequest::form(self.endpoints.send.clone(), &params),
        )?;

        let reply = transport::decode_send_sms_response(&received.text)
            .map_err(|err| received.malformed(OPERATION, err))?;
        received.settle(OPERATION, reply)
    }

    /// Send several messages in one request.
    ///
    /// Results come back in submission order. Per-message failures (for example an
    /// invalid number) are reported in the results, not as errors. A reply whose
    /// number of entries differs from the batch size is a
    /// [`MitakeError::MalformedResponse`] carrying the raw body.
    pub fn send_batch_sms(&self, request: SendBatch) -> Result<BatchSendResponse, MitakeError> {
        const OPERATION: &str = "send_batch_sms";

        let mut url = self.endpoints.batch.clone();
        self.credentials.push_query_params(&mut url);
        url.query_pairs_mut().append_pair(
            transport::BATCH_ENCODING_PARAM.0,
            transport::BATCH_ENCODING_PARAM.1,
        );

        debug!(
            operation = OPERATION,
            messages = request.len(),
            "posting batch"
        );
        let received = self.exchange(
            OPERATION,
            HttpRequest::text(url, transport::encode_batch_body(&request)),
        )?;

        let reply = transport::decode_batch_response(&request, &received.text)
            .map_err(|err| received.malformed(OPERATION, err))?;
        received.settle(OPERATION, reply)
    }

    /// Query the remaining account points.
    pub fn query_account_balance(&self) -> Result<BalanceResponse, MitakeError> {
        const OPERATION: &str = "query_account_balance";

        let mut params = Vec::<(String, String)>::new();
        self.credentials.push_form_params(&mut params);

        debug!(operation = OPERATION, "querying balance");
        let received = self.exchange(
            OPERATION,
            HttpRequest::form(self.endpoints.balance.clone(), &params),
        )?;

        let reply = transport::decode_balance_response(&received.text)
            .map_err(|err| received.malformed(OPERATION, err))?;
        received.settle(OPERATION, reply)
    }

    /// Query delivery status for previously sent message ids.
    ///
    /// Ids the gateway has no record of are absent from the result map.
    pub fn query_message_status(
        &self,
        request: StatusQuery,
    ) -> Result<StatusResponse, MitakeError> {
        const OPERATION: &str = "query_message_status";

        let mut params = Vec::<(String, String)>::new();
        self.credentials.push_form_params(&mut params);
        params.extend(transport::encode_status_form(&request));

        debug!(
            operation = OPERATION,
            ids = request.message_ids().len(),
            "querying message status"
        );
        let received = self.exchange(
            OPERATION,
            HttpRequest::form(self.endpoints.status.clone(), &params),
        )?;

        let reply = transport::decode_status_response(&request, &received.text)
            .map_err(|err| received.malformed(OPERATION, err))?;
        received.settle(OPERATION, reply)
    }

    fn exchange(
        &self,
        operation: &'static str,
        request: HttpRequest,
    ) -> Result<ReceivedBody, MitakeError> {
        let response = self.http.post(request).map_err(|err| {
            warn!(operation, error = %err, "request failed");
            MitakeError::Transport(err)
        })?;

        debug!(
            operation,
            status = response.status,
            bytes = response.body.len(),
            "response received"
        );

        if !(200..=299).contains(&response.status) {
            let body = String::from_utf8_lossy(&response.body).into_owned();
            let body = if body.trim().is_empty() {
                None
            } else {
                Some(body)
            };
            warn!(operation, status = response.status, "unexpected HTTP status");
            return Err(MitakeError::HttpStatus {
                status: response.status,
                body,
            });
        }

        match transport::decode_utf8(&response.body) {
            Ok(text) => Ok(ReceivedBody {
                status: response.status,
                text: text.to_owned(),
            }),
            Err(err) => {
                let received = ReceivedBody {
                    status: response.status,
                    text: String::from_utf8_lossy(&response.body).into_owned(),
                };
                Err(received.malformed(operation, err))
            }
        }
    }
}

/// A 2xx response body decoded as text.
struct ReceivedBody {
    status: u16,
    text: String,
}

impl ReceivedBody {
    fn malformed(&self, operation: &'static str, err: ParseError) -> MitakeError {
        warn!(operation, status = self.status, error = %err, "malformed gateway response");
        MitakeError::MalformedResponse {
            source: Box::new(err),
            status: self.status,
            body: self.text.clone(),
        }
    }

    fn settle<T>(&self, operation: &'static str, reply: GatewayReply<T>) -> Result<T, MitakeError> {
        let Rejection {
            status_code,
            status_text,
        } = match reply {
            GatewayReply::Accepted(value) => return Ok(value),
            GatewayReply::Rejected(rejection) => rejection,
        };

        warn!(operation, status_code = %status_code, "gateway rejected request");

        if status_code.is_auth_error() {
            let message = status_text
                .or_else(|| status_code.known().map(|k| k.description().to_owned()))
                .unwrap_or_else(|| format!("status code {status_code}"));
            return Err(MitakeError::Authentication {
                message,
                status_code: Some(status_code),
            });
        }

        Err(MitakeError::Gateway {
            status_code,
            status_text,
            status: self.status,
            body: self.text.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use url::form_urlencoded;

    use crate::domain::{
        ClientId, GatewayTime, MessageId, MessageText, RawPhoneNumber, SendOptions,
    };

    use super::*;

    #[derive(Debug, Clone)]
    struct FakeTransport {
        state: Arc<Mutex<FakeTransportState>>,
    }

    #[derive(Debug)]
    struct FakeTransportState {
        last_request: Option<HttpRequest>,
        calls: usize,
        response: Result<(u16, Vec<u8>), String>,
    }

    impl FakeTransport {
        fn new(response_status: u16, response_body: impl Into<Vec<u8>>) -> Self {
            Self::with_response(Ok((response_status, response_body.into())))
        }

        fn failing(message: &str) -> Self {
            Self::with_response(Err(message.to_owned()))
        }

        fn with_response(response: Result<(u16, Vec<u8>), String>) -> Self {
            Self {
                state: Arc::new(Mutex::new(FakeTransportState {
                    last_request: None,
                    calls: 0,
                    response,
                })),
            }
        }

        fn last_request(&self) -> HttpRequest {
            let state = self.state.lock().unwrap();
            state.last_request.clone().expect("no request was sent")
        }

        fn calls(&self) -> usize {
            self.state.lock().unwrap().calls
        }
    }

    impl HttpTransport for FakeTransport {
        fn post(&self, request: HttpRequest) -> Result<HttpResponse, BoxError> {
            let mut state = self.state.lock().unwrap();
            state.calls += 1;
            state.last_request = Some(request);
            match &state.response {
                Ok((status, body)) => Ok(HttpResponse {
                    status: *status,
                    body: body.clone(),
                }),
                Err(message) => Err(message.clone().into()),
            }
        }
    }

    fn form_params(request: &HttpRequest) -> Vec<(String, String)> {
        form_urlencoded::parse(&request.body)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    fn query_params(request: &HttpRequest) -> Vec<(String, String)> {
        request
            .url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    fn assert_param(params: &[(String, String)], key: &str, value: &str) {
        assert!(
            params.iter().any(|(k, v)| k == key && v == value),
            "missing param {key}={value}; got: {params:?}"
        );
    }

    fn make_client(transport: FakeTransport) -> MitakeClient {
        MitakeClient {
            credentials: Credentials::new("test_user", "test_pass").unwrap(),
            endpoints: Endpoints::new("https://example.invalid").unwrap(),
            http: Arc::new(transport),
        }
    }

    fn sms(text: &str) -> SendSms {
        SendSms::new(
            RawPhoneNumber::new("0912345678").unwrap(),
            MessageText::new(text).unwrap(),
        )
    }

    #[test]
    fn send_sms_posts_credentials_and_utf8_form() {
        let transport = FakeTransport::new(
            200,
            "[1]\r\nmsgid=1010079522\r\nstatuscode=1\r\nAccountPoint=98\r\n",
        );
        let client = make_client(transport.clone());

        let request = SendSms::with_options(
            RawPhoneNumber::new("0912345678").unwrap(),
            MessageText::new("你好，我是小海！🎉").unwrap(),
            SendOptions {
                client_id: Some(ClientId::new("msg123").unwrap()),
                send_time: Some(GatewayTime::parse("2024-12-31 23:59:00").unwrap()),
                ..Default::default()
            },
        );
        let response = client.send_sms(request).unwrap();
        assert_eq!(response.status_code, StatusCode::new("1"));
        assert_eq!(response.msgid.unwrap().as_str(), "1010079522");
        assert_eq!(response.account_points, Some(98));

        let sent = transport.last_request();
        assert_eq!(sent.url.path(), "/api/mtk/SmSend");
        assert_eq!(sent.content_type, "application/x-www-form-urlencoded");
        assert_param(&query_params(&sent), "CharsetURL", "UTF8");

        let params = form_params(&sent);
        assert_param(&params, "username", "test_user");
        assert_param(&params, "password", "test_pass");
        assert_param(&params, "dstaddr", "0912345678");
        assert_param(&params, "smbody", "你好，我是小海！🎉");
        assert_param(&params, "clientid", "msg123");
        assert_param(&params, "dlvtime", "20241231235900");
        assert!(!params.iter().any(|(k, _)| k == "vldtime"));
    }

    #[test]
    fn send_sms_maps_auth_status_to_authentication_error() {
        let transport = FakeTransport::new(200, "[1]\nstatuscode=e\nError=帳號、密碼錯誤\n");
        let client = make_client(transport);

        let err = client.send_sms(sms("hello")).unwrap_err();
        match &err {
            MitakeError::Authentication {
                message,
                status_code,
            } => {
                assert_eq!(message, "帳號、密碼錯誤");
                assert_eq!(status_code.as_ref().map(StatusCode::as_str), Some("e"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.kind(), ErrorKind::Authentication);
    }

    #[test]
    fn send_sms_maps_failure_status_to_gateway_error() {
        let body = "[1]\nstatuscode=v\nError=無效的手機號碼\n";
        let client = make_client(FakeTransport::new(200, body));

        let err = client.send_sms(sms("hello")).unwrap_err();
        match &err {
            MitakeError::Gateway {
                status_code,
                status_text,
                status,
                body: raw,
            } => {
                assert_eq!(status_code.as_str(), "v");
                assert_eq!(status_text.as_deref(), Some("無效的手機號碼"));
                assert_eq!(*status, 200);
                assert_eq!(raw, body);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.is_api());
        assert_eq!(
            err.to_string(),
            "gateway rejected request with status v (無效的手機號碼)"
        );
    }

    #[test]
    fn send_sms_maps_non_success_http_status() {
        let client = make_client(FakeTransport::new(500, "oops"));

        let err = client.send_sms(sms("hello")).unwrap_err();
        assert!(matches!(
            err,
            MitakeError::HttpStatus {
                status: 500,
                body: Some(_)
            }
        ));
        assert!(err.is_api());
        assert_eq!(err.http_status(), Some(500));
        assert_eq!(err.raw_body(), Some("oops"));
    }

    #[test]
    fn send_sms_maps_empty_http_body_to_none() {
        let client = make_client(FakeTransport::new(503, "   "));

        let err = client.send_sms(sms("hello")).unwrap_err();
        assert!(matches!(
            err,
            MitakeError::HttpStatus {
                status: 503,
                body: None
            }
        ));
    }

    #[test]
    fn send_sms_maps_connection_failure_to_transport_error() {
        let client = make_client(FakeTransport::failing("connection refused"));

        let err = client.send_sms(sms("hello")).unwrap_err();
        assert!(matches!(err, MitakeError::Transport(_)));
        assert!(err.is_api());
        assert_eq!(err.http_status(), None);
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn send_sms_maps_unparseable_body_to_malformed_response() {
        let client = make_client(FakeTransport::new(200, "Plain response"));

        let err = client.send_sms(sms("hello")).unwrap_err();
        assert!(matches!(
            err,
            MitakeError::MalformedResponse { status: 200, .. }
        ));
        assert_eq!(err.raw_body(), Some("Plain response"));
        assert!(err.is_api());
    }

    #[test]
    fn send_sms_rejects_non_utf8_body() {
        let client = make_client(FakeTransport::new(200, vec![0xb1, 0x60, 0xff]));

        let err = client.send_sms(sms("hello")).unwrap_err();
        assert!(matches!(err, MitakeError::MalformedResponse { .. }));
    }

    #[test]
    fn send_sms_accepts_bom_prefixed_body() {
        let client = make_client(FakeTransport::new(
            200,
            "\u{feff}[1]\nmsgid=1010079522\nstatuscode=1\n",
        ));
        let response = client.send_sms(sms("hello")).unwrap();
        assert!(response.status_code.is_accepted());
    }

    fn batch() -> SendBatch {
        SendBatch::new(vec![
            sms("你好！這是第一則訊息"),
            SendSms::with_options(
                RawPhoneNumber::new("0987654321").unwrap(),
                MessageText::new("你好！這是第二則訊息").unwrap(),
                SendOptions {
                    client_id: Some(ClientId::new("msg2").unwrap()),
                    ..Default::default()
                },
            ),
        ])
        .unwrap()
    }

    #[test]
    fn send_batch_posts_text_body_and_returns_results_in_order() {
        let transport = FakeTransport::new(
            200,
            "[1]\r\nmsgid=1010079522\r\nstatuscode=1\r\n[msg2]\r\nmsgid=1010079523\r\nstatuscode=1\r\nAccountPoint=96\r\n",
        );
        let client = make_client(transport.clone());

        let response = client.send_batch_sms(batch()).unwrap();
        assert_eq!(response.results.len(), 2);
        assert_eq!(response.results[0].client_id.as_str(), "1");
        assert_eq!(response.results[1].client_id.as_str(), "msg2");
        assert_eq!(
            response.results[1].msgid.as_ref().map(MessageId::as_str),
            Some("1010079523")
        );
        assert_eq!(response.account_points, Some(96));

        let sent = transport.last_request();
        assert_eq!(sent.url.path(), "/api/mtk/SmBulkSend");
        assert_eq!(sent.content_type, "text/plain; charset=utf-8");
        let query = query_params(&sent);
        assert_param(&query, "username", "test_user");
        assert_param(&query, "password", "test_pass");
        assert_param(&query, "Encoding_PostIn", "UTF8");

        let body = String::from_utf8(sent.body).unwrap();
        assert_eq!(
            body,
            "1$$0912345678$$$$$$$$$$你好！這是第一則訊息\nmsg2$$0987654321$$$$$$$$$$你好！這是第二則訊息"
        );
    }

    #[test]
    fn send_batch_count_mismatch_is_api_error_with_raw_body() {
        let body = "[1]\nmsgid=1010079522\nstatuscode=1\n";
        let client = make_client(FakeTransport::new(200, body));

        let err = client.send_batch_sms(batch()).unwrap_err();
        assert!(matches!(err, MitakeError::MalformedResponse { .. }));
        assert!(err.is_api());
        assert_eq!(err.raw_body(), Some(body));
    }

    #[test]
    fn send_batch_refused_credentials_is_authentication_error() {
        let client = make_client(FakeTransport::new(200, "statuscode=e\n"));

        let err = client.send_batch_sms(batch()).unwrap_err();
        assert!(err.is_authentication());
        assert_eq!(err.status_code().map(StatusCode::as_str), Some("e"));
        assert_eq!(
            err.to_string(),
            "authentication failed: invalid username or password"
        );
    }

    #[test]
    fn query_account_balance_posts_credentials() {
        let transport = FakeTransport::new(200, "AccountPoint=1000\n");
        let client = make_client(transport.clone());

        let balance = client.query_account_balance().unwrap();
        assert_eq!(balance.account_points, 1000);

        let sent = transport.last_request();
        assert_eq!(sent.url.path(), "/api/mtk/SmQuery");
        assert_eq!(
            form_params(&sent),
            vec![
                ("username".to_owned(), "test_user".to_owned()),
                ("password".to_owned(), "test_pass".to_owned()),
            ]
        );
    }

    #[test]
    fn query_message_status_posts_joined_ids() {
        let transport = FakeTransport::new(
            200,
            "1010079522\t4\t20240101120000\n1010079523\t1\t20240101120500\n",
        );
        let client = make_client(transport.clone());
        let request = StatusQuery::new(vec![
            MessageId::new("1010079522").unwrap(),
            MessageId::new("1010079523").unwrap(),
        ])
        .unwrap();

        let response = client.query_message_status(request).unwrap();
        assert_eq!(response.messages.len(), 2);
        assert!(
            response.messages[&MessageId::new("1010079522").unwrap()]
                .status_code
                .is_delivered()
        );

        let sent = transport.last_request();
        assert_eq!(sent.url.path(), "/api/mtk/SmQueryGet");
        assert_param(&form_params(&sent), "msgid", "1010079522,1010079523");
        assert_eq!(transport.calls(), 1);
    }

    #[test]
    fn validation_and_config_errors_are_other_kind() {
        let err = MitakeError::from(ValidationError::Empty { field: "smbody" });
        assert_eq!(err.kind(), ErrorKind::Other);

        let err = MitakeClient::builder(Credentials::new("user", "pass").unwrap())
            .base_url("not a url")
            .build()
            .err()
            .expect("invalid base url must fail");
        assert!(matches!(err, MitakeError::InvalidBaseUrl(_)));
        assert_eq!(err.kind(), ErrorKind::Other);
    }

    #[test]
    fn endpoints_keep_base_path_prefix() {
        let endpoints = Endpoints::new("https://example.invalid/proxy").unwrap();
        assert_eq!(
            endpoints.send.as_str(),
            "https://example.invalid/proxy/api/mtk/SmSend?CharsetURL=UTF8"
        );
        assert_eq!(
            endpoints.status.as_str(),
            "https://example.invalid/proxy/api/mtk/SmQueryGet"
        );

        let endpoints = Endpoints::new(DEFAULT_BASE_URL).unwrap();
        assert_eq!(
            endpoints.batch.as_str(),
            "https://smsapi.mitake.com.tw/api/mtk/SmBulkSend"
        );
    }

    #[test]
    fn client_is_shareable_between_threads() {
        fn assert_send_sync<T: Send + Sync + Clone>() {}
        assert_send_sync::<MitakeClient>();
    }
}
