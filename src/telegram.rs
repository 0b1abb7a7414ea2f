use crate::{
    config::TelegramCredentials,
    error::{
        BuildHttpClientSnafu, DecodeReplySnafu, NotifierResult, SendRequestSnafu,
        TelegramRejectedSnafu,
    },
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use snafu::{ResultExt, ensure};
use std::fmt::Debug;
use url::Url;

/// Something that can deliver a chat message. The service only ever uses [`TelegramClient`].
#[async_trait]
pub trait MessageSender: Debug + Send + Sync {
    async fn send_message(
        &self,
        credentials: &TelegramCredentials,
        text: &str,
    ) -> NotifierResult<SentMessage>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentMessage {
    pub message_id: Option<i64>,
}

#[derive(Serialize, Debug)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
}

#[derive(Deserialize, Debug)]
struct TelegramReply {
    ok: bool,
    result: Option<TelegramMessage>,
    description: Option<String>,
}

#[derive(Deserialize, Debug)]
struct TelegramMessage {
    message_id: i64,
}

#[derive(Clone, Debug)]
pub struct TelegramClient {
    http: reqwest::Client,
    api_url: Url,
}

impl TelegramClient {
    pub fn new(api_url: Url) -> NotifierResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context(BuildHttpClientSnafu)?;

        Ok(Self { http, api_url })
    }

    fn send_message_url(&self, bot_token: &str) -> String {
        format!(
            "{}/bot{bot_token}/sendMessage",
            self.api_url.as_str().trim_end_matches('/')
        )
    }
}

#[async_trait]
impl MessageSender for TelegramClient {
    async fn send_message(
        &self,
        credentials: &TelegramCredentials,
        text: &str,
    ) -> NotifierResult<SentMessage> {
        let body = SendMessageRequest {
            chat_id: credentials.chat_id(),
            text,
            parse_mode: "HTML",
        };

        // telegram answers failures with a non-2xx status *and* an `ok: false` body, so the
        // status code is ignored in favour of the body
        let reply: TelegramReply = self
            .http
            .post(self.send_message_url(credentials.bot_token()))
            .json(&body)
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .context(SendRequestSnafu)?
            .json()
            .await
            .map_err(reqwest::Error::without_url)
            .context(DecodeReplySnafu)?;

        ensure!(
            reply.ok,
            TelegramRejectedSnafu {
                description: reply.description,
            }
        );

        Ok(SentMessage {
            message_id: reply.result.map(|message| message.message_id),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::parse_api_url, error::NotifierError};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_json, method, path},
    };

    const TOKEN: &str = "123456:test-token";

    fn client_for(server: &MockServer) -> TelegramClient {
        TelegramClient::new(parse_api_url(server.uri()).expect("mock uri parses"))
            .expect("client builds")
    }

    fn credentials() -> TelegramCredentials {
        TelegramCredentials::new(TOKEN, "-1001234")
    }

    #[tokio::test]
    async fn posts_html_message_and_returns_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("/bot{TOKEN}/sendMessage")))
            .and(body_json(json!({
                "chat_id": "-1001234",
                "text": "hello",
                "parse_mode": "HTML",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": { "message_id": 42, "chat": { "id": -1001234 } },
            })))
            .expect(1)
            .mount(&server)
            .await;

        let sent = client_for(&server)
            .send_message(&credentials(), "hello")
            .await
            .expect("message sends");

        assert_eq!(sent.message_id, Some(42));
    }

    #[tokio::test]
    async fn provider_rejection_keeps_description() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "ok": false,
                "error_code": 400,
                "description": "bad chat id",
            })))
            .mount(&server)
            .await;

        let error = client_for(&server)
            .send_message(&credentials(), "hello")
            .await
            .expect_err("telegram said no");

        match error {
            NotifierError::TelegramRejected { description } => {
                assert_eq!(description.as_deref(), Some("bad chat id"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn undecodable_reply_is_internal() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
            .mount(&server)
            .await;

        let error = client_for(&server)
            .send_message(&credentials(), "hello")
            .await
            .expect_err("reply is not json");

        assert!(matches!(error, NotifierError::DecodeReply { .. }));
    }

    #[tokio::test]
    async fn network_errors_never_leak_the_token() {
        //nothing listens on port 1
        let api_url = parse_api_url("http://127.0.0.1:1".into()).expect("url parses");

        let error = TelegramClient::new(api_url)
            .expect("client builds")
            .send_message(&credentials(), "hello")
            .await
            .expect_err("nothing is listening");

        match &error {
            NotifierError::SendRequest { source } => {
                assert!(source.url().is_none());
                assert!(!source.to_string().contains("test-token"));
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(!format!("{error:?}").contains("test-token"));
    }
}
