use axum::{
    Json,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::{BytesRejection, FormRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use snafu::Snafu;
use std::string::FromUtf8Error;

pub type NotifierResult<T> = Result<T, NotifierError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum NotifierError {
    #[snafu(display("Unable to retrieve env var `{}`", name))]
    BadEnvVar {
        source: dotenvy::Error,
        name: &'static str,
    },
    #[snafu(display("Unable to parse Telegram API url {:?}", original))]
    ParseApiUrl {
        source: url::ParseError,
        original: String,
    },
    #[snafu(display("Unable to build HTTP client"))]
    BuildHttpClient { source: reqwest::Error },
    #[snafu(display("Method not allowed"))]
    MethodNotAllowed,
    #[snafu(display(
        "Server configuration error: TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID must be set"
    ))]
    MissingConfiguration,
    #[snafu(display("Unable to read request body"))]
    ReadBody { source: BytesRejection },
    #[snafu(display("Invalid JSON in request body"))]
    InvalidJson { source: serde_json::Error },
    #[snafu(display("Invalid JSON in request body"))]
    InvalidUtf8 { source: FromUtf8Error },
    #[snafu(display("Invalid JSON in request body"))]
    InvalidForm { source: FormRejection },
    #[snafu(display("Invalid form data in request body"))]
    Multipart { source: MultipartError },
    #[snafu(display("Invalid form data in request body"))]
    MultipartRejected { source: MultipartRejection },
    #[snafu(display("Invalid JSON in request body"))]
    MissingFormField { name: &'static str },
    #[snafu(display("Failed to send message to Telegram"))]
    TelegramRejected { description: Option<String> },
    #[snafu(display("Internal server error"))]
    SendRequest { source: reqwest::Error },
    #[snafu(display("Internal server error"))]
    DecodeReply { source: reqwest::Error },
}

impl NotifierError {
    pub fn status_code(&self) -> StatusCode {
        const ISE: StatusCode = StatusCode::INTERNAL_SERVER_ERROR; //internal server error
        const BI: StatusCode = StatusCode::BAD_REQUEST; //bad input

        match self {
            Self::BadEnvVar { .. } | Self::ParseApiUrl { .. } | Self::BuildHttpClient { .. } => {
                ISE
            }
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::MissingConfiguration => ISE,
            Self::ReadBody { source } => source.status(),
            Self::Multipart { source } => source.status(),
            Self::MultipartRejected { source } => source.status(),
            Self::InvalidForm { source } if source.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            Self::InvalidJson { .. }
            | Self::InvalidUtf8 { .. }
            | Self::InvalidForm { .. }
            | Self::MissingFormField { .. } => BI,
            Self::TelegramRejected { .. } => ISE,
            Self::SendRequest { .. } | Self::DecodeReply { .. } => ISE,
        }
    }

    fn details(&self) -> Option<String> {
        match self {
            Self::InvalidJson { source } => Some(source.to_string()),
            Self::InvalidUtf8 { source } => Some(source.to_string()),
            Self::InvalidForm { source } => Some(source.body_text()),
            Self::Multipart { source } => Some(source.body_text()),
            Self::MultipartRejected { source } => Some(source.body_text()),
            Self::MissingFormField { name } => Some(format!("missing field `{name}`")),
            Self::ReadBody { source } => Some(source.body_text()),
            Self::TelegramRejected { description } => description.clone(),
            //reqwest errors have their url stripped before they get here, it contains the bot token
            Self::SendRequest { source } | Self::DecodeReply { source } => Some(source.to_string()),
            _ => None,
        }
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub setup_required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telegram_error: Option<bool>,
}

impl From<&NotifierError> for ErrorBody {
    fn from(value: &NotifierError) -> Self {
        Self {
            error: value.to_string(),
            details: value.details(),
            setup_required: matches!(value, NotifierError::MissingConfiguration).then_some(true),
            telegram_error: matches!(value, NotifierError::TelegramRejected { .. })
                .then_some(true),
        }
    }
}

impl IntoResponse for NotifierError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        if status_code.is_server_error() {
            error!(?self, "Error!");
        } else {
            warn!(?self, "Rejected request");
        }

        (status_code, Json(ErrorBody::from(&self))).into_response()
    }
}
