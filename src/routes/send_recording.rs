use crate::{
    data::submission::SubmissionBody,
    error::{MissingConfigurationSnafu, NotifierError, NotifierResult},
    message::recording_message,
    state::NotifierState,
};
use axum::{
    Json,
    extract::{FromRequest, Request, State},
    http::StatusCode,
};
use serde::Serialize;
use snafu::OptionExt;

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SendRecordingResponse {
    pub success: bool,
    pub message: &'static str,
    pub message_id: Option<i64>,
}

pub async fn post_send_recording(
    State(state): State<NotifierState>,
    req: Request,
) -> NotifierResult<Json<SendRecordingResponse>> {
    //checked before the body so a misconfigured deployment always says so
    let credentials = state
        .telegram_credentials()
        .context(MissingConfigurationSnafu)?;

    let payload = SubmissionBody::from_request(req, &state)
        .await?
        .into_payload()?;
    let text = recording_message(&payload);

    let sent = state.sender().send_message(&credentials, &text).await?;

    info!(
        student = %payload.student_info.first_name,
        set = %payload.set_name,
        message_id = ?sent.message_id,
        "Sent recording info to Telegram"
    );

    Ok(Json(SendRecordingResponse {
        success: true,
        message: "Recording information sent successfully",
        message_id: sent.message_id,
    }))
}

pub async fn options_preflight() -> StatusCode {
    StatusCode::OK
}

pub async fn method_not_allowed() -> NotifierError {
    NotifierError::MethodNotAllowed
}
