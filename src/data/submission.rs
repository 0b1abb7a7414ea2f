use crate::{
    data::student::{StudentInfo, SubmissionPayload},
    error::{
        InvalidFormSnafu, InvalidJsonSnafu, InvalidUtf8Snafu, MissingFormFieldSnafu,
        MultipartRejectedSnafu, MultipartSnafu, NotifierError, NotifierResult, ReadBodySnafu,
    },
};
use axum::{
    Form,
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
};
use serde::Deserialize;
use snafu::{OptionExt, ResultExt};

/// `studentInfo` either arrives as a nested object, or as a string holding the JSON of one
/// (form posts can only carry strings).
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum StudentInfoField {
    Nested(StudentInfo),
    Encoded(String),
}

impl StudentInfoField {
    pub fn decode(self) -> NotifierResult<StudentInfo> {
        match self {
            Self::Nested(info) => Ok(info),
            Self::Encoded(json) => serde_json::from_str(&json).context(InvalidJsonSnafu),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionFields {
    pub student_info: StudentInfoField,
    pub set_name: String,
}

impl SubmissionFields {
    pub fn into_payload(self) -> NotifierResult<SubmissionPayload> {
        Ok(SubmissionPayload {
            student_info: self.student_info.decode()?,
            set_name: self.set_name,
        })
    }
}

/// The shapes a submission body can arrive in.
#[derive(Debug)]
pub enum SubmissionBody {
    /// JSON text, eg. a `text/plain` post.
    Text(String),
    /// Raw body of unknown content type, expected to be UTF-8 JSON.
    Bytes(Bytes),
    /// Fields that were already structured by the transport.
    Fields(SubmissionFields),
}

impl SubmissionBody {
    pub fn into_payload(self) -> NotifierResult<SubmissionPayload> {
        match self {
            Self::Text(text) => Self::parse_json(&text),
            Self::Bytes(bytes) => {
                let text = String::from_utf8(bytes.to_vec()).context(InvalidUtf8Snafu)?;
                Self::parse_json(&text)
            }
            Self::Fields(fields) => fields.into_payload(),
        }
    }

    fn parse_json(text: &str) -> NotifierResult<SubmissionPayload> {
        serde_json::from_str::<SubmissionFields>(text)
            .context(InvalidJsonSnafu)?
            .into_payload()
    }

    async fn from_multipart(mut multipart: Multipart) -> NotifierResult<SubmissionFields> {
        let mut student_info = None;
        let mut set_name = None;

        while let Some(field) = multipart.next_field().await.context(MultipartSnafu)? {
            let name = field.name().map(str::to_owned);
            match name.as_deref() {
                Some("studentInfo") => {
                    student_info = Some(field.text().await.context(MultipartSnafu)?);
                }
                Some("setName") => {
                    set_name = Some(field.text().await.context(MultipartSnafu)?);
                }
                //the form may carry the recording itself, we only relay the details
                _ => {}
            }
        }

        Ok(SubmissionFields {
            student_info: StudentInfoField::Encoded(student_info.context(
                MissingFormFieldSnafu {
                    name: "studentInfo",
                },
            )?),
            set_name: set_name.context(MissingFormFieldSnafu { name: "setName" })?,
        })
    }
}

impl<S: Send + Sync> FromRequest<S> for SubmissionBody {
    type Rejection = NotifierError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .map(|mime| mime.trim().to_ascii_lowercase())
            .unwrap_or_default();

        match content_type.as_str() {
            "application/json" => {
                let bytes = Bytes::from_request(req, state)
                    .await
                    .context(ReadBodySnafu)?;
                let fields = serde_json::from_slice(&bytes).context(InvalidJsonSnafu)?;
                Ok(Self::Fields(fields))
            }
            "application/x-www-form-urlencoded" => {
                let Form(fields) = Form::from_request(req, state)
                    .await
                    .context(InvalidFormSnafu)?;
                Ok(Self::Fields(fields))
            }
            "multipart/form-data" => {
                let multipart = Multipart::from_request(req, state)
                    .await
                    .context(MultipartRejectedSnafu)?;
                Ok(Self::Fields(Self::from_multipart(multipart).await?))
            }
            text if text.starts_with("text/") => {
                let bytes = Bytes::from_request(req, state)
                    .await
                    .context(ReadBodySnafu)?;
                let text = String::from_utf8(bytes.to_vec()).context(InvalidUtf8Snafu)?;
                Ok(Self::Text(text))
            }
            _ => {
                let bytes = Bytes::from_request(req, state)
                    .await
                    .context(ReadBodySnafu)?;
                Ok(Self::Bytes(bytes))
            }
        }
    }
}
