use crate::error::{BadEnvVarSnafu, NotifierResult, ParseApiUrlSnafu};
use dotenvy::var;
use secrecy::{ExposeSecret, SecretString};
use snafu::ResultExt;
use std::{env::VarError, sync::Arc};
use url::Url;

pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

#[derive(Clone, Debug)]
pub struct RuntimeConfiguration {
    telegram: Option<Arc<TelegramCredentials>>,
    api_url: Url,
}

impl RuntimeConfiguration {
    /// Reads the Telegram secrets and the provider url from the environment.
    ///
    /// Missing secrets are *not* an error here - the service still starts and answers every
    /// submission with a configuration error until they are set.
    pub fn new() -> NotifierResult<Self> {
        let bot_token = optional_var("TELEGRAM_BOT_TOKEN")?;
        let chat_id = optional_var("TELEGRAM_CHAT_ID")?;
        let api_url = optional_var("TELEGRAM_API_URL")?
            .unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_string());

        if bot_token.is_none() || chat_id.is_none() {
            warn!("Telegram credentials missing, submissions will be rejected until they are set");
        }

        Ok(Self::from_parts(
            credentials_from(bot_token, chat_id),
            parse_api_url(api_url)?,
        ))
    }

    pub fn from_parts(telegram: Option<TelegramCredentials>, api_url: Url) -> Self {
        Self {
            telegram: telegram.map(Arc::new),
            api_url,
        }
    }

    pub fn telegram(&self) -> Option<Arc<TelegramCredentials>> {
        self.telegram.clone()
    }

    pub const fn api_url(&self) -> &Url {
        &self.api_url
    }
}

fn optional_var(name: &'static str) -> NotifierResult<Option<String>> {
    non_empty(var(name)).context(BadEnvVarSnafu { name })
}

/// Unset and blank both count as missing.
fn non_empty(lookup: Result<String, dotenvy::Error>) -> Result<Option<String>, dotenvy::Error> {
    match lookup {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(dotenvy::Error::EnvVar(VarError::NotPresent)) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Both halves are needed, one on its own is as good as none.
fn credentials_from(
    bot_token: Option<String>,
    chat_id: Option<String>,
) -> Option<TelegramCredentials> {
    bot_token
        .zip(chat_id)
        .map(|(bot_token, chat_id)| TelegramCredentials::new(bot_token, chat_id))
}

pub fn parse_api_url(original: String) -> NotifierResult<Url> {
    Url::parse(&original).context(ParseApiUrlSnafu { original })
}

#[derive(Debug)]
pub struct TelegramCredentials {
    bot_token: SecretString,
    chat_id: SecretString,
}

impl TelegramCredentials {
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            bot_token: SecretString::from(bot_token.into()),
            chat_id: SecretString::from(chat_id.into()),
        }
    }

    pub fn bot_token(&self) -> &str {
        self.bot_token.expose_secret()
    }

    pub fn chat_id(&self) -> &str {
        self.chat_id.expose_secret()
    }
}
