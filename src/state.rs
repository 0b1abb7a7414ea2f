use crate::{
    config::{RuntimeConfiguration, TelegramCredentials},
    error::NotifierResult,
    telegram::{MessageSender, TelegramClient},
};
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct NotifierState {
    config: RuntimeConfiguration,
    sender: Arc<dyn MessageSender>,
}

impl NotifierState {
    pub fn new(config: RuntimeConfiguration) -> NotifierResult<Self> {
        let sender = TelegramClient::new(config.api_url().clone())?;
        Ok(Self::with_sender(config, Arc::new(sender)))
    }

    pub fn with_sender(config: RuntimeConfiguration, sender: Arc<dyn MessageSender>) -> Self {
        Self { config, sender }
    }

    pub fn telegram_credentials(&self) -> Option<Arc<TelegramCredentials>> {
        self.config.telegram()
    }

    pub fn sender(&self) -> &dyn MessageSender {
        self.sender.as_ref()
    }
}
