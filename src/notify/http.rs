use super::{CheckInNotice, Notifier};
use crate::errors::{AppError, AppResult};
use reqwest::blocking::Client;
use std::time::Duration;

/// POSTs each notice as JSON to a fixed URL.
pub struct HttpNotifier {
    url: String,
    client: Client,
}

impl HttpNotifier {
    pub fn new(url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let url = url.into();
        reqwest::Url::parse(&url)
            .map_err(|e| AppError::Config(format!("invalid notify_url '{url}': {e}")))?;

        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(3))
            .build()
            .map_err(|e| AppError::Notify(format!("cannot build HTTP client: {e}")))?;

        Ok(Self { url, client })
    }
}

impl Notifier for HttpNotifier {
    fn send(&self, notice: &CheckInNotice) -> AppResult<()> {
        let response = self
            .client
            .post(&self.url)
            .json(notice)
            .send()
            .map_err(|e| AppError::Notify(format!("POST {}: {e}", self.url)))?;

        if !response.status().is_success() {
            return Err(AppError::Notify(format!(
                "POST {} answered {}",
                self.url,
                response.status()
            )));
        }

        Ok(())
    }
}
