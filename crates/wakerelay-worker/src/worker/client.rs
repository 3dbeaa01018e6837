//! Broker access for the poll loop.

use core::time::Duration;
use reqwest::StatusCode;
use wakerelay::{Claim, Error, Result};

/// Something that can be asked for the pending request of an id.
pub trait Broker {
    /// Claims the pending request for `id`.
    ///
    /// `Ok(Claim::NotFound)` is the normal answer when nothing is pending.
    /// Errors are transport failures and only ever lead to a backoff.
    fn claim(&self, id: &str) -> impl Future<Output = Result<Claim>> + Send;
}

/// [`Broker`] over the broker's HTTP routes.
#[derive(Clone, Debug)]
pub struct HttpBroker {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBroker {
    /// `base_url` must not end with `/`. Every request gives up after
    /// `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(transport)?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn claim_url(&self, id: &str) -> String {
        format!("{}/id/{id}", self.base_url)
    }
}

impl Broker for HttpBroker {
    async fn claim(&self, id: &str) -> Result<Claim> {
        let response = self
            .client
            .get(self.claim_url(id))
            .send()
            .await
            .map_err(transport)?;

        match response.status() {
            StatusCode::OK | StatusCode::CREATED => {
                let payload = response.text().await.map_err(transport)?;
                Ok(Claim::Found(payload))
            }
            StatusCode::NO_CONTENT => Ok(Claim::NotFound),
            status => Err(Error::UnexpectedStatus {
                status: status.as_u16(),
            }),
        }
    }
}

fn transport(err: reqwest::Error) -> Error {
    Error::Transport {
        context: err.to_string(),
    }
}
