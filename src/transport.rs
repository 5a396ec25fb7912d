use async_trait::async_trait;

use crate::error::TransportError;

/// Outbound GET access to the catalog. The client only ever needs the raw
/// response body of a successful request.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<Vec<u8>, TransportError>;
}

pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().user_agent(user_agent).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        let request_err = |source| TransportError::Request {
            url: url.to_string(),
            source,
        };
        let res = self.client.get(url).send().await.map_err(request_err)?;
        let status = res.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let bytes = res.bytes().await.map_err(request_err)?;
        Ok(bytes.to_vec())
    }
}
