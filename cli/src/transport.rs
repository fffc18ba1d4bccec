//! ureq-backed `Transport`.
//!
//! ureq is blocking, so each call is moved onto tokio's blocking pool and the
//! calling task only waits on the join handle.

use std::time::Duration;

use roster_core::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    /// Status codes are handed back as data; only failures to get a response
    /// at all become `TransportError`.
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(REQUEST_TIMEOUT))
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    async fn execute(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        let agent = self.agent.clone();
        tokio::task::spawn_blocking(move || execute_blocking(&agent, req))
            .await
            .map_err(|e| TransportError::new(format!("request task failed: {e}")))?
    }
}

fn execute_blocking(agent: &ureq::Agent, req: HttpRequest) -> Result<HttpResponse, TransportError> {
    let result = match (req.method, req.body) {
        (HttpMethod::Get, _) => agent.get(&req.path).call(),
        (HttpMethod::Delete, _) => agent.delete(&req.path).call(),
        (HttpMethod::Post, Some(body)) => agent
            .post(&req.path)
            .content_type("application/json")
            .send(body.as_bytes()),
        (HttpMethod::Post, None) => agent.post(&req.path).send_empty(),
    };
    let mut response = result.map_err(|e| TransportError::new(e.to_string()))?;

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|e| TransportError::new(format!("reading response body: {e}")))?;

    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}
