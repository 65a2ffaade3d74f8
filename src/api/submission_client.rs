use std::rc::Rc;

use futures::future::LocalBoxFuture;
use futures::FutureExt;
use reqwest::Client;
use tracing::{debug, info};

use crate::config::LandingConfig;
use crate::error::SubmissionError;
use crate::models::submission::{Submission, SubmissionPayload};
use crate::utils::timers::Scheduler;

/// Delivers a captured signup to wherever signups are collected.
pub trait SubmissionClient {
    fn submit<'a>(
        &'a self,
        submission: &'a Submission,
    ) -> LocalBoxFuture<'a, Result<(), SubmissionError>>;
}

/// Stand-in used while no form endpoint is configured: resolves successfully
/// after a fixed latency.
pub struct SimulatedSubmissionClient {
    scheduler: Rc<dyn Scheduler>,
    latency_ms: u32,
}

impl SimulatedSubmissionClient {
    pub fn new(scheduler: Rc<dyn Scheduler>, latency_ms: u32) -> Self {
        Self { scheduler, latency_ms }
    }
}

impl SubmissionClient for SimulatedSubmissionClient {
    fn submit<'a>(
        &'a self,
        submission: &'a Submission,
    ) -> LocalBoxFuture<'a, Result<(), SubmissionError>> {
        async move {
            info!(
                email = %submission.email,
                form_id = %submission.form_id,
                timestamp = %submission.timestamp,
                "Email submitted"
            );
            self.scheduler.sleep(self.latency_ms).await;
            Ok(())
        }
        .boxed_local()
    }
}

/// Posts signups as JSON to a hosted form backend.
pub struct HttpSubmissionClient {
    client: Client,
    endpoint: String,
    source: String,
}

impl HttpSubmissionClient {
    /// `source` is the URL of the page the signup came from.
    pub fn new(endpoint: impl Into<String>, source: impl Into<String>) -> Self {
        Self::with_client(Client::new(), endpoint, source)
    }

    pub fn with_client(client: Client, endpoint: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            source: source.into(),
        }
    }
}

impl SubmissionClient for HttpSubmissionClient {
    fn submit<'a>(
        &'a self,
        submission: &'a Submission,
    ) -> LocalBoxFuture<'a, Result<(), SubmissionError>> {
        async move {
            let payload = SubmissionPayload::new(submission, &self.source);
            let response = self
                .client
                .post(&self.endpoint)
                .json(&payload)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                return Err(SubmissionError::Rejected { status: status.as_u16() });
            }
            debug!("Form endpoint accepted submission with status {}", status);
            Ok(())
        }
        .boxed_local()
    }
}

/// Picks the HTTP client when an endpoint is configured, the simulated one
/// otherwise.
pub fn client_for(
    config: &LandingConfig,
    scheduler: Rc<dyn Scheduler>,
    source: String,
) -> Rc<dyn SubmissionClient> {
    match &config.form_endpoint {
        Some(endpoint) => Rc::new(HttpSubmissionClient::new(endpoint.clone(), source)),
        None => Rc::new(SimulatedSubmissionClient::new(scheduler, config.simulated_latency_ms)),
    }
}
