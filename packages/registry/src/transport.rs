//! Registry transport.
//!
//! The [`RegistryTransport`] trait is the seam between the registration
//! state machine and the network. [`HttpTransport`] implements it over the
//! Eureka REST API with [`reqwest`].
//!
//! Commands (`register`, `heartbeat` and `deregister`) never fail: a network
//! error or a non-success status is logged and reported as `false`, and the
//! caller decides what to do with it. Queries return an [`Error`] instead.
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt as _;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use url::Url;

use crate::action::HttpAction;
use crate::descriptor::{InstanceIdentity, RegistrationDocument};
use crate::model::{Application, ApplicationResponse, ApplicationsResponse, Instance};
use crate::{Error, REGISTRY_CLIENT_LOG_TARGET};

/// The calls the registration lifecycle makes to the registry.
#[cfg_attr(test, mockall::automock)]
pub trait RegistryTransport: std::fmt::Debug + Send + Sync + 'static {
    /// Registers the instance described by the document.
    fn register(&self, document: &RegistrationDocument) -> BoxFuture<'static, bool>;

    /// Lists the instances registered for the application.
    fn query_instances(&self, app_name: &str) -> BoxFuture<'static, Result<Vec<Instance>, Error>>;

    /// Lists all the applications known to the registry.
    fn query_applications(&self) -> BoxFuture<'static, Result<Vec<Application>, Error>>;

    /// Renews the lease of the instance.
    fn heartbeat(&self, identity: &InstanceIdentity) -> BoxFuture<'static, bool>;

    /// Removes the instance from the registry.
    fn deregister(&self, identity: &InstanceIdentity) -> BoxFuture<'static, bool>;
}

/// [`RegistryTransport`] over the Eureka REST API.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    /// Every request sent by this transport is abandoned after `timeout`.
    ///
    /// # Errors
    ///
    /// Will return an error if the http client can not be built.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| Error::UnableToBuildClient { source: Arc::new(source) })?;

        Ok(Self { client, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn command(&self, action: Result<HttpAction, Error>) -> BoxFuture<'static, bool> {
        let client = self.client.clone();

        async move {
            let action = match action {
                Ok(action) => action,
                Err(e) => {
                    tracing::error!(target: REGISTRY_CLIENT_LOG_TARGET, %e, "unable to build the registry request");
                    return false;
                }
            };

            let method = action.method.clone();
            let url = action.url.clone();

            match send(&client, action).await {
                Ok(status) => {
                    tracing::debug!(target: REGISTRY_CLIENT_LOG_TARGET, %method, %url, %status, "registry accepted the request");
                    true
                }
                Err(e) => {
                    tracing::warn!(target: REGISTRY_CLIENT_LOG_TARGET, %method, %e, "registry request failed");
                    false
                }
            }
        }
        .boxed()
    }

    fn query<T, R>(&self, action: Result<HttpAction, Error>, map: fn(R) -> T) -> BoxFuture<'static, Result<T, Error>>
    where
        T: Send + 'static,
        R: DeserializeOwned + Send + 'static,
    {
        let client = self.client.clone();

        async move {
            let action = action?;
            let url = action.url.clone();

            tracing::debug!(target: REGISTRY_CLIENT_LOG_TARGET, %url, "querying the registry");

            let bytes = dispatch(&client, action)
                .await?
                .bytes()
                .await
                .map_err(|source| Error::RequestFailed {
                    url: url.clone(),
                    source: Arc::new(source),
                })?;

            let response = serde_json::from_slice::<R>(&bytes).map_err(|source| {
                tracing::warn!(target: REGISTRY_CLIENT_LOG_TARGET, %url, %source, "unable to parse the registry response");
                Error::MalformedResponse {
                    url,
                    source: Arc::new(source),
                }
            })?;

            Ok(map(response))
        }
        .boxed()
    }
}

impl RegistryTransport for HttpTransport {
    fn register(&self, document: &RegistrationDocument) -> BoxFuture<'static, bool> {
        self.command(HttpAction::register(&self.base_url, document))
    }

    fn query_instances(&self, app_name: &str) -> BoxFuture<'static, Result<Vec<Instance>, Error>> {
        self.query::<_, ApplicationResponse>(HttpAction::query_instances(&self.base_url, app_name), |response| {
            response.application.instance
        })
    }

    fn query_applications(&self) -> BoxFuture<'static, Result<Vec<Application>, Error>> {
        self.query::<_, ApplicationsResponse>(HttpAction::query_applications(&self.base_url), |response| {
            response.applications.application
        })
    }

    fn heartbeat(&self, identity: &InstanceIdentity) -> BoxFuture<'static, bool> {
        self.command(HttpAction::heartbeat(&self.base_url, identity))
    }

    fn deregister(&self, identity: &InstanceIdentity) -> BoxFuture<'static, bool> {
        self.command(HttpAction::deregister(&self.base_url, identity))
    }
}

/// Sends the action and checks the response status.
async fn dispatch(client: &reqwest::Client, action: HttpAction) -> Result<reqwest::Response, Error> {
    let url = action.url.clone();

    let mut request = client
        .request(action.method, action.url)
        .header(CONTENT_TYPE, action.content_type)
        .header(ACCEPT, action.accept);

    if let Some(body) = action.body {
        request = request.body(body);
    }

    let response = request.send().await.map_err(|source| Error::RequestFailed {
        url: url.clone(),
        source: Arc::new(source),
    })?;

    let status = response.status();

    if !status.is_success() {
        return Err(Error::UnexpectedStatus { url, status });
    }

    Ok(response)
}

async fn send(client: &reqwest::Client, action: HttpAction) -> Result<reqwest::StatusCode, Error> {
    Ok(dispatch(client, action).await?.status())
}
