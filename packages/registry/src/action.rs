//! One request sent to the registry.
//!
//! An [`HttpAction`] is built fresh for every call from the registry base
//! url and the instance identity. It holds no shared state.
use reqwest::Method;
use url::Url;

use crate::descriptor::{InstanceIdentity, RegistrationDocument};
use crate::Error;

/// The only media type the registry client speaks.
pub const JSON_UTF8: &str = "application/json;charset=UTF-8";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpAction {
    pub url: Url,
    pub method: Method,
    pub content_type: &'static str,
    pub accept: &'static str,
    pub body: Option<Vec<u8>>,
}

impl HttpAction {
    /// `POST /eureka/apps/{app}` with the registration document.
    ///
    /// # Errors
    ///
    /// Will return an error if the base url can not be extended or if the
    /// document can not be serialized.
    pub fn register(base_url: &Url, document: &RegistrationDocument) -> Result<Self, Error> {
        let body = serde_json::to_vec(document).map_err(|source| Error::UnableToSerialize {
            source: std::sync::Arc::new(source),
        })?;

        Ok(Self {
            url: endpoint(base_url, &[document.app_name()])?,
            method: Method::POST,
            content_type: JSON_UTF8,
            accept: JSON_UTF8,
            body: Some(body),
        })
    }

    /// `GET /eureka/apps/{app}`.
    ///
    /// # Errors
    ///
    /// Will return an error if the base url can not be extended.
    pub fn query_instances(base_url: &Url, app_name: &str) -> Result<Self, Error> {
        Ok(Self::query(endpoint(base_url, &[app_name])?))
    }

    /// `GET /eureka/apps`.
    ///
    /// # Errors
    ///
    /// Will return an error if the base url can not be extended.
    pub fn query_applications(base_url: &Url) -> Result<Self, Error> {
        Ok(Self::query(endpoint(base_url, &[])?))
    }

    /// `PUT /eureka/apps/{app}/{ip}:{app}:{instance id}`.
    ///
    /// # Errors
    ///
    /// Will return an error if the base url can not be extended.
    pub fn heartbeat(base_url: &Url, identity: &InstanceIdentity) -> Result<Self, Error> {
        Self::on_instance(Method::PUT, base_url, identity)
    }

    /// `DELETE /eureka/apps/{app}/{ip}:{app}:{instance id}`.
    ///
    /// # Errors
    ///
    /// Will return an error if the base url can not be extended.
    pub fn deregister(base_url: &Url, identity: &InstanceIdentity) -> Result<Self, Error> {
        Self::on_instance(Method::DELETE, base_url, identity)
    }

    fn query(url: Url) -> Self {
        Self {
            url,
            method: Method::GET,
            content_type: JSON_UTF8,
            accept: JSON_UTF8,
            body: None,
        }
    }

    fn on_instance(method: Method, base_url: &Url, identity: &InstanceIdentity) -> Result<Self, Error> {
        Ok(Self {
            url: endpoint(base_url, &[identity.app_name(), &identity.instance_key()])?,
            method,
            content_type: JSON_UTF8,
            accept: JSON_UTF8,
            body: None,
        })
    }
}

/// Appends `eureka/apps` and the given segments to the base url path.
///
/// Segments are percent-encoded, so an application name can not escape its
/// path segment.
fn endpoint(base_url: &Url, segments: &[&str]) -> Result<Url, Error> {
    let mut url = base_url.clone();

    url.path_segments_mut()
        .map_err(|()| Error::InvalidBaseUrl { url: base_url.clone() })?
        .pop_if_empty()
        .extend(["eureka", "apps"])
        .extend(segments);

    Ok(url)
}
