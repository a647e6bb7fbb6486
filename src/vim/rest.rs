//! vCenter REST client
//!
//! Speaks the vim25 JSON API (vSphere 8.0+): managed-object methods are
//! invoked as `POST {endpoint}/sdk/vim25/{release}/{type}/{moId}/{method}`
//! with JSON bodies, and the session key travels in the
//! `vmware-api-session-id` header.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Response;
use serde_json::json;
use tracing::{debug, info};
use url::Url;

use crate::config::VcConfig;
use crate::error::{Error, Result};
use crate::vim::source::{EventCollector, EventSource};
use crate::vim::types::{AboutInfo, Event, EventFilterSpec, ManagedObjectRef, ServiceContent};

/// vim25 API release the JSON bindings are pinned to.
const VIM_RELEASE: &str = "8.0.2.0";
const SESSION_HEADER: &str = "vmware-api-session-id";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Authenticated vim25 JSON API session.
pub struct RestClient {
    http: reqwest::Client,
    base: Url,
    session: String,
    content: ServiceContent,
    event_manager: ManagedObjectRef,
}

impl RestClient {
    /// Log in and discover the service content.
    pub async fn connect(config: &VcConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(config.insecure)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let base = vim_base(&config.endpoint)?;

        let response = http
            .post(base.join("SessionManager/SessionManager/Login")?)
            .json(&json!({
                "userName": config.username,
                "password": config.password,
            }))
            .send()
            .await
            .map_err(|err| Error::Authentication(err.to_string()))?;
        if !response.status().is_success() {
            return Err(Error::Authentication(format!(
                "login to {} rejected: {}",
                config.endpoint,
                failure_detail(response).await
            )));
        }
        let session = response
            .headers()
            .get(SESSION_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                Error::Authentication("login response carried no session id".to_string())
            })?
            .to_string();

        let response = http
            .post(base.join("ServiceInstance/ServiceInstance/RetrieveServiceContent")?)
            .header(SESSION_HEADER, &session)
            .json(&json!({}))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Error::Api(format!(
                "RetrieveServiceContent failed: {}",
                failure_detail(response).await
            )));
        }
        let content: ServiceContent = response.json().await?;
        let event_manager = content
            .event_manager
            .clone()
            .ok_or_else(|| Error::Api("server exposes no event manager".to_string()))?;

        info!("logged in to {} ({})", config.endpoint, content.about.full_name);

        Ok(Self {
            http,
            base,
            session,
            content,
            event_manager,
        })
    }

    /// Root of the managed inventory, discovered at login.
    pub fn root_folder(&self) -> &ManagedObjectRef {
        &self.content.root_folder
    }

    pub fn about(&self) -> &AboutInfo {
        &self.content.about
    }

    /// End the server-side session. Best effort; the session also expires
    /// on its own.
    pub async fn logout(&self) -> Result<()> {
        let response = self
            .http
            .post(self.base.join("SessionManager/SessionManager/Logout")?)
            .header(SESSION_HEADER, &self.session)
            .json(&json!({}))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Error::Api(format!(
                "logout failed: {}",
                failure_detail(response).await
            )));
        }
        debug!("vCenter session closed");
        Ok(())
    }
}

#[async_trait]
impl EventSource for RestClient {
    async fn current_time(&self) -> Result<DateTime<Utc>> {
        let response = self
            .http
            .post(self.base.join("ServiceInstance/ServiceInstance/CurrentTime")?)
            .header(SESSION_HEADER, &self.session)
            .json(&json!({}))
            .send()
            .await
            .map_err(|err| Error::RemoteClock(err.to_string()))?;
        if !response.status().is_success() {
            return Err(Error::RemoteClock(failure_detail(response).await));
        }
        response
            .json::<DateTime<Utc>>()
            .await
            .map_err(|err| Error::RemoteClock(err.to_string()))
    }

    async fn create_collector(&self, spec: &EventFilterSpec) -> Result<Box<dyn EventCollector>> {
        let url = self.base.join(&format!(
            "EventManager/{}/CreateCollectorForEvents",
            self.event_manager.value
        ))?;
        let response = self
            .http
            .post(url)
            .header(SESSION_HEADER, &self.session)
            .json(&json!({ "filter": spec }))
            .send()
            .await
            .map_err(|err| Error::CollectorCreation(err.to_string()))?;
        if !response.status().is_success() {
            return Err(Error::CollectorCreation(failure_detail(response).await));
        }
        let moref: ManagedObjectRef = response
            .json()
            .await
            .map_err(|err| Error::CollectorCreation(err.to_string()))?;
        debug!("created event collector {moref}");

        Ok(Box::new(RestCollector {
            http: self.http.clone(),
            base: self.base.clone(),
            session: self.session.clone(),
            moref,
        }))
    }
}

/// Cursor over one server-side `EventHistoryCollector`.
pub struct RestCollector {
    http: reqwest::Client,
    base: Url,
    session: String,
    moref: ManagedObjectRef,
}

impl RestCollector {
    fn method_url(&self, method: &str) -> Result<Url> {
        Ok(self.base.join(&format!(
            "EventHistoryCollector/{}/{}",
            self.moref.value, method
        ))?)
    }
}

#[async_trait]
impl EventCollector for RestCollector {
    async fn read_next(&mut self, max_count: u32) -> Result<Vec<Event>> {
        let response = self
            .http
            .post(self.method_url("ReadNextEvents")?)
            .header(SESSION_HEADER, &self.session)
            .json(&json!({ "maxCount": max_count }))
            .send()
            .await
            .map_err(|err| Error::PageRead(err.to_string()))?;
        if !response.status().is_success() {
            return Err(Error::PageRead(failure_detail(response).await));
        }
        // an exhausted collector may answer 204 with no body
        if response.status() == reqwest::StatusCode::NO_CONTENT {
            return Ok(Vec::new());
        }
        let events: Option<Vec<Event>> = response
            .json()
            .await
            .map_err(|err| Error::PageRead(err.to_string()))?;
        Ok(events.unwrap_or_default())
    }

    async fn destroy(&mut self) -> Result<()> {
        let response = self
            .http
            .post(self.method_url("DestroyCollector")?)
            .header(SESSION_HEADER, &self.session)
            .json(&json!({}))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Error::Api(format!(
                "DestroyCollector failed: {}",
                failure_detail(response).await
            )));
        }
        debug!("destroyed event collector {}", self.moref);
        Ok(())
    }
}

/// Base URL of the vim25 JSON bindings for an endpoint given as a bare
/// host, IP, or full URL.
fn vim_base(endpoint: &str) -> Result<Url> {
    let normalized = if endpoint.contains("://") {
        endpoint.to_string()
    } else {
        format!("https://{endpoint}")
    };
    let url = Url::parse(&normalized)?;
    Ok(url.join(&format!("sdk/vim25/{VIM_RELEASE}/"))?)
}

async fn failure_detail(response: Response) -> String {
    let status = response.status();
    match response.text().await {
        Ok(body) if !body.is_empty() => format!("{status}: {body}"),
        _ => status.to_string(),
    }
}
