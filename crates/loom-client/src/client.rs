//! `LoomClient`: wraps every Store call with the mandatory identity
//! headers, retry-with-backoff, and coordination accounting (§4.2, §6).

use std::sync::Arc;
use std::time::Duration;

use loom_core::errors::{LoomError, LoomResult};
use loom_core::models::{
    AppendRequest, AppendResponse, ChatReaction, DerivationCheck, DerivationRequest, Entry,
    Provenance, Relationship, SearchRequest, SearchResponse,
};
use loom_coord::CoordinationStore;

use crate::retry::{retry_with_backoff, RetryConfig};

/// Agent-kind write budget key used against `CoordinationStore::can_write`
/// / `record_write` / `record_failure` (§4.1, §4.2).
fn agent_key(provenance: &Provenance) -> String {
    provenance.agent_kind.clone()
}

pub struct LoomClient {
    http: reqwest::Client,
    base_url: String,
    bearer_token: String,
    provenance: Provenance,
    coord: Arc<CoordinationStore>,
    retry: RetryConfig,
}

impl LoomClient {
    pub fn new(
        base_url: impl Into<String>,
        bearer_token: impl Into<String>,
        provenance: Provenance,
        coord: Arc<CoordinationStore>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            bearer_token: bearer_token.into(),
            provenance,
            coord,
            retry: RetryConfig::default(),
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self
            .http
            .request(method, url)
            .bearer_auth(&self.bearer_token)
            .header("X-Agent-Id", &self.provenance.agent_kind)
            .header("X-Agent-Version", &self.provenance.agent_version)
            .header("X-Agent-Instance-Id", &self.provenance.instance_id);
        if let Some(sub_agent) = &self.provenance.sub_agent {
            req = req.header("X-Agent-Subagent-Id", sub_agent);
        }
        req
    }

    /// Issue a mutating call: retried with backoff, success/failure
    /// reported to the coordination store (§4.2).
    async fn send_mutation<T: serde::de::DeserializeOwned>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &impl serde::Serialize,
        timeout: Duration,
    ) -> LoomResult<T> {
        let key = agent_key(&self.provenance);
        let now = chrono::Utc::now();
        let decision = self.coord.can_write(&key, now);
        if !decision.allowed {
            return Err(LoomError::RateLimited {
                retry_after_secs: decision.retry_after_secs.unwrap_or(1),
            });
        }

        let result = retry_with_backoff(&self.retry, || async {
            self.request(method.clone(), path)
                .json(body)
                .timeout(timeout)
                .send()
                .await
                .map_err(classify_reqwest_error)?
                .error_for_status()
                .map_err(classify_reqwest_error)?
                .json::<T>()
                .await
                .map_err(classify_reqwest_error)
        })
        .await;

        match &result {
            Ok(_) => self.coord.record_write(&key, now),
            Err(_) => self.coord.record_failure(now),
        }
        result
    }

    async fn send_read<T: serde::de::DeserializeOwned>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&impl serde::Serialize>,
        timeout: Duration,
    ) -> LoomResult<T> {
        retry_with_backoff(&self.retry, || async {
            let mut req = self.request(method.clone(), path).timeout(timeout);
            if let Some(body) = body {
                req = req.json(body);
            }
            req.send()
                .await
                .map_err(classify_reqwest_error)?
                .error_for_status()
                .map_err(classify_reqwest_error)?
                .json::<T>()
                .await
                .map_err(classify_reqwest_error)
        })
        .await
    }

    pub async fn create_entry(&self, body: &serde_json::Value) -> LoomResult<Entry> {
        self.send_mutation(reqwest::Method::POST, "/api/v1/entries", body, Duration::from_secs(10))
            .await
    }

    pub async fn update_entry(&self, id: &str, body: &serde_json::Value) -> LoomResult<Entry> {
        self.send_mutation(
            reqwest::Method::PUT,
            &format!("/api/v1/entries/{id}"),
            body,
            Duration::from_secs(10),
        )
        .await
    }

    pub async fn delete_entry(&self, id: &str) -> LoomResult<serde_json::Value> {
        self.send_mutation(
            reqwest::Method::DELETE,
            &format!("/api/v1/entries/{id}"),
            &serde_json::json!({}),
            Duration::from_secs(10),
        )
        .await
    }

    /// Appends one chat message (§4.7 ingestion endpoint's client side),
    /// with a 10 s request budget (§5).
    pub async fn append_message(&self, request: &AppendRequest) -> LoomResult<AppendResponse> {
        self.send_mutation(
            reqwest::Method::POST,
            "/api/v1/chat-stream/append",
            request,
            Duration::from_secs(10),
        )
        .await
    }

    pub async fn post_reaction(&self, reaction: &ChatReaction) -> LoomResult<serde_json::Value> {
        self.send_mutation(
            reqwest::Method::POST,
            "/api/v1/chat-stream/reaction",
            reaction,
            Duration::from_secs(10),
        )
        .await
    }

    pub async fn create_relationship(&self, relationship: &Relationship) -> LoomResult<serde_json::Value> {
        self.send_mutation(
            reqwest::Method::POST,
            "/api/v1/relationships",
            relationship,
            Duration::from_secs(10),
        )
        .await
    }

    pub async fn check_derivation(&self, request: &DerivationRequest) -> LoomResult<DerivationCheck> {
        self.send_read(
            reqwest::Method::POST,
            "/api/v1/memories/check-derivation",
            Some(request),
            Duration::from_secs(10),
        )
        .await
    }

    /// Runs `POST /search` with an 8 s request budget (§4.4, §5). Defaults
    /// to excluding the calling agent kind from results unless the caller
    /// already supplied an explicit `include_agents`/`exclude_agents`
    /// (§4.2 read-time filtering).
    pub async fn search(&self, mut request: SearchRequest) -> LoomResult<SearchResponse> {
        if request.include_agents.is_none() && request.exclude_agents.is_none() {
            request.exclude_agents = Some(vec![self.provenance.agent_kind.clone()]);
        }
        let result = self
            .send_read(reqwest::Method::POST, "/api/v1/search", Some(&request), Duration::from_secs(8))
            .await;
        let hit = matches!(&result, Ok(r) if !r_hits_empty(r));
        self.coord.record_search(hit);
        result
    }

    pub async fn blocking_chain(&self, entry_id: &str) -> LoomResult<Vec<Relationship>> {
        self.send_read::<Vec<Relationship>>(
            reqwest::Method::GET,
            &format!("/api/v1/entries/{entry_id}/relationships/blocking-chain"),
            None::<&()>,
            Duration::from_secs(8),
        )
        .await
    }

    pub async fn assigned_tasks(&self, person_id: &str, include_children: bool) -> LoomResult<Vec<String>> {
        let path = format!("/api/v1/persons/{person_id}/assigned-tasks?include_children={include_children}");
        self.send_read::<Vec<String>>(reqwest::Method::GET, &path, None::<&()>, Duration::from_secs(8))
            .await
    }
}

fn r_hits_empty(response: &SearchResponse) -> bool {
    response.hits.is_empty()
}

fn classify_reqwest_error(e: reqwest::Error) -> LoomError {
    if e.is_timeout() {
        return LoomError::Timeout(8);
    }
    if let Some(status) = e.status() {
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return LoomError::Unauthorized;
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return LoomError::RateLimited { retry_after_secs: 1 };
        }
        if status.is_server_error() {
            return LoomError::Network(format!("store returned {status}"));
        }
        return LoomError::Validation(format!("store returned {status}"));
    }
    LoomError::Network(e.to_string())
}
