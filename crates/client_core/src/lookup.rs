use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use shared::protocol::{StudentFilterQuery, StudentSummary};
use url::Url;

use crate::error::LookupError;

pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Server-side student filter behind the roster's suggestion lists.
#[async_trait]
pub trait StudentDirectory: Send + Sync {
    async fn filter_students(&self, filter: &str) -> Result<Vec<StudentSummary>, LookupError>;
}

pub struct MissingStudentDirectory;

#[async_trait]
impl StudentDirectory for MissingStudentDirectory {
    async fn filter_students(&self, _filter: &str) -> Result<Vec<StudentSummary>, LookupError> {
        Err(LookupError::Unavailable)
    }
}

/// `GET {server}/students?filter=<text>` returning `[{"id": .., "name": ..}]`.
pub struct HttpStudentDirectory {
    http: Client,
    students_url: Url,
    session_cookie: Option<String>,
}

impl HttpStudentDirectory {
    pub fn new(server_url: &str) -> Result<Self, LookupError> {
        Self::with_timeout(server_url, DEFAULT_LOOKUP_TIMEOUT)
    }

    pub fn with_timeout(server_url: &str, timeout: Duration) -> Result<Self, LookupError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(LookupError::Transport)?;
        Ok(Self {
            http,
            students_url: students_url(server_url)?,
            session_cookie: None,
        })
    }

    /// The endpoint only answers authenticated sessions.
    pub fn with_session_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.session_cookie = Some(cookie.into());
        self
    }

    pub fn students_url(&self) -> &Url {
        &self.students_url
    }
}

fn students_url(server_url: &str) -> Result<Url, LookupError> {
    let base = format!("{}/", server_url.trim().trim_end_matches('/'));
    Url::parse(&base)
        .and_then(|base| base.join("students"))
        .map_err(|source| LookupError::InvalidUrl {
            url: server_url.to_string(),
            source,
        })
}

#[async_trait]
impl StudentDirectory for HttpStudentDirectory {
    async fn filter_students(&self, filter: &str) -> Result<Vec<StudentSummary>, LookupError> {
        let mut request = self
            .http
            .get(self.students_url.clone())
            .query(&StudentFilterQuery {
                filter: filter.to_string(),
            });
        if let Some(cookie) = &self.session_cookie {
            request = request.header(header::COOKIE, cookie);
        }

        let response = request.send().await.map_err(LookupError::Transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status {
                status: status.as_u16(),
            });
        }
        response.json().await.map_err(LookupError::Decode)
    }
}
