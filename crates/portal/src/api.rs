//! HTTP boundary to the campus API.
//!
//! The API is a black box returning JSON. Every request carries the stored
//! credential as a bearer token when one exists; the client never refreshes or
//! validates it.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use campus_auth::Session;
use campus_core::{
    CourseId, Enrollment, NewEnrollment, PageRequest, PagedResponse, Student, StudentId,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("API error ({0}): {1}")]
    Api(u16, String),
    #[error("parse error: {0}")]
    Parse(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api(status, _) => Some(*status),
            _ => None,
        }
    }
}

/// Body of `POST /User/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Client for the campus API.
///
/// Cheap to clone; clones share the connection pool and the session.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Session,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, session: Session) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut req = self.http.request(method, self.url(path));
        if let Some(token) = self.session.credential() {
            req = req.bearer_auth(token);
        }
        req
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response, ApiError> {
        let resp = req.send().await.map_err(|e| ApiError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::Api(status, body));
        }

        Ok(resp)
    }

    async fn json<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
        resp.json().await.map_err(|e| ApiError::Parse(e.to_string()))
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        tracing::debug!(path, "GET");
        let resp = self.send(self.request(Method::GET, path)).await?;
        Self::json(resp).await
    }

    /// `GET {path}?pageNumber=&pageSize=`.
    pub async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        page: PageRequest,
    ) -> Result<PagedResponse<T>, ApiError> {
        tracing::debug!(path, page.page_number, page.page_size, "GET page");
        let req = self.request(Method::GET, path).query(&page);
        let resp = self.send(req).await?;
        Self::json(resp).await
    }

    /// `POST {path}` returning whatever the server answered (possibly `null`).
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Value, ApiError> {
        tracing::debug!(path, "POST");
        let resp = self.send(self.request(Method::POST, path).json(body)).await?;
        let bytes = resp.bytes().await.map_err(|e| ApiError::Network(e.to_string()))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// `PUT {path}`; the response body is ignored.
    pub async fn put_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        tracing::debug!(path, "PUT");
        self.send(self.request(Method::PUT, path).json(body)).await?;
        Ok(())
    }

    /// `DELETE {path}`; the response body is ignored.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        tracing::debug!(path, "DELETE");
        self.send(self.request(Method::DELETE, path)).await?;
        Ok(())
    }
}

/// Exchanges email/password for a credential.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> Result<String, ApiError>;
}

#[async_trait]
impl Authenticator for ApiClient {
    async fn login(&self, request: &LoginRequest) -> Result<String, ApiError> {
        let resp = self.send(self.request(Method::POST, "User/login").json(request)).await?;
        let body: LoginResponse = Self::json(resp).await?;
        Ok(body.token)
    }
}

/// Enrollment endpoints.
#[async_trait]
pub trait EnrollmentApi: Send + Sync {
    /// `GET /Enrollment`: every enrollment the caller may see.
    async fn list_enrollments(&self) -> Result<Vec<Enrollment>, ApiError>;

    /// `GET /Enrollment/ByStudent/{id}`.
    async fn enrollments_by_student(&self, student: StudentId) -> Result<Vec<Enrollment>, ApiError>;

    /// `GET /Enrollment/Course/{id}`: students enrolled in a course.
    async fn course_roster(&self, course: CourseId) -> Result<Vec<Student>, ApiError>;

    /// `POST /Enrollment`.
    async fn create_enrollment(&self, enrollment: NewEnrollment) -> Result<(), ApiError>;
}

#[async_trait]
impl EnrollmentApi for ApiClient {
    async fn list_enrollments(&self) -> Result<Vec<Enrollment>, ApiError> {
        self.get_json("Enrollment").await
    }

    async fn enrollments_by_student(
        &self,
        student: StudentId,
    ) -> Result<Vec<Enrollment>, ApiError> {
        self.get_json(&format!("Enrollment/ByStudent/{student}")).await
    }

    async fn course_roster(&self, course: CourseId) -> Result<Vec<Student>, ApiError> {
        self.get_json(&format!("Enrollment/Course/{course}")).await
    }

    async fn create_enrollment(&self, enrollment: NewEnrollment) -> Result<(), ApiError> {
        self.post_json("Enrollment", &enrollment).await?;
        Ok(())
    }
}
