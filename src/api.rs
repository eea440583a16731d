use crate::{
    config::ApiConfig,
    data::{
        ApiMessage, HealthStatus, ServiceInfo, Statistics, Student, StudentCreate, StudentFilters,
        StudentUpdate,
    },
    error::{
        AlumnosError, AlumnosResult, BuildRequestSnafu, DecodeResponseSnafu,
        error_message_from_body,
    },
};
use axum::body::Bytes;
use reqwest::{
    Client, Method, RequestBuilder, Url,
    header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use serde::{Serialize, de::DeserializeOwned};
use snafu::ResultExt;
use std::sync::Arc;

///the only thing in the app that talks to the student backend
#[derive(Clone, Debug)]
pub struct AlumnosApi {
    client: Client,
    config: Arc<ApiConfig>,
}

impl AlumnosApi {
    pub fn new(config: Arc<ApiConfig>) -> AlumnosResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .context(BuildRequestSnafu)?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url())
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> AlumnosResult<T> {
        let request = request.build().context(BuildRequestSnafu)?;
        let method = request.method().clone();
        let url = request.url().to_string();
        debug!(%method, %url, "API request");

        let response = match self.client.execute(request).await {
            Ok(rsp) => rsp,
            Err(source) => {
                warn!(%method, %url, ?source, "Unable to reach backend");
                return Err(AlumnosError::Unreachable {
                    message: self.config.unreachable_message(&url),
                    url,
                    source,
                });
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = match response.bytes().await {
                Ok(body) => body,
                Err(e) => {
                    warn!(%method, %url, %status, ?e, "Unable to read error body");
                    Bytes::new()
                }
            };
            let message = error_message_from_body(status, &body);
            warn!(%method, %url, %status, %message, "Backend returned an error");
            return Err(AlumnosError::Api { status, message });
        }

        debug!(%method, %url, %status, "API response");
        response.json().await.context(DecodeResponseSnafu { url })
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> AlumnosResult<T> {
        self.send(self.client.request(method, self.url(path)).json(body))
            .await
    }

    async fn send_empty<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
    ) -> AlumnosResult<T> {
        self.send(self.client.request(method, self.url(path))).await
    }

    ///the exact URL a [`Self::list`] call with these filters requests
    pub fn list_url(&self, filters: &StudentFilters) -> AlumnosResult<Url> {
        Ok(self
            .client
            .get(self.url("/alumnos"))
            .query(filters)
            .build()
            .context(BuildRequestSnafu)?
            .url()
            .clone())
    }

    pub async fn list(&self, filters: &StudentFilters) -> AlumnosResult<Vec<Student>> {
        let url = self.list_url(filters)?;
        self.send(self.client.get(url)).await
    }

    pub async fn get(&self, id: i32) -> AlumnosResult<Student> {
        self.send_empty(Method::GET, &format!("/alumnos/{id}")).await
    }

    pub async fn create(&self, student: &StudentCreate) -> AlumnosResult<Student> {
        self.send_json(Method::POST, "/alumnos", student).await
    }

    pub async fn update(&self, id: i32, patch: &StudentUpdate) -> AlumnosResult<Student> {
        self.send_json(Method::PUT, &format!("/alumnos/{id}"), patch)
            .await
    }

    pub async fn delete(&self, id: i32) -> AlumnosResult<ApiMessage> {
        self.send_empty(Method::DELETE, &format!("/alumnos/{id}"))
            .await
    }

    pub async fn deactivate(&self, id: i32) -> AlumnosResult<ApiMessage> {
        self.send_empty(Method::PATCH, &format!("/alumnos/{id}/desactivar"))
            .await
    }

    pub async fn activate(&self, id: i32) -> AlumnosResult<ApiMessage> {
        self.send_empty(Method::PATCH, &format!("/alumnos/{id}/activar"))
            .await
    }

    pub async fn statistics(&self) -> AlumnosResult<Statistics> {
        self.send_empty(Method::GET, "/estadisticas").await
    }

    ///diagnostics only, never part of the CRUD flow
    pub async fn test_connection(&self) -> AlumnosResult<ServiceInfo> {
        self.send_empty(Method::GET, "/").await
    }

    pub async fn health_check(&self) -> AlumnosResult<HealthStatus> {
        self.send_empty(Method::GET, "/health")
            .await
            .map_err(|e| {
                warn!(?e, "Health check failed");
                AlumnosError::HealthCheck
            })
    }
}
