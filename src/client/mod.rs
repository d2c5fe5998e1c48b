pub mod files;

use crate::{
    config::ClientConfig,
    error::{AvatarError, Result},
    logger,
    models::{
        ApiStatus, AvatarResponse, BatchRequest, BatchSaveRequest, GenerateRequest, SaveRequest,
    },
};
use reqwest::{header, Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

pub use files::{batch_archive_name, list_artifacts, svg_archive_name, timestamp_filename};

/// Client for the avatar generation API.
///
/// Holds the configuration and a single pooled transport. Cloning is cheap and
/// clones share the same connection pool.
#[derive(Clone)]
pub struct AvatarClient {
    config: ClientConfig,
    http: Client,
}

impl AvatarClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AvatarError::ConfigError(format!("Could not build HTTP client: {}", e)))?;

        log::debug!(
            "Avatar client ready for {} (timeout {}s)",
            config.base_url,
            config.request_timeout.as_secs()
        );

        Ok(Self { config, http })
    }

    /// Builds a client for `base_url`, falling back to the default endpoint when it is empty.
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        Self::new(ClientConfig::new().with_base_url(base_url))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// `GET /test`. Returns the body text when the service answers 200.
    pub async fn test_connectivity(&self) -> Result<String> {
        let operation = "test_connectivity";
        let response = self.get_ok(operation, "/test", &[]).await?;

        let body = response
            .text()
            .await
            .map_err(|e| AvatarError::request(operation, e))?;

        log::info!("API test succeeded: {}", body);
        Ok(body)
    }

    /// `GET /test`, decoded into the service's status document.
    pub async fn api_status(&self) -> Result<ApiStatus> {
        let operation = "api_status";
        let response = self.get_ok(operation, "/test", &[]).await?;
        decode_json(operation, response).await
    }

    /// `POST /avatar/generate`. The `success` flag is left for the caller to inspect.
    pub async fn generate_avatar(&self, size: u32, gender: &str) -> Result<AvatarResponse> {
        let operation = "generate_avatar";
        let _timer = logger::timer(operation);

        let request = GenerateRequest {
            size,
            gender: gender.to_string(),
        };
        let response = self.post_json(operation, "/avatar/generate", &request).await?;
        decode_json(operation, response).await
    }

    /// `POST /avatar/save`, writing the returned file to `{filename}.{format}`
    /// in the output directory. An empty filename becomes `avatar_{timestamp}`.
    pub async fn save_avatar(
        &self,
        size: u32,
        gender: &str,
        format: &str,
        filename: &str,
    ) -> Result<PathBuf> {
        let operation = "save_avatar";
        let _timer = logger::timer(operation);

        let filename = if filename.is_empty() {
            timestamp_filename(files::unix_timestamp())
        } else {
            filename.to_string()
        };

        let request = SaveRequest {
            size,
            gender: gender.to_string(),
            format: format.to_string(),
            filename: filename.clone(),
        };
        let response = self.post_json(operation, "/avatar/save", &request).await?;
        let response = ensure_saved(operation, response).await?;

        let path = self.config.output_dir.join(format!("{}.{}", filename, format));
        let written = files::write_response_body(operation, response, &path).await?;

        log::info!(
            "{} avatar saved: {} ({} bytes)",
            format.to_uppercase(),
            path.display(),
            written
        );
        Ok(path)
    }

    /// `POST /avatar/save/batch`, writing the returned archive to
    /// `avatars_{format}_{timestamp}.zip` in the output directory.
    pub async fn batch_save_avatars(
        &self,
        amount: u32,
        size: u32,
        gender: &str,
        format: &str,
    ) -> Result<PathBuf> {
        let operation = "batch_save_avatars";
        let _timer = logger::timer(operation);

        let request = BatchSaveRequest {
            amount,
            size,
            gender: gender.to_string(),
            format: format.to_string(),
        };
        let response = self.post_json(operation, "/avatar/save/batch", &request).await?;
        let response = ensure_saved(operation, response).await?;

        let path = self
            .config
            .output_dir
            .join(batch_archive_name(format, files::unix_timestamp()));
        let written = files::write_response_body(operation, response, &path).await?;

        log::info!(
            "Batch of {} {} avatars saved: {} ({} bytes)",
            amount,
            format.to_uppercase(),
            path.display(),
            written
        );
        Ok(path)
    }

    /// `POST /avatar/batch`, an SVG-only archive written to `avatars_{timestamp}.zip`.
    pub async fn batch_avatars(&self, amount: u32, size: u32, gender: &str) -> Result<PathBuf> {
        let operation = "batch_avatars";
        let _timer = logger::timer(operation);

        let request = BatchRequest {
            amount,
            size,
            gender: gender.to_string(),
        };
        let response = self.post_json(operation, "/avatar/batch", &request).await?;
        let response = ensure_saved(operation, response).await?;

        let path = self
            .config
            .output_dir
            .join(svg_archive_name(files::unix_timestamp()));
        let written = files::write_response_body(operation, response, &path).await?;

        log::info!(
            "Batch of {} SVG avatars saved: {} ({} bytes)",
            amount,
            path.display(),
            written
        );
        Ok(path)
    }

    /// `GET /avatar/json?size=&gender=`.
    pub async fn get_avatar_json(&self, size: u32, gender: &str) -> Result<AvatarResponse> {
        let operation = "get_avatar_json";
        let _timer = logger::timer(operation);

        let size = size.to_string();
        let query = [("size", size.as_str()), ("gender", gender)];
        let response = self.get(operation, "/avatar/json", &query).await?;
        decode_json(operation, response).await
    }

    /// `GET /avatar/one?renderer=svg&size=&gender=`, returning the raw SVG markup.
    pub async fn get_avatar_svg(&self, size: u32, gender: &str) -> Result<String> {
        let operation = "get_avatar_svg";
        let _timer = logger::timer(operation);

        let size = size.to_string();
        let query = [("renderer", "svg"), ("size", size.as_str()), ("gender", gender)];
        let response = self.get_ok(operation, "/avatar/one", &query).await?;

        response
            .text()
            .await
            .map_err(|e| AvatarError::request(operation, e))
    }

    /// Generated `.svg`, `.png` and `.zip` files in the output directory.
    pub async fn list_artifacts(&self) -> Result<Vec<crate::models::Artifact>> {
        list_artifacts(&self.config.output_dir).await
    }

    async fn get(
        &self,
        operation: &'static str,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Response> {
        let request_id = Uuid::new_v4();
        let url = self.config.endpoint(path);
        log::debug!("[{}] {} GET {}", request_id, operation, url);

        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| AvatarError::request(operation, e))?;

        log::debug!("[{}] {} -> {}", request_id, operation, response.status());
        Ok(response)
    }

    async fn get_ok(
        &self,
        operation: &'static str,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Response> {
        let response = self.get(operation, path, query).await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(AvatarError::RequestFailed {
                operation,
                status: Some(status.as_u16()),
                message: format!("status {}", status.as_u16()),
            });
        }
        Ok(response)
    }

    async fn post_json<T: Serialize>(
        &self,
        operation: &'static str,
        path: &str,
        body: &T,
    ) -> Result<Response> {
        let payload = serde_json::to_vec(body)
            .map_err(|source| AvatarError::SerializationError { operation, source })?;

        let request_id = Uuid::new_v4();
        let url = self.config.endpoint(path);
        log::debug!("[{}] {} POST {} ({} bytes)", request_id, operation, url, payload.len());

        let response = self
            .http
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(|e| AvatarError::request(operation, e))?;

        log::debug!("[{}] {} -> {}", request_id, operation, response.status());
        Ok(response)
    }
}

/// Rejects anything but 200, keeping the body text for diagnostics.
async fn ensure_saved(operation: &'static str, response: Response) -> Result<Response> {
    let status = response.status();
    if status == StatusCode::OK {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    log::warn!("{} rejected with status {}", operation, status.as_u16());
    Err(AvatarError::SaveFailed {
        operation,
        status: status.as_u16(),
        body,
    })
}

async fn decode_json<T: DeserializeOwned>(
    operation: &'static str,
    response: Response,
) -> Result<T> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| AvatarError::request(operation, e))?;

    serde_json::from_slice(&bytes).map_err(|e| AvatarError::DecodeError {
        operation,
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests;
