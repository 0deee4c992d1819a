//! Pooled content endpoints.

use crate::{Exchange, Form, Session};
use oae_core::{Error, PoolId, Result};
use serde::Deserialize;
use serde_json::Value;

const CREATE_FILE_PATH: &str = "/system/pool/createfile";

#[derive(Debug, Deserialize)]
struct PooledItem {
    #[serde(rename = "poolId")]
    pool_id: String,
}

#[derive(Debug, Deserialize)]
struct ContentItemResponse {
    #[serde(rename = "_contentItem")]
    content_item: PooledItem,
}

/// Creates pooled content through `/system/pool/createfile`.
#[derive(Debug, Clone, Copy)]
pub struct FileManager<'a> {
    session: &'a Session,
}

impl<'a> FileManager<'a> {
    /// Creates a manager issuing requests through `session`.
    #[must_use]
    pub const fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Uploads `data` as a pooled file named `name`.
    ///
    /// The returned exchange is unchecked; its body is a JSON object keyed
    /// by `name`. See [`FileManager::uploaded_pool_id`].
    ///
    /// # Errors
    ///
    /// Returns `Error::RequestFailed` if no response was received.
    pub async fn upload_pooled_file(
        &self,
        name: &str,
        data: impl Into<Vec<u8>>,
        mime: &str,
    ) -> Result<Exchange> {
        let url = self.session.url_for(CREATE_FILE_PATH)?;
        let exchange = self
            .session
            .execute_file_post(url, name, name, data.into(), mime)
            .await?;
        tracing::debug!(file = name, status = exchange.status(), "Uploaded pooled file");
        Ok(exchange)
    }

    /// Creates a pooled item from form fields (no file body), as the
    /// document editor does.
    ///
    /// # Errors
    ///
    /// Returns `Error::RequestFailed` if no response was received.
    pub async fn create_pooled_item(&self, form: &Form) -> Result<Exchange> {
        let url = self.session.url_for(CREATE_FILE_PATH)?;
        self.session.execute_post(url, form).await
    }

    /// Reads the pool id from an upload response, `{"<name>": {"poolId": ..}}`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidResponse` if the body has no entry for `name`.
    pub fn uploaded_pool_id(exchange: &Exchange, name: &str) -> Result<PoolId> {
        let body: Value = exchange.json()?;
        let pool_id = body
            .get(name)
            .and_then(|item| item.get("poolId"))
            .and_then(Value::as_str)
            .ok_or_else(|| Error::InvalidResponse {
                message: format!("upload response has no poolId for '{name}'"),
                source: None,
            })?;
        PoolId::new(pool_id)
    }

    /// Reads the pool id from a form-created item, `{"_contentItem": {"poolId": ..}}`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidResponse` if the body lacks `_contentItem.poolId`.
    pub fn created_pool_id(exchange: &Exchange) -> Result<PoolId> {
        let response: ContentItemResponse = exchange.json()?;
        PoolId::new(response.content_item.pool_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn exchange(body: &str) -> Exchange {
        let url = Url::parse("http://localhost:8080/system/pool/createfile").unwrap();
        Exchange::new("POST", url, 201, body.to_string())
    }

    #[test]
    fn test_uploaded_pool_id() {
        let body = r#"{"notes-42":{"poolId":"gAbc123","item":{"sakai:pooled-content-file-name":"notes-42"}}}"#;
        let id = FileManager::uploaded_pool_id(&exchange(body), "notes-42").unwrap();
        assert_eq!(id.as_str(), "gAbc123");
    }

    #[test]
    fn test_uploaded_pool_id_missing_entry() {
        let body = r#"{"other":{"poolId":"gAbc123"},"notes-42":{"item":{}}}"#;
        let err = FileManager::uploaded_pool_id(&exchange(body), "notes-42").unwrap_err();
        assert!(err.to_string().contains("notes-42"));
    }

    #[test]
    fn test_created_pool_id() {
        let body = r#"{"_contentItem":{"poolId":"xyz","item":{"mimeType":"x-sakai/document"}}}"#;
        let id = FileManager::created_pool_id(&exchange(body)).unwrap();
        assert_eq!(id.content_path(), "/p/xyz");
    }

    #[test]
    fn test_created_pool_id_rejects_other_shapes() {
        assert!(FileManager::created_pool_id(&exchange(r#"{"poolId":"xyz"}"#)).is_err());
        assert!(FileManager::created_pool_id(&exchange("")).is_err());
    }
}
