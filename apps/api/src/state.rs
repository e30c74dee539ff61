use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::config::Config;
use crate::models::template::TemplateCatalog;
use crate::pdf::image::ImageFetcher;
use crate::store::{BlobStore, MemoryBlobStore, MemoryStore, ResumeStore, UserStore};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub resumes: Arc<dyn ResumeStore>,
    pub blobs: Arc<dyn BlobStore>,
    /// Downloads profile photos ahead of PDF composition.
    pub images: ImageFetcher,
    pub templates: TemplateCatalog,
}

impl AppState {
    /// State backed entirely by process memory. Used when no database or bucket
    /// is configured, and by the route tests.
    pub fn in_memory(config: &Config) -> Self {
        let documents = Arc::new(MemoryStore::new());
        Self {
            users: documents.clone(),
            resumes: documents,
            blobs: Arc::new(MemoryBlobStore::new()),
            images: ImageFetcher::new(
                Duration::from_secs(config.image_fetch_timeout_secs),
                blob_endpoint_host(config).into_iter().collect(),
            ),
            templates: TemplateCatalog,
        }
    }
}

/// Host of a custom S3 endpoint (MinIO). Photos stored there may live on a
/// private address and are still fetched for PDF export.
fn blob_endpoint_host(config: &Config) -> Option<String> {
    let endpoint = config.s3.as_ref()?.endpoint.as_deref()?;
    Url::parse(endpoint)
        .ok()?
        .host_str()
        .map(|host| host.trim_matches(|c| c == '[' || c == ']').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::S3Config;

    fn with_endpoint(endpoint: Option<&str>) -> Config {
        let mut config = Config::local();
        config.s3 = Some(S3Config {
            bucket: "folio".to_string(),
            endpoint: endpoint.map(str::to_string),
            region: "us-east-1".to_string(),
            access_key_id: "minio".to_string(),
            secret_access_key: "minio123".to_string(),
        });
        config
    }

    #[test]
    fn test_blob_endpoint_host() {
        assert_eq!(blob_endpoint_host(&Config::local()), None);
        assert_eq!(blob_endpoint_host(&with_endpoint(None)), None);
        assert_eq!(
            blob_endpoint_host(&with_endpoint(Some("http://localhost:9000"))).as_deref(),
            Some("localhost")
        );
        assert_eq!(
            blob_endpoint_host(&with_endpoint(Some("http://[::1]:9000"))).as_deref(),
            Some("::1")
        );
    }
}
