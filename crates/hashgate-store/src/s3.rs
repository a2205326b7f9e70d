use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use hashgate_types::ObjectKey;
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};
use crate::object::{ObjectMeta, StoredObject, DEFAULT_CONTENT_TYPE};
use crate::traits::ObjectStore;

/// Connection settings for an S3-compatible endpoint.
///
/// Explicit credentials are used only when both halves are present;
/// otherwise the default AWS provider chain applies.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct S3Settings {
    pub endpoint_url: Option<String>,
    pub region: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    /// Address buckets as `endpoint/bucket` rather than `bucket.endpoint`.
    pub force_path_style: bool,
}

impl S3Settings {
    fn static_credentials(&self) -> Option<Credentials> {
        match (&self.access_key_id, &self.secret_access_key) {
            (Some(id), Some(secret)) => Some(Credentials::new(
                id.clone(),
                secret.clone(),
                None,
                None,
                "hashgate",
            )),
            _ => None,
        }
    }
}

impl std::fmt::Debug for S3Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Settings")
            .field("endpoint_url", &self.endpoint_url)
            .field("region", &self.region)
            .field("access_key_id", &self.access_key_id)
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "<redacted>"),
            )
            .field("force_path_style", &self.force_path_style)
            .finish()
    }
}

/// Object store backed by an S3-compatible service.
#[derive(Clone, Debug)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    /// Build a client from `settings`, resolving anything unset from the
    /// environment the way the AWS SDK normally does.
    pub async fn connect(settings: &S3Settings) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &settings.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(url) = &settings.endpoint_url {
            loader = loader.endpoint_url(url.clone());
        }
        if let Some(credentials) = settings.static_credentials() {
            loader = loader.credentials_provider(credentials);
        }
        let shared = loader.load().await;
        let config = aws_sdk_s3::config::Builder::from(&shared)
            .force_path_style(settings.force_path_style)
            .build();
        tracing::debug!(?settings, "S3 client configured");
        Self::from_client(Client::from_conf(config))
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

/// S3 reports a missing key as a bare 404 on HEAD and `NoSuchKey` on GET;
/// some compatible services only send the status.
fn is_not_found<E: ProvideErrorMetadata>(err: &SdkError<E, HttpResponse>) -> bool {
    if err
        .raw_response()
        .is_some_and(|resp| resp.status().as_u16() == 404)
    {
        return true;
    }
    matches!(err.code(), Some("NotFound" | "NoSuchKey"))
}

fn backend<E>(op: &str, key: &ObjectKey, err: SdkError<E, HttpResponse>) -> StoreError
where
    E: std::error::Error + 'static,
{
    StoreError::Backend(format!("{op} {key} failed: {}", DisplayErrorContext(&err)))
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn head_object(&self, bucket: &str, key: &ObjectKey) -> StoreResult<Option<ObjectMeta>> {
        match self
            .client
            .head_object()
            .bucket(bucket)
            .key(key.as_str())
            .send()
            .await
        {
            Ok(out) => Ok(Some(ObjectMeta {
                key: key.clone(),
                size: out.content_length().unwrap_or(0).max(0) as u64,
                content_type: out.content_type().map(str::to_string),
            })),
            Err(err) if is_not_found(&err) => Ok(None),
            Err(err) => Err(backend("HeadObject", key, err)),
        }
    }

    async fn get_object(&self, bucket: &str, key: &ObjectKey) -> StoreResult<Option<StoredObject>> {
        let out = match self
            .client
            .get_object()
            .bucket(bucket)
            .key(key.as_str())
            .send()
            .await
        {
            Ok(out) => out,
            Err(err) if is_not_found(&err) => return Ok(None),
            Err(err) => return Err(backend("GetObject", key, err)),
        };
        let content_type = out
            .content_type()
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();
        let data = out
            .body
            .collect()
            .await
            .map_err(|e| StoreError::Backend(format!("reading body of {key} failed: {e}")))?
            .into_bytes();
        Ok(Some(StoredObject::new(key.clone(), data, content_type)))
    }

    async fn put_object(&self, bucket: &str, object: &StoredObject) -> StoreResult<()> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(object.key.as_str())
            .body(ByteStream::from(object.data.clone()))
            .content_type(object.content_type.as_str())
            .send()
            .await
            .map_err(|err| backend("PutObject", &object.key, err))?;
        Ok(())
    }
}
