//! Object storage client: buckets and the objects stored in them
//!
//! Listing endpoints are exposed twice: `enumerate_*` returns a lazy stream
//! of batches, `list_*` pulls the whole listing into one vector. Read
//! operations request a narrower scope set than mutating ones.

use futures::{Stream, TryStreamExt};
use serde::{Deserialize, Serialize};

use common::Scope;

use crate::error::Result;
use crate::pagination::{Page, paginate};
use crate::transport::Transport;
use crate::{ClientOptions, Credentials};

const READ_SCOPES: &[Scope] = &[Scope::BucketRead, Scope::DataRead];
const WRITE_SCOPES: &[Scope] = &[Scope::BucketCreate, Scope::BucketDelete, Scope::DataWrite];

/// Max items per listing page when the caller does not pick a size
/// (allowed range 1-100).
const DEFAULT_PAGE_SIZE: usize = 64;

/// Summary of a bucket as returned by the listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    pub bucket_key: String,
    pub created_date: u64,
    pub policy_key: String,
}

/// Access granted to an application on a bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketPermission {
    pub auth_id: String,
    pub access: String,
}

/// Full bucket record including ownership and permissions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketDetails {
    pub bucket_key: String,
    pub bucket_owner: String,
    pub created_date: u64,
    pub policy_key: String,
    #[serde(default)]
    pub permissions: Vec<BucketPermission>,
}

/// How long objects uploaded to a bucket are retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataRetentionPolicy {
    Transient,
    Temporary,
    Persistent,
}

/// Access level granted to another application on bucket creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BucketAccessLevel {
    Full,
    Read,
}

/// Authorization entry for another application on bucket creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketAccess {
    pub auth_id: String,
    pub access: BucketAccessLevel,
}

/// An object stored in a bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectDetails {
    pub bucket_key: String,
    pub object_key: String,
    pub object_id: String,
    #[serde(default)]
    pub sha1: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub location: Option<String>,
}

/// Pre-signed URL granting temporary access to one object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedUrl {
    pub signed_url: String,
    pub expiration: u64,
    #[serde(default)]
    pub single_use: bool,
}

/// Access mode a signed URL is created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignedUrlAccess {
    #[default]
    Read,
    Write,
    ReadWrite,
}

impl SignedUrlAccess {
    fn as_str(self) -> &'static str {
        match self {
            SignedUrlAccess::Read => "read",
            SignedUrlAccess::Write => "write",
            SignedUrlAccess::ReadWrite => "readwrite",
        }
    }
}

#[derive(Deserialize)]
struct Listing<T> {
    items: Vec<T>,
    next: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateBucketPayload<'a> {
    bucket_key: &'a str,
    policy_key: DataRetentionPolicy,
    #[serde(skip_serializing_if = "Option::is_none")]
    allow: Option<&'a [BucketAccess]>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignedUrlPayload {
    minutes_expiration: u64,
}

/// Client for the object storage endpoints.
pub struct OssClient {
    transport: Transport,
}

impl OssClient {
    pub fn new(credentials: Credentials, options: ClientOptions) -> Self {
        Self {
            transport: Transport::new(credentials, options),
        }
    }

    /// Enumerate all buckets in batches of `page_size` (default 64).
    ///
    /// Credentials are re-acquired for every page, so traversals longer
    /// than one token lifetime keep working.
    pub fn enumerate_buckets(
        &self,
        page_size: Option<usize>,
    ) -> impl Stream<Item = Result<Vec<Bucket>>> {
        let limit = page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        paginate(move |cursor| async move {
            let token = self.transport.token(READ_SCOPES).await?;
            let mut request = self
                .transport
                .http
                .get(self.transport.url("/oss/v2/buckets"))
                .bearer_auth(&token.access_token)
                .query(&[("limit", limit.to_string())])
                .query(&[("region", self.transport.region.as_str())]);
            if let Some(start_at) = &cursor {
                request = request.query(&[("startAt", start_at)]);
            }
            let response = self.transport.send(request).await?;
            let listing: Listing<Bucket> = Transport::json(response).await?;
            Ok(Page {
                items: listing.items,
                next: listing.next,
            })
        })
    }

    /// List all buckets as one vector.
    pub async fn list_buckets(&self) -> Result<Vec<Bucket>> {
        self.enumerate_buckets(None).try_concat().await
    }

    pub async fn get_bucket_details(&self, bucket_key: &str) -> Result<BucketDetails> {
        let token = self.transport.token(READ_SCOPES).await?;
        let request = self
            .transport
            .http
            .get(self.transport.url(&format!("/oss/v2/buckets/{bucket_key}/details")))
            .bearer_auth(&token.access_token);
        let response = self.transport.send(request).await?;
        Transport::json(response).await
    }

    /// Create a bucket in the client's region.
    ///
    /// Fails with a conflict status when a bucket with this key already
    /// exists (bucket keys are globally unique).
    pub async fn create_bucket(
        &self,
        bucket_key: &str,
        policy: DataRetentionPolicy,
        allow: Option<&[BucketAccess]>,
    ) -> Result<BucketDetails> {
        let token = self.transport.token(WRITE_SCOPES).await?;
        let request = self
            .transport
            .http
            .post(self.transport.url("/oss/v2/buckets"))
            .bearer_auth(&token.access_token)
            .header("x-ads-region", self.transport.region.as_str())
            .json(&CreateBucketPayload {
                bucket_key,
                policy_key: policy,
                allow,
            });
        let response = self.transport.send(request).await?;
        Transport::json(response).await
    }

    pub async fn delete_bucket(&self, bucket_key: &str) -> Result<()> {
        let token = self.transport.token(WRITE_SCOPES).await?;
        let request = self
            .transport
            .http
            .delete(self.transport.url(&format!("/oss/v2/buckets/{bucket_key}")))
            .bearer_auth(&token.access_token);
        self.transport.send(request).await?;
        Ok(())
    }

    /// Enumerate objects in a bucket in batches of `page_size` (default 64),
    /// optionally restricted to keys starting with `begins_with`.
    pub fn enumerate_objects(
        &self,
        bucket_key: &str,
        begins_with: Option<&str>,
        page_size: Option<usize>,
    ) -> impl Stream<Item = Result<Vec<ObjectDetails>>> {
        let path = format!("/oss/v2/buckets/{bucket_key}/objects");
        let begins_with = begins_with.map(str::to_owned);
        let limit = page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        paginate(move |cursor| {
            let path = path.clone();
            let begins_with = begins_with.clone();
            async move {
                let token = self.transport.token(READ_SCOPES).await?;
                let mut request = self
                    .transport
                    .http
                    .get(self.transport.url(&path))
                    .bearer_auth(&token.access_token)
                    .query(&[("limit", limit.to_string())]);
                if let Some(prefix) = &begins_with {
                    request = request.query(&[("beginsWith", prefix)]);
                }
                if let Some(start_at) = &cursor {
                    request = request.query(&[("startAt", start_at)]);
                }
                let response = self.transport.send(request).await?;
                let listing: Listing<ObjectDetails> = Transport::json(response).await?;
                Ok(Page {
                    items: listing.items,
                    next: listing.next,
                })
            }
        })
    }

    /// List all objects in a bucket as one vector.
    pub async fn list_objects(
        &self,
        bucket_key: &str,
        begins_with: Option<&str>,
    ) -> Result<Vec<ObjectDetails>> {
        self.enumerate_objects(bucket_key, begins_with, None)
            .try_concat()
            .await
    }

    pub async fn get_object_details(
        &self,
        bucket_key: &str,
        object_key: &str,
    ) -> Result<ObjectDetails> {
        let token = self.transport.token(READ_SCOPES).await?;
        let request = self
            .transport
            .http
            .get(self.transport.url(&format!(
                "/oss/v2/buckets/{bucket_key}/objects/{object_key}/details"
            )))
            .bearer_auth(&token.access_token);
        let response = self.transport.send(request).await?;
        Transport::json(response).await
    }

    /// Upload content to an object, creating or replacing it.
    pub async fn upload_object(
        &self,
        bucket_key: &str,
        object_key: &str,
        data: Vec<u8>,
    ) -> Result<ObjectDetails> {
        let token = self.transport.token(WRITE_SCOPES).await?;
        let request = self
            .transport
            .http
            .put(self.transport.url(&format!(
                "/oss/v2/buckets/{bucket_key}/objects/{object_key}"
            )))
            .bearer_auth(&token.access_token)
            .header("content-type", "application/octet-stream")
            .body(data);
        let response = self.transport.send(request).await?;
        Transport::json(response).await
    }

    /// Download the content of an object.
    pub async fn download_object(&self, bucket_key: &str, object_key: &str) -> Result<Vec<u8>> {
        let token = self.transport.token(READ_SCOPES).await?;
        let request = self
            .transport
            .http
            .get(self.transport.url(&format!(
                "/oss/v2/buckets/{bucket_key}/objects/{object_key}"
            )))
            .bearer_auth(&token.access_token);
        let response = self.transport.send(request).await?;
        Transport::bytes(response).await
    }

    /// Copy an object under a new key within the same bucket.
    pub async fn copy_object(
        &self,
        bucket_key: &str,
        object_key: &str,
        new_object_key: &str,
    ) -> Result<ObjectDetails> {
        let token = self.transport.token(WRITE_SCOPES).await?;
        let request = self
            .transport
            .http
            .put(self.transport.url(&format!(
                "/oss/v2/buckets/{bucket_key}/objects/{object_key}/copyto/{new_object_key}"
            )))
            .bearer_auth(&token.access_token);
        let response = self.transport.send(request).await?;
        Transport::json(response).await
    }

    pub async fn delete_object(&self, bucket_key: &str, object_key: &str) -> Result<()> {
        let token = self.transport.token(WRITE_SCOPES).await?;
        let request = self
            .transport
            .http
            .delete(self.transport.url(&format!(
                "/oss/v2/buckets/{bucket_key}/objects/{object_key}"
            )))
            .bearer_auth(&token.access_token);
        self.transport.send(request).await?;
        Ok(())
    }

    /// Create a signed URL for an object (default: read access, 60 minutes).
    pub async fn create_signed_url(
        &self,
        bucket_key: &str,
        object_key: &str,
        access: SignedUrlAccess,
        minutes_expiration: Option<u64>,
    ) -> Result<SignedUrl> {
        let token = self.transport.token(WRITE_SCOPES).await?;
        let request = self
            .transport
            .http
            .post(self.transport.url(&format!(
                "/oss/v2/buckets/{bucket_key}/objects/{object_key}/signed"
            )))
            .bearer_auth(&token.access_token)
            .query(&[("access", access.as_str())])
            .json(&SignedUrlPayload {
                minutes_expiration: minutes_expiration.unwrap_or(60),
            });
        let response = self.transport.send(request).await?;
        Transport::json(response).await
    }
}
