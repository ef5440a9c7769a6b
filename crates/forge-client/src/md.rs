//! Model derivative client: translation jobs and their outputs
//!
//! The usual workflow: upload a design file (see `oss`), turn its object ID
//! into a URN with [`urnify`], submit a translation job, poll the manifest
//! until the job settles, then download derivatives or thumbnails.

use std::collections::HashMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use serde::{Deserialize, Serialize};

use common::Scope;

use crate::error::Result;
use crate::transport::Transport;
use crate::{ClientOptions, Credentials};

const READ_SCOPES: &[Scope] = &[Scope::DataRead, Scope::ViewablesRead];
const WRITE_SCOPES: &[Scope] = &[Scope::DataWrite, Scope::DataRead];

/// Convert an object ID into the base64-encoded URN the derivative
/// endpoints expect.
///
/// Standard base64 alphabet with `=` padding stripped; restoring the
/// padding and decoding recovers the original ID byte for byte.
pub fn urnify(id: &str) -> String {
    STANDARD_NO_PAD.encode(id.as_bytes())
}

/// Thumbnail edge length in pixels, sent as the `width` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThumbnailSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl ThumbnailSize {
    pub fn width(self) -> u32 {
        match self {
            ThumbnailSize::Small => 100,
            ThumbnailSize::Medium => 200,
            ThumbnailSize::Large => 400,
        }
    }
}

/// Supported output formats mapped to the input formats they can be
/// produced from.
pub type DerivativeFormats = HashMap<String, Vec<String>>;

/// One requested output of a translation job.
#[derive(Debug, Clone, Serialize)]
pub struct OutputFormat {
    #[serde(rename = "type")]
    pub format_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub views: Option<Vec<String>>,
}

impl OutputFormat {
    /// Viewer-ready SVF output with the given views (`"2d"`, `"3d"`).
    pub fn svf(views: &[&str]) -> Self {
        Self {
            format_type: "svf".into(),
            views: Some(views.iter().map(|v| v.to_string()).collect()),
        }
    }
}

/// Acknowledgement returned when a translation job is accepted.
#[derive(Debug, Clone, Deserialize)]
pub struct TranslationJob {
    pub result: String,
    pub urn: String,
}

/// Manifest describing the state of all derivatives of a design.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(rename = "type")]
    pub manifest_type: String,
    pub has_thumbnail: String,
    pub status: String,
    pub progress: String,
    pub region: String,
    pub urn: String,
    pub version: String,
    #[serde(default)]
    pub derivatives: Vec<Derivative>,
}

/// One output of a translation, possibly still in progress.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Derivative {
    pub status: String,
    #[serde(default)]
    pub progress: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub has_thumbnail: Option<String>,
    #[serde(default)]
    pub output_type: Option<String>,
    #[serde(default)]
    pub children: Vec<DerivativeChild>,
}

/// Node in a derivative's resource tree. The `child_type` discriminates
/// resources, geometry, and views; fields not applicable to a node's type
/// stay empty.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivativeChild {
    pub guid: String,
    #[serde(rename = "type")]
    pub child_type: String,
    pub role: String,
    pub status: String,
    #[serde(default)]
    pub progress: Option<String>,
    #[serde(default)]
    pub urn: Option<String>,
    #[serde(default)]
    pub mime: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub children: Vec<DerivativeChild>,
}

/// List of viewables available for a translated design.
#[derive(Debug, Clone, Deserialize)]
pub struct DerivativeMetadata {
    #[serde(default)]
    pub metadata: Vec<MetadataEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetadataEntry {
    pub guid: String,
    pub name: String,
    pub role: String,
}

/// Object hierarchy of one viewable.
#[derive(Debug, Clone, Deserialize)]
pub struct DerivativeTree {
    #[serde(default)]
    pub objects: Vec<serde_json::Value>,
}

/// Property collection of one viewable.
#[derive(Debug, Clone, Deserialize)]
pub struct DerivativeProperties {
    #[serde(default)]
    pub collection: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
struct FormatsEnvelope {
    formats: DerivativeFormats,
}

#[derive(Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Serialize)]
struct JobPayload<'a> {
    input: JobInput<'a>,
    output: JobOutput<'a>,
}

#[derive(Serialize)]
struct JobInput<'a> {
    urn: &'a str,
}

#[derive(Serialize)]
struct JobOutput<'a> {
    formats: &'a [OutputFormat],
    destination: JobDestination,
}

#[derive(Serialize)]
struct JobDestination {
    region: common::Region,
}

/// Client for the model derivative endpoints.
pub struct ModelDerivativeClient {
    transport: Transport,
}

impl ModelDerivativeClient {
    pub fn new(credentials: Credentials, options: ClientOptions) -> Self {
        Self {
            transport: Transport::new(credentials, options),
        }
    }

    /// List the supported translation output formats.
    pub async fn get_formats(&self) -> Result<DerivativeFormats> {
        let token = self.transport.token(READ_SCOPES).await?;
        let request = self
            .transport
            .http
            .get(self.transport.url("/modelderivative/v2/designdata/formats"))
            .bearer_auth(&token.access_token);
        let response = self.transport.send(request).await?;
        let envelope: FormatsEnvelope = Transport::json(response).await?;
        Ok(envelope.formats)
    }

    /// Submit a translation job for a design.
    ///
    /// With `force` set, existing derivatives are regenerated even when the
    /// design was already translated to the requested formats.
    pub async fn submit_job(
        &self,
        urn: &str,
        output_formats: &[OutputFormat],
        force: bool,
    ) -> Result<TranslationJob> {
        let token = self.transport.token(WRITE_SCOPES).await?;
        let request = self
            .transport
            .http
            .post(self.transport.url("/modelderivative/v2/designdata/job"))
            .bearer_auth(&token.access_token)
            .header("x-ads-force", force.to_string())
            .json(&JobPayload {
                input: JobInput { urn },
                output: JobOutput {
                    formats: output_formats,
                    destination: JobDestination {
                        region: self.transport.region,
                    },
                },
            });
        let response = self.transport.send(request).await?;
        Transport::json(response).await
    }

    /// Retrieve the manifest of a translated design.
    pub async fn get_manifest(&self, urn: &str) -> Result<Manifest> {
        let token = self.transport.token(READ_SCOPES).await?;
        let request = self
            .transport
            .http
            .get(self.transport.url(&format!(
                "/modelderivative/v2/designdata/{urn}/manifest"
            )))
            .bearer_auth(&token.access_token);
        let response = self.transport.send(request).await?;
        Transport::json(response).await
    }

    /// Delete the manifest and all derivatives produced for a design.
    pub async fn delete_manifest(&self, urn: &str) -> Result<()> {
        let token = self.transport.token(WRITE_SCOPES).await?;
        let request = self
            .transport
            .http
            .delete(self.transport.url(&format!(
                "/modelderivative/v2/designdata/{urn}/manifest"
            )))
            .bearer_auth(&token.access_token);
        self.transport.send(request).await?;
        Ok(())
    }

    /// List the viewables of a translated design.
    pub async fn get_metadata(&self, urn: &str) -> Result<DerivativeMetadata> {
        let token = self.transport.token(READ_SCOPES).await?;
        let request = self
            .transport
            .http
            .get(self.transport.url(&format!(
                "/modelderivative/v2/designdata/{urn}/metadata"
            )))
            .bearer_auth(&token.access_token);
        let response = self.transport.send(request).await?;
        let envelope: DataEnvelope<DerivativeMetadata> = Transport::json(response).await?;
        Ok(envelope.data)
    }

    /// Retrieve the object tree of one viewable.
    ///
    /// `force_large_result` queries past the response size limit;
    /// `force_rebuild` regenerates the derivative before answering.
    pub async fn get_derivative_tree(
        &self,
        urn: &str,
        guid: &str,
        force_large_result: bool,
        force_rebuild: bool,
    ) -> Result<DerivativeTree> {
        let token = self.transport.token(READ_SCOPES).await?;
        let mut request = self
            .transport
            .http
            .get(self.transport.url(&format!(
                "/modelderivative/v2/designdata/{urn}/metadata/{guid}"
            )))
            .bearer_auth(&token.access_token)
            .header("x-ads-force", force_rebuild.to_string());
        if force_large_result {
            request = request.query(&[("forceget", "true")]);
        }
        let response = self.transport.send(request).await?;
        let envelope: DataEnvelope<DerivativeTree> = Transport::json(response).await?;
        Ok(envelope.data)
    }

    /// Retrieve properties of one viewable, optionally narrowed to a single
    /// object.
    pub async fn get_derivative_properties(
        &self,
        urn: &str,
        guid: &str,
        object_id: Option<u64>,
        force_large_result: bool,
        force_rebuild: bool,
    ) -> Result<DerivativeProperties> {
        let token = self.transport.token(READ_SCOPES).await?;
        let mut request = self
            .transport
            .http
            .get(self.transport.url(&format!(
                "/modelderivative/v2/designdata/{urn}/metadata/{guid}/properties"
            )))
            .bearer_auth(&token.access_token)
            .header("x-ads-force", force_rebuild.to_string());
        if let Some(id) = object_id {
            request = request.query(&[("objectid", id.to_string())]);
        }
        if force_large_result {
            request = request.query(&[("forceget", "true")]);
        }
        let response = self.transport.send(request).await?;
        let envelope: DataEnvelope<DerivativeProperties> = Transport::json(response).await?;
        Ok(envelope.data)
    }

    /// Download the content of one derivative of a translated design.
    pub async fn download_derivative(
        &self,
        model_urn: &str,
        derivative_urn: &str,
    ) -> Result<Vec<u8>> {
        let token = self.transport.token(READ_SCOPES).await?;
        let request = self
            .transport
            .http
            .get(self.transport.url(&format!(
                "/modelderivative/v2/designdata/{model_urn}/manifest/{derivative_urn}"
            )))
            .bearer_auth(&token.access_token);
        let response = self.transport.send(request).await?;
        Transport::bytes(response).await
    }

    /// Download the thumbnail of a translated design.
    pub async fn get_thumbnail(&self, urn: &str, size: ThumbnailSize) -> Result<Vec<u8>> {
        let token = self.transport.token(READ_SCOPES).await?;
        let request = self
            .transport
            .http
            .get(self.transport.url(&format!(
                "/modelderivative/v2/designdata/{urn}/thumbnail"
            )))
            .bearer_auth(&token.access_token)
            .query(&[("width", size.width().to_string())]);
        let response = self.transport.send(request).await?;
        Transport::bytes(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD;
    use common::Region;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> ModelDerivativeClient {
        ModelDerivativeClient::new(
            Credentials::Token("test-token".into()),
            ClientOptions {
                region: Region::Us,
                host: server.uri(),
            },
        )
    }

    #[test]
    fn urnify_matches_known_value() {
        assert_eq!(
            urnify("urn:adsk.objects:os.object:my-bucket/my-file.dwg"),
            "dXJuOmFkc2sub2JqZWN0czpvcy5vYmplY3Q6bXktYnVja2V0L215LWZpbGUuZHdn"
        );
    }

    #[test]
    fn urnify_strips_padding() {
        // "ab" encodes to "YWI=" with padding
        assert_eq!(urnify("ab"), "YWI");
    }

    #[test]
    fn urnify_round_trips_after_restoring_padding() {
        let id = "urn:adsk.objects:os.object:bucket/file.rvt";
        let mut urn = urnify(id);
        assert!(!urn.contains('='));
        while urn.len() % 4 != 0 {
            urn.push('=');
        }
        let decoded = STANDARD.decode(&urn).unwrap();
        assert_eq!(decoded, id.as_bytes());
    }

    #[test]
    fn urnify_is_deterministic() {
        assert_eq!(urnify("same-input"), urnify("same-input"));
    }

    #[test]
    fn thumbnail_sizes_map_to_pixel_widths() {
        assert_eq!(ThumbnailSize::Small.width(), 100);
        assert_eq!(ThumbnailSize::Medium.width(), 200);
        assert_eq!(ThumbnailSize::Large.width(), 400);
        assert_eq!(ThumbnailSize::default(), ThumbnailSize::Medium);
    }

    #[tokio::test]
    async fn get_formats_unwraps_formats_map() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/modelderivative/v2/designdata/formats"))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "formats": {
                    "svf": ["dwg", "rvt"],
                    "obj": ["ipt"]
                }
            })))
            .mount(&server)
            .await;

        let formats = client(&server).get_formats().await.unwrap();
        assert_eq!(formats["svf"], vec!["dwg", "rvt"]);
        assert_eq!(formats["obj"], vec!["ipt"]);
    }

    #[tokio::test]
    async fn submit_job_posts_input_output_and_force_header() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/modelderivative/v2/designdata/job"))
            .and(header("x-ads-force", "true"))
            .and(body_json(serde_json::json!({
                "input": { "urn": "dXJu" },
                "output": {
                    "formats": [{ "type": "svf", "views": ["2d", "3d"] }],
                    "destination": { "region": "us" }
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "result": "created",
                "urn": "dXJu"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let job = client(&server)
            .submit_job("dXJu", &[OutputFormat::svf(&["2d", "3d"])], true)
            .await
            .unwrap();
        assert_eq!(job.result, "created");
        assert_eq!(job.urn, "dXJu");
    }

    #[tokio::test]
    async fn get_manifest_maps_derivative_tree() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/modelderivative/v2/designdata/dXJu/manifest"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "type": "manifest",
                "hasThumbnail": "true",
                "status": "success",
                "progress": "complete",
                "region": "US",
                "urn": "dXJu",
                "version": "1.0",
                "derivatives": [{
                    "status": "success",
                    "progress": "complete",
                    "outputType": "svf",
                    "children": [{
                        "guid": "guid-1",
                        "type": "resource",
                        "role": "graphics",
                        "status": "success",
                        "urn": "urn:derivative/part.svf",
                        "mime": "application/autodesk-svf"
                    }]
                }]
            })))
            .mount(&server)
            .await;

        let manifest = client(&server).get_manifest("dXJu").await.unwrap();
        assert_eq!(manifest.status, "success");
        assert_eq!(manifest.derivatives.len(), 1);
        let child = &manifest.derivatives[0].children[0];
        assert_eq!(child.child_type, "resource");
        assert_eq!(child.mime.as_deref(), Some("application/autodesk-svf"));
    }

    #[tokio::test]
    async fn get_metadata_lists_viewables() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/modelderivative/v2/designdata/dXJu/metadata"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {
                    "type": "metadata",
                    "metadata": [
                        { "guid": "guid-1", "name": "Default view", "role": "3d" }
                    ]
                }
            })))
            .mount(&server)
            .await;

        let metadata = client(&server).get_metadata("dXJu").await.unwrap();
        assert_eq!(metadata.metadata.len(), 1);
        assert_eq!(metadata.metadata[0].role, "3d");
    }

    #[tokio::test]
    async fn get_derivative_properties_sends_object_filter() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/modelderivative/v2/designdata/dXJu/metadata/guid-1/properties"))
            .and(query_param("objectid", "42"))
            .and(query_param("forceget", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {
                    "type": "properties",
                    "collection": [{ "objectid": 42, "name": "Wall" }]
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let properties = client(&server)
            .get_derivative_properties("dXJu", "guid-1", Some(42), true, false)
            .await
            .unwrap();
        assert_eq!(properties.collection.len(), 1);
    }

    #[tokio::test]
    async fn get_thumbnail_requests_width_and_returns_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/modelderivative/v2/designdata/dXJu/thumbnail"))
            .and(query_param("width", "400"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"png-bytes".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let thumbnail = client(&server)
            .get_thumbnail("dXJu", ThumbnailSize::Large)
            .await
            .unwrap();
        assert_eq!(thumbnail, b"png-bytes");
    }

    #[tokio::test]
    async fn download_derivative_returns_raw_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/modelderivative/v2/designdata/dXJu/manifest/urn:derivative%2Fpart.svf"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"svf-bytes".to_vec()))
            .mount(&server)
            .await;

        let data = client(&server)
            .download_derivative("dXJu", "urn:derivative%2Fpart.svf")
            .await
            .unwrap();
        assert_eq!(data, b"svf-bytes");
    }
}
