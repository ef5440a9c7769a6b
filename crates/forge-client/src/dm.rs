//! Data management client: hubs, projects, folders, items, versions
//!
//! All operations are read-only and share one scope. Responses arrive in a
//! `data` envelope; only the fields the library exposes are mapped, the
//! rest of each record is available through the `extension` value.

use serde::{Deserialize, Serialize};

use common::Scope;

use crate::error::Result;
use crate::transport::Transport;
use crate::{ClientOptions, Credentials};

const READ_SCOPES: &[Scope] = &[Scope::DataRead];

/// A hub accessible to the credentials in use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hub {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub extension: Option<serde_json::Value>,
}

/// A project within a hub.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub scopes: Option<Vec<String>>,
    #[serde(default)]
    pub extension: Option<serde_json::Value>,
}

/// A folder within a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Folder {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub extension: Option<serde_json::Value>,
}

/// An entry in a folder listing: either a subfolder or an item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderEntry {
    #[serde(rename = "type")]
    pub entry_type: String,
    pub id: String,
    #[serde(default)]
    pub extension: Option<serde_json::Value>,
}

/// A document or file tracked in a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    #[serde(default)]
    pub extension: Option<serde_json::Value>,
}

/// One version of an item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Version {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub extension: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

/// Client for the data management endpoints.
pub struct DataManagementClient {
    transport: Transport,
}

impl DataManagementClient {
    pub fn new(credentials: Credentials, options: ClientOptions) -> Self {
        Self {
            transport: Transport::new(credentials, options),
        }
    }

    async fn get_data<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let token = self.transport.token(READ_SCOPES).await?;
        let request = self
            .transport
            .http
            .get(self.transport.url(path))
            .bearer_auth(&token.access_token);
        let response = self.transport.send(request).await?;
        let envelope: DataEnvelope<T> = Transport::json(response).await?;
        Ok(envelope.data)
    }

    /// List all hubs accessible to the credentials in use.
    pub async fn list_hubs(&self) -> Result<Vec<Hub>> {
        self.get_data("/project/v1/hubs").await
    }

    pub async fn get_hub_details(&self, hub_id: &str) -> Result<Hub> {
        self.get_data(&format!("/project/v1/hubs/{hub_id}")).await
    }

    /// List all projects in a hub.
    pub async fn list_projects(&self, hub_id: &str) -> Result<Vec<Project>> {
        self.get_data(&format!("/project/v1/hubs/{hub_id}/projects"))
            .await
    }

    pub async fn get_project_details(&self, hub_id: &str, project_id: &str) -> Result<Project> {
        self.get_data(&format!("/project/v1/hubs/{hub_id}/projects/{project_id}"))
            .await
    }

    /// List the top-level folders of a project.
    pub async fn list_top_folders(&self, hub_id: &str, project_id: &str) -> Result<Vec<Folder>> {
        self.get_data(&format!(
            "/project/v1/hubs/{hub_id}/projects/{project_id}/topFolders"
        ))
        .await
    }

    /// List the contents of a folder (subfolders and items).
    pub async fn list_folder_contents(
        &self,
        project_id: &str,
        folder_id: &str,
    ) -> Result<Vec<FolderEntry>> {
        self.get_data(&format!(
            "/data/v1/projects/{project_id}/folders/{folder_id}/contents"
        ))
        .await
    }

    pub async fn get_item_details(&self, project_id: &str, item_id: &str) -> Result<Item> {
        self.get_data(&format!("/data/v1/projects/{project_id}/items/{item_id}"))
            .await
    }

    /// List all versions of an item.
    pub async fn list_item_versions(
        &self,
        project_id: &str,
        item_id: &str,
    ) -> Result<Vec<Version>> {
        self.get_data(&format!(
            "/data/v1/projects/{project_id}/items/{item_id}/versions"
        ))
        .await
    }
}
