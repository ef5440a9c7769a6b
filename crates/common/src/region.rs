//! Region selection and the default API host

use serde::{Deserialize, Serialize};

/// Default host for all API requests. Individual clients accept a host
/// override for testing or for routing through a proxy.
pub const DEFAULT_HOST: &str = "https://developer.api.autodesk.com";

/// Geographic region a request is routed to or a resource is stored in.
///
/// Sent lowercase as a query parameter or `x-ads-region` header value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    #[default]
    Us,
    Emea,
}

impl Region {
    /// Wire representation of the region.
    pub fn as_str(self) -> &'static str {
        match self {
            Region::Us => "us",
            Region::Emea => "emea",
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
