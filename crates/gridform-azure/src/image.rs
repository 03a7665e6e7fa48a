//! OS image identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix of an Azure resource id (custom or gallery image).
pub const RESOURCE_ID_PREFIX: &str = "/subscriptions/";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageReference {
    /// /subscriptions/<sub>/resourceGroups/<rg>/providers/Microsoft.Compute/images/<name>
    ById(String),
    /// Marketplace URN: publisher:offer:sku:version
    ByUrn {
        publisher: String,
        offer: String,
        sku: String,
        version: String,
    },
}

#[derive(Debug, Error, PartialEq)]
pub enum ImageParseError {
    #[error("malformed format of image urn: {0}")]
    Malformed(String),
}

impl ImageReference {
    pub fn parse(image: &str) -> Result<Self, ImageParseError> {
        if image.starts_with(RESOURCE_ID_PREFIX) {
            return Ok(ImageReference::ById(image.to_string()));
        }

        match image.split(':').collect::<Vec<_>>().as_slice() {
            [publisher, offer, sku, version] => Ok(ImageReference::ByUrn {
                publisher: publisher.to_string(),
                offer: offer.to_string(),
                sku: sku.to_string(),
                version: version.to_string(),
            }),
            _ => Err(ImageParseError::Malformed(image.to_string())),
        }
    }
}

impl FromStr for ImageReference {
    type Err = ImageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageReference::ById(id) => f.write_str(id),
            ImageReference::ByUrn {
                publisher,
                offer,
                sku,
                version,
            } => write!(f, "{publisher}:{offer}:{sku}:{version}"),
        }
    }
}
