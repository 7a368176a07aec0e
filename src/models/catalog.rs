//! Response shape of the Google Books volumes API and its mapping to book metadata

use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Author name used when the catalog lists none
pub const UNKNOWN_AUTHOR: &str = "Unknown";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumesResponse {
    #[serde(default)]
    pub total_items: u32,
    #[serde(default)]
    pub items: Vec<Volume>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    pub volume_info: VolumeInfo,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
    pub title: Option<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    pub published_date: Option<String>,
    pub description: Option<String>,
    pub average_rating: Option<f64>,
    pub image_links: Option<ImageLinks>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinks {
    pub thumbnail: Option<String>,
    pub small_thumbnail: Option<String>,
}

/// Book metadata fetched from the catalog, before author resolution
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogBook {
    pub title: String,
    pub isbn: String,
    pub author: String,
    pub date: Option<String>,
    pub description: Option<String>,
    pub rating: Option<f64>,
    pub image: Option<String>,
}

impl VolumesResponse {
    /// Map the first matching volume. An empty result set is an error, not a panic.
    pub fn into_catalog_book(self, isbn: &str) -> AppResult<CatalogBook> {
        let info = self
            .items
            .into_iter()
            .next()
            .map(|volume| volume.volume_info)
            .ok_or_else(|| AppError::Catalog(format!("no volume found for ISBN {}", isbn)))?;

        let title = info
            .title
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| AppError::Catalog(format!("volume for ISBN {} has no title", isbn)))?;

        let author = info
            .authors
            .into_iter()
            .find(|a| !a.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());

        Ok(CatalogBook {
            title,
            isbn: isbn.to_string(),
            author,
            date: info.published_date,
            description: info.description,
            rating: info.average_rating,
            image: info
                .image_links
                .and_then(|links| links.thumbnail.or(links.small_thumbnail)),
        })
    }
}
