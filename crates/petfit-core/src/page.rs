use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PageContext {
    #[serde(default)]
    pub product: Option<ProductRegion>,
    #[serde(default)]
    pub sizes: SizeOptions,
    #[serde(default)]
    pub pets: Vec<PetProfile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProductRegion {
    pub image_url: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SizeOptions {
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub ai_fit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PetProfile {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub has_image: bool,
}

impl PetProfile {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.id.as_str())
    }
}

impl PageContext {
    pub fn has_pet_list(&self) -> bool {
        !self.pets.is_empty()
    }

    pub fn is_product_page(&self) -> bool {
        self.product.is_some()
    }
}

#[derive(Debug, Error)]
pub enum PageError {
    #[error("failed to read page file at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse page file at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid page file: {message}")]
    Validation { message: String },
}

pub fn load_page(path: &Path) -> Result<PageContext, PageError> {
    let raw = fs::read_to_string(path).map_err(|source| PageError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let page: PageContext = toml::from_str(&raw).map_err(|source| PageError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    validate_page(&page)?;
    Ok(page)
}

pub fn validate_page(page: &PageContext) -> Result<(), PageError> {
    if let Some(product) = &page.product {
        if product.image_url.trim().is_empty() {
            return Err(validation("product.image_url must be non-empty"));
        }
        if product.name.trim().is_empty() {
            return Err(validation("product.name must be non-empty"));
        }
    }

    let mut seen = BTreeSet::new();
    for (index, pet) in page.pets.iter().enumerate() {
        if pet.id.trim().is_empty() {
            return Err(validation(format!("pets[{index}] id must be non-empty")));
        }
        if !seen.insert(pet.id.as_str()) {
            return Err(validation(format!(
                "pets[{index}] id '{}' is duplicated",
                pet.id
            )));
        }
    }

    let mut seen_sizes = BTreeSet::new();
    for size in &page.sizes.options {
        if size.trim().is_empty() {
            return Err(validation("sizes.options must not contain empty values"));
        }
        if !seen_sizes.insert(size.as_str()) {
            return Err(validation(format!("sizes.options has duplicate '{size}'")));
        }
    }

    Ok(())
}

fn validation(message: impl Into<String>) -> PageError {
    PageError::Validation {
        message: message.into(),
    }
}
