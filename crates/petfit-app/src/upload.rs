use std::fs;
use std::path::{Path, PathBuf};

use petfit_core::request::UploadImage;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} is empty")]
    Empty { path: PathBuf },
    #[error("unsupported photo type '{extension}' (expected jpg, jpeg, png, webp or gif)")]
    UnsupportedType { extension: String },
}

pub(crate) fn mime_for_path(path: &Path) -> Result<&'static str, UploadError> {
    let extension = path
        .extension()
        .and_then(|value| value.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    match extension.as_str() {
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "png" => Ok("image/png"),
        "webp" => Ok("image/webp"),
        "gif" => Ok("image/gif"),
        _ => Err(UploadError::UnsupportedType { extension }),
    }
}

pub(crate) fn load_upload_image(path: &Path) -> Result<UploadImage, UploadError> {
    let mime_type = mime_for_path(path)?;
    let bytes = fs::read(path).map_err(|source| UploadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if bytes.is_empty() {
        return Err(UploadError::Empty {
            path: path.to_path_buf(),
        });
    }

    let file_name = path
        .file_name()
        .and_then(|value| value.to_str())
        .unwrap_or("photo")
        .to_string();

    Ok(UploadImage {
        file_name,
        mime_type: mime_type.to_string(),
        bytes,
    })
}
