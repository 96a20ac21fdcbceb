use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use uuid::Uuid;

use crate::error::{AppError, AppResult};

pub const ALLOWED_IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

/// Public URL prefix under which saved product images are served.
pub const PRODUCT_IMAGE_URL_PREFIX: &str = "/uploads/products/";

const PRODUCT_IMAGE_SUBDIR: &str = "products";

/// An uploaded image that passed the extension allow-list.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub extension: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Validates the original filename's extension and keeps the normalized one.
    pub fn new(original_filename: &str, bytes: Vec<u8>) -> AppResult<Self> {
        let extension = image_extension(original_filename)?;
        Ok(Self { extension, bytes })
    }
}

/// Lowercased extension of `filename`, if it is one of the allowed image types.
pub fn image_extension(filename: &str) -> AppResult<String> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension {
        Some(ext) if ALLOWED_IMAGE_EXTENSIONS.contains(&ext.as_str()) => Ok(ext),
        _ => Err(AppError::BadRequest(format!(
            "Unsupported image type. Allowed extensions: {}",
            ALLOWED_IMAGE_EXTENSIONS
                .iter()
                .map(|ext| format!(".{ext}"))
                .collect::<Vec<_>>()
                .join(", ")
        ))),
    }
}

/// Local-disk store for product images, rooted at the public upload directory.
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory served at `/uploads`.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn product_dir(&self) -> PathBuf {
        self.root.join(PRODUCT_IMAGE_SUBDIR)
    }

    /// Writes the image under a random filename and returns its public URL.
    pub async fn save(&self, upload: &ImageUpload) -> AppResult<String> {
        let dir = self.product_dir();
        tokio::fs::create_dir_all(&dir).await?;

        let file_name = format!("{}.{}", Uuid::new_v4().simple(), upload.extension);
        tokio::fs::write(dir.join(&file_name), &upload.bytes).await?;

        tracing::debug!(file = %file_name, bytes = upload.bytes.len(), "product image saved");
        Ok(format!("{PRODUCT_IMAGE_URL_PREFIX}{file_name}"))
    }

    /// Filesystem path backing a locally hosted image URL.
    ///
    /// Only the last path component is used, so a stored URL cannot point
    /// outside the product image directory.
    pub fn local_path(&self, url: &str) -> Option<PathBuf> {
        let file_name = url.strip_prefix(PRODUCT_IMAGE_URL_PREFIX)?;
        let file_name = Path::new(file_name).file_name()?;
        Some(self.product_dir().join(file_name))
    }

    /// Best-effort removal; never fails the caller.
    pub async fn delete(&self, url: &str) {
        let Some(path) = self.local_path(url) else {
            tracing::debug!(url, "image is not locally hosted, skipping delete");
            return;
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => tracing::debug!(path = %path.display(), "product image deleted"),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "product image already gone");
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "failed to delete product image");
            }
        }
    }
}
