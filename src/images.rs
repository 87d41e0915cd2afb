//! Image intake shared by posts, cats and user profiles: validate, upload to
//! the object store under a scoped key, presign for rendering.

use std::time::Duration;

use bytes::Bytes;
use tracing::error;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

pub const MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;

/// Upload is a blocking call in the request path; bound it so a stuck store
/// cannot hold the request forever.
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(30);

const PRESIGN_TTL_SECS: u64 = 30 * 60;

#[derive(Clone)]
pub struct ImageUpload {
    pub body: Bytes,
    pub content_type: String,
}

fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        _ => None,
    }
}

/// Validate and upload one image, returning the stored key. A rejected or
/// failed upload is terminal for the request: the caller must not persist an
/// entity row until this returns `Ok`.
pub async fn store_image(
    st: &AppState,
    scope: &str,
    owner_id: Uuid,
    image: ImageUpload,
) -> Result<String, ApiError> {
    let ext = ext_from_mime(&image.content_type).ok_or_else(|| {
        ApiError::Validation("La imagen debe ser un archivo de tipo jpeg, png o jpg.".into())
    })?;

    if image.body.len() > MAX_IMAGE_BYTES {
        return Err(ApiError::Validation(
            "La imagen no debe ser mayor a 2MB.".into(),
        ));
    }

    let key = format!("{}/{}/{}.{}", scope, owner_id, Uuid::new_v4(), ext);

    match tokio::time::timeout(
        UPLOAD_TIMEOUT,
        st.storage.put(&key, image.body, &image.content_type),
    )
    .await
    {
        Ok(Ok(())) => Ok(key),
        Ok(Err(e)) => {
            error!(error = %e, key = %key, "image upload failed");
            Err(ApiError::Dependency(
                "Error al guardar la imagen.".into(),
            ))
        }
        Err(_) => {
            error!(key = %key, "image upload timed out");
            Err(ApiError::Dependency(
                "Error al guardar la imagen.".into(),
            ))
        }
    }
}

/// Presign a stored key into a fetchable URL.
pub async fn presign(st: &AppState, key: &str) -> Result<String, ApiError> {
    st.storage
        .presign_get(key, PRESIGN_TTL_SECS)
        .await
        .map_err(|e| {
            error!(error = %e, key = %key, "presign failed");
            ApiError::Dependency("Error al resolver la imagen.".into())
        })
}

pub async fn presign_opt(st: &AppState, key: Option<&str>) -> Result<Option<String>, ApiError> {
    match key {
        Some(k) => Ok(Some(presign(st, k).await?)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;

    #[test]
    fn only_jpeg_and_png_are_accepted() {
        assert_eq!(ext_from_mime("image/jpeg"), Some("jpg"));
        assert_eq!(ext_from_mime("image/jpg"), Some("jpg"));
        assert_eq!(ext_from_mime("image/png"), Some("png"));
        assert_eq!(ext_from_mime("image/webp"), None);
        assert_eq!(ext_from_mime("application/pdf"), None);
    }

    #[tokio::test]
    async fn store_image_rejects_wrong_type() {
        let st = AppState::fake();
        let upload = ImageUpload {
            body: Bytes::from_static(b"gif"),
            content_type: "image/gif".into(),
        };
        let err = store_image(&st, "posts", Uuid::new_v4(), upload)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn store_image_rejects_oversize() {
        let st = AppState::fake();
        let upload = ImageUpload {
            body: Bytes::from(vec![0u8; MAX_IMAGE_BYTES + 1]),
            content_type: "image/png".into(),
        };
        let err = store_image(&st, "cats", Uuid::new_v4(), upload)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn store_image_returns_scoped_key() {
        let st = AppState::fake();
        let owner = Uuid::new_v4();
        let upload = ImageUpload {
            body: Bytes::from_static(b"png-bytes"),
            content_type: "image/png".into(),
        };
        let key = store_image(&st, "posts", owner, upload).await.unwrap();
        assert!(key.starts_with(&format!("posts/{}/", owner)));
        assert!(key.ends_with(".png"));
    }

    #[tokio::test]
    async fn presign_opt_passes_through_none() {
        let st = AppState::fake();
        assert_eq!(presign_opt(&st, None).await.unwrap(), None);
        let url = presign_opt(&st, Some("a/b.jpg")).await.unwrap().unwrap();
        assert!(url.contains("a/b.jpg"));
    }
}
