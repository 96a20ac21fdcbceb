#![allow(dead_code)]

use std::path::{Path, PathBuf};

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{
        Request, Response,
        header::{CONTENT_LENGTH, CONTENT_TYPE},
    },
};
use product_catalog::{
    app::build_router,
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    state::AppState,
    storage::ImageStore,
};
use sea_orm::ConnectionTrait;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

pub const BOUNDARY: &str = "catalog-test-boundary";

/// Router over an in-memory SQLite store and a throwaway upload directory.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub upload_dir: PathBuf,
}

impl TestApp {
    pub async fn new() -> anyhow::Result<Self> {
        let database_url = "sqlite::memory:";
        let orm = create_orm_conn(database_url).await?;
        run_migrations(&orm).await?;

        let upload_dir =
            std::env::temp_dir().join(format!("catalog-test-{}", Uuid::new_v4().simple()));
        let config = AppConfig {
            database_url: database_url.to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
            upload_dir: upload_dir.clone(),
            max_upload_bytes: 1024 * 1024,
        };

        let state = AppState::new(orm, ImageStore::new(&upload_dir));
        let router = build_router(state.clone(), &config);
        Ok(Self {
            router,
            state,
            upload_dir,
        })
    }

    pub async fn send(&self, request: Request<Body>) -> anyhow::Result<Response<Body>> {
        Ok(self.router.clone().oneshot(request).await?)
    }

    pub async fn get(&self, uri: &str) -> anyhow::Result<Response<Body>> {
        self.send(Request::get(uri).body(Body::empty())?).await
    }

    pub async fn delete(&self, uri: &str) -> anyhow::Result<Response<Body>> {
        self.send(Request::delete(uri).body(Body::empty())?).await
    }

    pub async fn send_json(
        &self,
        method: &str,
        uri: &str,
        body: Value,
    ) -> anyhow::Result<Response<Body>> {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))?;
        self.send(request).await
    }

    pub async fn send_multipart(
        &self,
        method: &str,
        uri: &str,
        fields: &[(&str, &str)],
        image: Option<(&str, &[u8])>,
    ) -> anyhow::Result<Response<Body>> {
        let content_type = format!("multipart/form-data; boundary={BOUNDARY}");
        self.send(multipart_request(method, uri, &content_type, fields, image)?)
            .await
    }

    /// Runs raw SQL against the backing store, e.g. to make writes fail.
    pub async fn execute_sql(&self, sql: &str) -> anyhow::Result<()> {
        self.state.orm.execute_unprepared(sql).await?;
        Ok(())
    }

    /// Disk path of a `/uploads/...` URL returned by the API.
    pub fn upload_path(&self, url: &str) -> PathBuf {
        let relative = url.strip_prefix("/uploads/").expect("upload url");
        self.upload_dir.join(relative)
    }

    pub fn stored_image_count(&self) -> usize {
        count_files(&self.upload_dir.join("products"))
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.upload_dir);
    }
}

pub async fn body_json(response: Response<Body>) -> anyhow::Result<Value> {
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

pub async fn body_bytes(response: Response<Body>) -> anyhow::Result<Vec<u8>> {
    Ok(to_bytes(response.into_body(), usize::MAX).await?.to_vec())
}

/// Multipart request with an explicit `Content-Length`, built over the
/// shared test boundary.
pub fn multipart_request(
    method: &str,
    uri: &str,
    content_type: &str,
    fields: &[(&str, &str)],
    image: Option<(&str, &[u8])>,
) -> anyhow::Result<Request<Body>> {
    let body = multipart_body(fields, image);
    Ok(Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, body.len())
        .body(Body::from(body))?)
}

fn multipart_body(fields: &[(&str, &str)], image: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, bytes)) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn count_files(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .map(|entries| entries.filter_map(Result::ok).count())
        .unwrap_or(0)
}
