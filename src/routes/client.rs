use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// Single-page catalog client: a product form plus a grid of products.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
