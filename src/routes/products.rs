use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header::LOCATION},
    routing::get,
};

use crate::{
    dto::products::ProductRequest,
    error::AppResult,
    models::Product,
    response::ApiResponse,
    routes::{form::ProductForm, params::ProductId},
    services::product_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
}

#[utoipa::path(
    get,
    path = "/api/products",
    responses(
        (status = 200, description = "List products", body = Vec<Product>)
    ),
    tag = "Products"
)]
pub async fn list_products(State(state): State<AppState>) -> AppResult<Json<Vec<Product>>> {
    let items = product_service::list_products(&state).await?;
    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Get product", body = Product),
        (status = 400, description = "Invalid product id", body = ApiResponse<String>),
        (status = 404, description = "Product not found", body = ApiResponse<String>),
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    ProductId(id): ProductId,
) -> AppResult<Json<Product>> {
    let product = product_service::get_product(&state, id).await?;
    Ok(Json(product))
}

#[utoipa::path(
    post,
    path = "/api/products",
    request_body(
        content = ProductRequest,
        description = "JSON, or multipart/form-data with the same fields plus an optional `image` file (.jpg, .jpeg, .png, .gif, .webp)"
    ),
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Invalid input or unsupported image type", body = ApiResponse<String>),
    ),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    ProductForm(input): ProductForm,
) -> AppResult<(StatusCode, [(axum::http::HeaderName, String); 1], Json<Product>)> {
    let product = product_service::create_product(&state, input).await?;
    let location = format!("/api/products/{}", product.id);
    Ok((StatusCode::CREATED, [(LOCATION, location)], Json(product)))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    request_body(
        content = ProductRequest,
        description = "Replaces every mutable field. The current image is kept unless a new `image` file is uploaded"
    ),
    responses(
        (status = 204, description = "Product updated"),
        (status = 400, description = "Invalid input or unsupported image type", body = ApiResponse<String>),
        (status = 404, description = "Product not found", body = ApiResponse<String>),
    ),
    tag = "Products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    ProductId(id): ProductId,
    ProductForm(input): ProductForm,
) -> AppResult<StatusCode> {
    product_service::update_product(&state, id, input).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "Product not found", body = ApiResponse<String>),
    ),
    tag = "Products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    ProductId(id): ProductId,
) -> AppResult<StatusCode> {
    product_service::delete_product(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
