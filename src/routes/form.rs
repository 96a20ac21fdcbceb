use std::str::FromStr;

use axum::{
    Json,
    extract::{FromRequest, Multipart, Request},
    http::{HeaderValue, header::CONTENT_TYPE},
};
use rust_decimal::Decimal;

use crate::{
    dto::products::{ProductInput, ProductRequest},
    error::AppError,
    storage::ImageUpload,
};

const MULTIPART_FORM_DATA: &str = "multipart/form-data";

/// Create/update body, accepted either as JSON or as `multipart/form-data`
/// with an optional `image` file part.
///
/// Everything, including the image extension, is validated here, before the
/// handler touches the store or the disk.
#[derive(Debug)]
pub struct ProductForm(pub ProductInput);

impl<S> FromRequest<S> for ProductForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(mut req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(normalize_media_type);

        if let Some(content_type) = content_type.filter(|ct| ct.starts_with(MULTIPART_FORM_DATA)) {
            let value = HeaderValue::from_str(&content_type)
                .map_err(|err| AppError::BadRequest(format!("invalid content type: {err}")))?;
            req.headers_mut().insert(CONTENT_TYPE, value);

            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|rejection| AppError::rejected(rejection.status(), rejection.body_text()))?;
            return parse_multipart(multipart).await.map(ProductForm);
        }

        let Json(request) = Json::<ProductRequest>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::rejected(rejection.status(), rejection.body_text()))?;
        ProductInput::new(request, None).map(ProductForm)
    }
}

/// Lowercases the media type and leaves the parameters (the boundary is
/// case-sensitive) untouched.
fn normalize_media_type(content_type: &str) -> String {
    match content_type.split_once(';') {
        Some((media_type, params)) => {
            format!("{};{params}", media_type.trim().to_ascii_lowercase())
        }
        None => content_type.trim().to_ascii_lowercase(),
    }
}

async fn parse_multipart(mut multipart: Multipart) -> Result<ProductInput, AppError> {
    let mut name = None;
    let mut description = None;
    let mut price = None;
    let mut quantity = None;
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| {
            AppError::rejected(err.status(), format!("invalid multipart payload: {}", err.body_text()))
        })?
    {
        let field_name = field.name().map(str::to_ascii_lowercase).unwrap_or_default();

        if field_name == "image" {
            let file_name = field.file_name().map(str::to_owned).unwrap_or_default();
            let bytes = field
                .bytes()
                .await
                .map_err(|err| {
                    AppError::rejected(err.status(), format!("failed to read upload: {}", err.body_text()))
                })?;
            // Browsers send an empty part when no file was chosen.
            if file_name.is_empty() && bytes.is_empty() {
                continue;
            }
            image = Some(ImageUpload::new(&file_name, bytes.to_vec())?);
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|err| {
                AppError::rejected(err.status(), format!("invalid field `{field_name}`: {}", err.body_text()))
            })?;

        match field_name.as_str() {
            "name" => name = Some(value),
            "description" => description = Some(value),
            "price" => price = Some(parse_price(&value)?),
            "quantity" => quantity = Some(parse_quantity(&value)?),
            _ => {}
        }
    }

    let price = price.ok_or_else(|| AppError::BadRequest("Price is required".into()))?;
    let request = ProductRequest {
        name: name.unwrap_or_default(),
        description,
        price,
        quantity: quantity.unwrap_or(0),
    };
    ProductInput::new(request, image)
}

fn parse_price(raw: &str) -> Result<Decimal, AppError> {
    Decimal::from_str(raw.trim())
        .map_err(|_| AppError::BadRequest(format!("Price must be a decimal number, got {raw:?}")))
}

fn parse_quantity(raw: &str) -> Result<i32, AppError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0);
    }
    raw.parse::<i32>()
        .map_err(|_| AppError::BadRequest(format!("Quantity must be a whole number, got {raw:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_prices_and_quantities() {
        assert_eq!(parse_price(" 999.99 ").unwrap(), Decimal::new(99999, 2));
        assert!(parse_price("cheap").is_err());
        assert_eq!(parse_quantity("").unwrap(), 0);
        assert_eq!(parse_quantity("12").unwrap(), 12);
        assert!(parse_quantity("1.5").is_err());
    }

    #[test]
    fn normalizes_media_type_but_not_boundary() {
        assert_eq!(
            normalize_media_type("Multipart/Form-Data; boundary=AbC"),
            "multipart/form-data; boundary=AbC"
        );
        assert_eq!(normalize_media_type("Application/JSON"), "application/json");
    }
}
