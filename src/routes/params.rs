use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::error::{AppError, AppResult};

/// `{id}` path segment of a product route.
///
/// A non-numeric id is a bad request. A numeric id outside the `i32` range
/// cannot match any row, so it is reported as not found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductId(pub i32);

impl<S> FromRequestParts<S> for ProductId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::rejected(rejection.status(), rejection.body_text()))?;
        parse_product_id(&raw).map(ProductId)
    }
}

fn parse_product_id(raw: &str) -> AppResult<i32> {
    if let Ok(id) = raw.parse::<i32>() {
        return Ok(id);
    }

    let digits = raw.strip_prefix('-').unwrap_or(raw);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::NotFound(format!("Product with id {raw} not found")));
    }

    Err(AppError::BadRequest(format!(
        "Product id must be an integer, got {raw:?}"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_in_range_ids() {
        assert_eq!(parse_product_id("42").unwrap(), 42);
        assert_eq!(parse_product_id("-1").unwrap(), -1);
    }

    #[test]
    fn out_of_range_ids_are_not_found() {
        assert!(matches!(
            parse_product_id("99999999999"),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            parse_product_id("-99999999999"),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn non_numeric_ids_are_bad_requests() {
        for raw in ["abc", "1.5", "-", "12abc"] {
            assert!(
                matches!(parse_product_id(raw), Err(AppError::BadRequest(_))),
                "{raw} should be rejected"
            );
        }
    }
}
