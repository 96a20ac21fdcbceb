use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    storage::ImageUpload,
};

pub const NAME_MAX_CHARS: usize = 200;
pub const DESCRIPTION_MAX_CHARS: usize = 1000;

/// JSON body for create and update.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 999.99)]
    pub price: Decimal,
    #[serde(default)]
    pub quantity: i32,
}

/// Create/update input after validation, with its optional image.
#[derive(Debug)]
pub struct ProductInput {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub quantity: i32,
    pub image: Option<ImageUpload>,
}

impl ProductInput {
    pub fn new(request: ProductRequest, image: Option<ImageUpload>) -> AppResult<Self> {
        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::BadRequest("Name is required".into()));
        }
        if name.chars().count() > NAME_MAX_CHARS {
            return Err(AppError::BadRequest(format!(
                "Name must be at most {NAME_MAX_CHARS} characters"
            )));
        }

        let description = request
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        if description
            .as_ref()
            .is_some_and(|d| d.chars().count() > DESCRIPTION_MAX_CHARS)
        {
            return Err(AppError::BadRequest(format!(
                "Description must be at most {DESCRIPTION_MAX_CHARS} characters"
            )));
        }

        if request.quantity < 0 {
            return Err(AppError::BadRequest("Quantity cannot be negative".into()));
        }

        Ok(Self {
            name,
            description,
            price: request.price.round_dp(2),
            quantity: request.quantity,
            image,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn request(name: &str, quantity: i32) -> ProductRequest {
        ProductRequest {
            name: name.into(),
            description: Some("  ".into()),
            price: Decimal::from_str("10.005").unwrap(),
            quantity,
        }
    }

    #[test]
    fn normalizes_fields() {
        let input = ProductInput::new(request("  Laptop ", 3), None).unwrap();
        assert_eq!(input.name, "Laptop");
        assert_eq!(input.description, None);
        assert_eq!(input.price, Decimal::from_str("10.00").unwrap());
        assert_eq!(input.quantity, 3);
    }

    #[test]
    fn rejects_blank_name_and_negative_quantity() {
        assert!(matches!(
            ProductInput::new(request("   ", 1), None),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            ProductInput::new(request("Mug", -1), None),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn rejects_overlong_description() {
        let mut req = request("Mug", 1);
        req.description = Some("x".repeat(DESCRIPTION_MAX_CHARS + 1));
        assert!(matches!(
            ProductInput::new(req, None),
            Err(AppError::BadRequest(_))
        ));
    }
}
