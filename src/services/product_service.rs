use crate::{
    dto::products::ProductInput,
    error::{AppError, AppResult},
    models::Product,
    repository::{NewProduct, ProductChanges},
    state::AppState,
};

pub async fn list_products(state: &AppState) -> AppResult<Vec<Product>> {
    let items = state
        .products
        .list_all()
        .await?
        .into_iter()
        .map(Product::from)
        .collect();
    Ok(items)
}

pub async fn get_product(state: &AppState, id: i32) -> AppResult<Product> {
    match state.products.get_by_id(id).await? {
        Some(model) => Ok(Product::from(model)),
        None => Err(AppError::product_not_found(id)),
    }
}

pub async fn create_product(state: &AppState, input: ProductInput) -> AppResult<Product> {
    let image_url = match &input.image {
        Some(upload) => Some(state.images.save(upload).await?),
        None => None,
    };

    let new_product = NewProduct {
        name: input.name,
        description: input.description,
        price: input.price,
        quantity: input.quantity,
        image_url: image_url.clone(),
    };

    let product = match state.products.create(new_product).await {
        Ok(model) => model,
        Err(err) => {
            discard_image(state, image_url.as_deref()).await;
            return Err(err.into());
        }
    };

    tracing::info!(product_id = product.id, "product created");
    Ok(Product::from(product))
}

/// Full replace of the mutable fields. The stored image is kept unless a new
/// one is uploaded, in which case the previous file is removed once the row
/// points at the new one.
pub async fn update_product(state: &AppState, id: i32, input: ProductInput) -> AppResult<()> {
    let existing = state
        .products
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::product_not_found(id))?;

    let new_image_url = match &input.image {
        Some(upload) => Some(state.images.save(upload).await?),
        None => None,
    };

    let changes = ProductChanges {
        name: input.name,
        description: input.description,
        price: input.price,
        quantity: input.quantity,
        image_url: new_image_url.clone().or_else(|| existing.image_url.clone()),
    };

    let updated = match state.products.update(id, changes).await {
        Ok(updated) => updated,
        Err(err) => {
            discard_image(state, new_image_url.as_deref()).await;
            return Err(err.into());
        }
    };

    if updated.is_none() {
        discard_image(state, new_image_url.as_deref()).await;
        return Err(AppError::product_not_found(id));
    }

    if new_image_url.is_some() {
        if let Some(previous) = existing.image_url.as_deref() {
            state.images.delete(previous).await;
        }
    }

    tracing::info!(product_id = id, "product updated");
    Ok(())
}

pub async fn delete_product(state: &AppState, id: i32) -> AppResult<()> {
    let existing = state
        .products
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::product_not_found(id))?;

    if !state.products.delete(id).await? {
        return Err(AppError::product_not_found(id));
    }

    if let Some(url) = existing.image_url.as_deref() {
        state.images.delete(url).await;
    }

    tracing::info!(product_id = id, "product deleted");
    Ok(())
}

async fn discard_image(state: &AppState, url: Option<&str>) {
    if let Some(url) = url {
        state.images.delete(url).await;
    }
}
