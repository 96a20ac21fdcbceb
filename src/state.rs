use sea_orm::DatabaseConnection;

use crate::{repository::ProductRepository, storage::ImageStore};

#[derive(Clone)]
pub struct AppState {
    pub orm: DatabaseConnection,
    pub products: ProductRepository,
    pub images: ImageStore,
}

impl AppState {
    pub fn new(orm: DatabaseConnection, images: ImageStore) -> Self {
        Self {
            products: ProductRepository::new(orm.clone()),
            orm,
            images,
        }
    }
}
