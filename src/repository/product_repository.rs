use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, DatabaseConnection, DbErr, EntityTrait, QueryOrder,
    Set,
};

use crate::entity::products::{ActiveModel, Column, Entity as Products, Model as ProductModel};

/// Fields supplied when a product is first stored.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub quantity: i32,
    pub image_url: Option<String>,
}

/// Full replacement of every mutable column. There is no partial update.
#[derive(Debug, Clone)]
pub struct ProductChanges {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub quantity: i32,
    pub image_url: Option<String>,
}

/// Data-access facade over the `products` table.
#[derive(Clone)]
pub struct ProductRepository {
    db: DatabaseConnection,
}

impl ProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list_all(&self) -> Result<Vec<ProductModel>, DbErr> {
        Products::find().order_by_asc(Column::Id).all(&self.db).await
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<ProductModel>, DbErr> {
        Products::find_by_id(id).one(&self.db).await
    }

    pub async fn create(&self, product: NewProduct) -> Result<ProductModel, DbErr> {
        let active = ActiveModel {
            id: NotSet,
            name: Set(product.name),
            description: Set(product.description),
            price: Set(product.price),
            quantity: Set(product.quantity),
            image_url: Set(product.image_url),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };
        active.insert(&self.db).await
    }

    /// Returns `None` when no row has the given id.
    pub async fn update(
        &self,
        id: i32,
        changes: ProductChanges,
    ) -> Result<Option<ProductModel>, DbErr> {
        let Some(existing) = Products::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut active: ActiveModel = existing.into();
        active.name = Set(changes.name);
        active.description = Set(changes.description);
        active.price = Set(changes.price);
        active.quantity = Set(changes.quantity);
        active.image_url = Set(changes.image_url);
        active.updated_at = Set(Some(Utc::now().into()));

        match active.update(&self.db).await {
            Ok(model) => Ok(Some(model)),
            // Row deleted between the lookup and the write.
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(err) => Err(err),
        }
    }

    pub async fn delete(&self, id: i32) -> Result<bool, DbErr> {
        let result = Products::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}
