//! PostgreSQL-backed `RecordRepository<Product>`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{RecordPersistenceError, RecordRepository};
use crate::domain::{Product, RecordId, WorkspaceId};

use super::diesel_client_repository::map_record_diesel_error;
use super::diesel_error_mapping::map_pool_error;
use super::models::ProductRow;
use super::pool::DbPool;
use super::schema::products;

/// Diesel-backed product store. Listings follow insertion order.
#[derive(Clone)]
pub struct DieselProductRepository {
    pool: DbPool,
}

impl DieselProductRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl From<&Product> for ProductRow {
    fn from(product: &Product) -> Self {
        Self {
            id: *product.id.as_uuid(),
            workspace_id: *product.workspace_id.as_uuid(),
            name: product.name.clone(),
            regular_price: product.regular_price,
            sale_price: product.sale_price,
            short_description: product.short_description.clone(),
            full_description: product.full_description.clone(),
            thumbnail_url: product.thumbnail_url.clone(),
        }
    }
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: RecordId::from_uuid(row.id),
            workspace_id: WorkspaceId::from_uuid(row.workspace_id),
            name: row.name,
            regular_price: row.regular_price,
            sale_price: row.sale_price,
            short_description: row.short_description,
            full_description: row.full_description,
            thumbnail_url: row.thumbnail_url,
        }
    }
}

#[async_trait]
impl RecordRepository<Product> for DieselProductRepository {
    async fn insert(&self, record: &Product) -> Result<(), RecordPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, RecordPersistenceError::connection))?;
        diesel::insert_into(products::table)
            .values(ProductRow::from(record))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_record_diesel_error)
    }

    async fn list_by_workspace(
        &self,
        workspace: &WorkspaceId,
    ) -> Result<Vec<Product>, RecordPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, RecordPersistenceError::connection))?;
        let rows: Vec<ProductRow> = products::table
            .filter(products::workspace_id.eq(*workspace.as_uuid()))
            .order(products::seq.asc())
            .select(ProductRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_record_diesel_error)?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn find_by_id(&self, id: &RecordId) -> Result<Option<Product>, RecordPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, RecordPersistenceError::connection))?;
        let row: Option<ProductRow> = products::table
            .filter(products::id.eq(*id.as_uuid()))
            .select(ProductRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_record_diesel_error)?;
        Ok(row.map(Product::from))
    }

    async fn update(&self, record: &Product) -> Result<bool, RecordPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, RecordPersistenceError::connection))?;
        let row = ProductRow::from(record);
        let updated = diesel::update(products::table.filter(products::id.eq(row.id)))
            .set(&row)
            .execute(&mut conn)
            .await
            .map_err(map_record_diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: &RecordId) -> Result<bool, RecordPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, RecordPersistenceError::connection))?;
        let deleted = diesel::delete(products::table.filter(products::id.eq(*id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_record_diesel_error)?;
        Ok(deleted > 0)
    }
}
