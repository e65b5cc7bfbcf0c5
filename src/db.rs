use anyhow::Result;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityName, EntityTrait, Schema,
};
use std::time::Duration;

use crate::entity::{
    Categories, Comments, ProdTags, Products, ReceiptDetails, Receipts, Tags, Users,
};

/// Create a SeaORM connection.
pub async fn create_orm_conn(database_url: &str) -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(database_url);
    options
        .acquire_timeout(Duration::from_secs(5))
        .sqlx_logging(false);
    // every pooled connection to `sqlite::memory:` would get its own empty database
    if database_url.contains(":memory:") {
        options.max_connections(1).min_connections(1);
    }
    let conn = Database::connect(options).await?;
    Ok(conn)
}

/// Create every table that is missing, parents before children.
pub async fn run_migrations(conn: &DatabaseConnection) -> Result<()> {
    create_table(conn, Categories).await?;
    create_table(conn, Tags).await?;
    create_table(conn, Users).await?;
    create_table(conn, Products).await?;
    create_table(conn, ProdTags).await?;
    create_table(conn, Receipts).await?;
    create_table(conn, ReceiptDetails).await?;
    create_table(conn, Comments).await?;
    Ok(())
}

async fn create_table<E>(conn: &DatabaseConnection, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    let table = entity.table_name().to_owned();
    let backend = conn.get_database_backend();
    let schema = Schema::new(backend);
    let mut stmt = schema.create_table_from_entity(entity);
    conn.execute(backend.build(stmt.if_not_exists())).await?;
    tracing::debug!(%table, "table ensured");
    Ok(())
}
