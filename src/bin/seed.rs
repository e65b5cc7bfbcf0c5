use bookstore::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    seed,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    // Ensure tables exist.
    run_migrations(&orm).await?;

    let report = seed::run(&orm).await?;

    println!(
        "Seed completed. Admin ID: {}, categories: {}, products: {}",
        report.admin_id, report.categories, report.products
    );
    Ok(())
}
