//! Database initialization and status

use anyhow::{Context, Result};
use std::path::Path;
use txcost_business::ServiceConfig;
use txcost_persistence::{AuditLogRepo, Database};

fn db_url(db_path: &Path) -> String {
    format!("sqlite:{}", db_path.display())
}

/// Initialize the database with schema and seed data
pub async fn init_database(db_path: &Path, force: bool) -> Result<()> {
    if force && db_path.exists() {
        std::fs::remove_file(db_path).context("Failed to remove existing database")?;
        println!("🗑️  Removed existing database");
    }

    println!("📦 Creating schema...");
    let db = Database::init(&db_url(db_path))
        .await
        .context("Failed to initialize database")?;

    println!("🌱 Seeding data...");
    db.seed().await.context("Failed to seed database")?;

    db.pool().close().await;
    Ok(())
}

/// Open an existing database
pub async fn connect(db_path: &Path) -> Result<Database> {
    if !db_path.exists() {
        anyhow::bail!(
            "Database not found at {:?}. Run 'txcost init' first",
            db_path
        );
    }
    Database::connect(&db_url(db_path))
        .await
        .context("Failed to connect to database")
}

/// Show database status
pub async fn show_status(db_path: &Path) -> Result<()> {
    if !db_path.exists() {
        println!("❌ Database not found at {:?}", db_path);
        println!("   Run 'txcost init' to create the database");
        return Ok(());
    }

    let db = connect(db_path).await?;
    let pool = db.pool();

    println!("📊 Database Status");
    println!("   Path: {:?}", db_path);
    println!();

    let customer_count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM customers")
        .fetch_one(pool)
        .await
        .unwrap_or((0,));

    let cost_count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM cost_profiles")
        .fetch_one(pool)
        .await
        .unwrap_or((0,));

    let trail_count: (i64,) =
        sqlx::query_as("SELECT COUNT(DISTINCT transaction_id) FROM audit_logs")
            .fetch_one(pool)
            .await
            .unwrap_or((0,));

    let audit_count = AuditLogRepo::count(pool).await.unwrap_or(0);

    println!("   Customers:     {}", customer_count.0);
    println!("   Cost profiles: {}", cost_count.0);
    println!("   Audit trails:  {}", trail_count.0);
    println!("   Audit records: {}", audit_count);

    pool.close().await;
    Ok(())
}

/// Load service configuration, defaults when no file is given
pub fn load_config(path: Option<&Path>) -> Result<ServiceConfig> {
    match path {
        Some(path) => ServiceConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {:?}", path)),
        None => Ok(ServiceConfig::default()),
    }
}
