//! Configuration and collection status display

use crate::cli::output::print_config;
use crate::cli::output::print_warning;
use crate::config::AppConfig;
use crate::database::Database;
use crate::Result;

/// Handle `docbot config`
pub async fn handle_config_command(config: &AppConfig) -> Result<()> {
    print_config(config);
    println!();

    // The config is still useful to see when the database is down
    let database = match Database::from_config(config).await {
        Ok(database) => database,
        Err(e) => {
            print_warning(&format!("Database unreachable: {e}"));
            return Ok(());
        }
    };

    if !database.is_schema_initialized().await? {
        print_warning("Vector store schema not initialized (run `docbot init --force`)");
        return Ok(());
    }

    let collections = database.list_collections().await?;
    println!("📚 Collections:");
    if collections.is_empty() {
        println!("  (none)");
    }
    for (collection, chunks) in collections {
        let marker = if collection.name == config.collection() {
            "*"
        } else {
            " "
        };
        println!(
            "  {} {} - {} chunks, dimension {}, created {}",
            marker,
            collection.name,
            chunks,
            collection.dimension,
            collection.created_at.format("%Y-%m-%d %H:%M:%S")
        );
    }

    Ok(())
}
