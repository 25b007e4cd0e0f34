//! Vector store initialization and reset handlers

use std::io::stdin;
use std::io::Write;

use crate::cli::output::print_info;
use crate::cli::output::print_success;
use crate::cli::output::print_warning;
use crate::config::AppConfig;
use crate::database::Database;
use crate::vectorstore::VectorStore;
use crate::Result;

/// Handle `docbot init`
pub async fn handle_init_command(config: &AppConfig, force: bool) -> Result<()> {
    if !force {
        print_warning("This will create the pgvector extension, tables and indexes.");
        print_warning("This operation is safe - it uses CREATE IF NOT EXISTS.");
        println!("\nUse --force to proceed.");
        return Ok(());
    }

    print_info("🗄️  Initializing DocBot vector store...");
    let store = VectorStore::create(config).await?;
    let count = store.count().await?;

    print_success(&format!(
        "Collection '{}' ready ({} chunks)",
        store.collection(),
        count
    ));
    print_info("To add documents, run:");
    println!("   docbot ingest --path ./documents/");

    Ok(())
}

/// Handle `docbot reset`
pub async fn handle_reset_command(config: &AppConfig, force: bool, all: bool) -> Result<()> {
    if !force {
        if all {
            print_warning("This will DROP every collection and the vector store tables!");
        } else {
            print_warning(&format!(
                "This will DELETE collection '{}' and every chunk stored in it!",
                config.collection()
            ));
        }
        print!("Are you sure you want to continue? (y/N) ");
        std::io::stdout().flush()?;

        let mut answer = String::new();
        stdin().read_line(&mut answer)?;
        if !matches!(answer.trim(), "y" | "Y" | "yes") {
            print_info("Reset cancelled");
            return Ok(());
        }
    }

    if all {
        let database = Database::from_config(config).await?;
        database.drop_schema().await?;
        print_success("Vector store tables dropped");
        return Ok(());
    }

    match VectorStore::open(config).await? {
        Some(store) => {
            store.delete_collection().await?;
            print_success(&format!("Collection '{}' deleted", config.collection()));
        }
        None => print_info(&format!(
            "Collection '{}' does not exist, nothing to reset",
            config.collection()
        )),
    }

    Ok(())
}
