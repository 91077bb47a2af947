//! Example: Resolve the data files of a local Iceberg table.
//!
//! Run with:
//! ```
//! ICEBERG_WAREHOUSE=/path/to/warehouse ICEBERG_TABLE=db/events \
//!     cargo run --example resolve_local_table -p fluree-db-iceberg-files
//! ```

use fluree_db_iceberg_files::metadata::load_table_metadata;
use fluree_db_iceberg_files::{
    locate_metadata_file, read_data_files, read_manifest_list, resolve_manifest_list,
    FileStorage, TableConfig,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let warehouse = std::env::var("ICEBERG_WAREHOUSE").unwrap_or_else(|_| ".".to_string());
    let table = std::env::var("ICEBERG_TABLE").unwrap_or_else(|_| "openflights/airlines".to_string());

    let storage = FileStorage::new(&warehouse);
    let config = TableConfig::new(table);

    println!("=== Resolving Local Iceberg Table ===");
    println!("Warehouse: {}", warehouse);
    println!("Table: {}", config.location);

    let metadata_path = locate_metadata_file(&storage, &config.location, &config.layout)?;
    let metadata = load_table_metadata(&storage, &metadata_path)?;

    println!("\n=== Table Metadata ===");
    println!("File: {}", metadata_path);
    println!("Format version: {:?}", metadata.format_version);
    println!("Written at: {}", metadata.location.as_deref().unwrap_or("N/A"));
    println!("Snapshots: {}", metadata.snapshots.len());

    let Some(manifest_list) = resolve_manifest_list(&storage, &config, &metadata_path)? else {
        println!("\nTable has no current snapshot");
        return Ok(());
    };

    let manifests = read_manifest_list(&storage, &config, &manifest_list)?;
    println!("\n=== Manifests ({}) ===", manifests.len());
    for manifest in &manifests {
        println!("  {}", manifest);
    }

    let files = read_data_files(&storage, &manifests)?;
    println!("\n=== Data Files ({}) ===", files.len());
    for file in &files {
        println!("  {}", file);
    }

    Ok(())
}
