//! Bulk author import driver.
//!
//! Usage: `catalog-import <file.csv>`. The database and log locations come
//! from `CATALOG_DB_PATH`, `CATALOG_LOG_LEVEL` and `CATALOG_LOG_DIR`.

use catalog_core::db::open_db;
use catalog_core::{init_logging, AuthorImportService, CatalogConfig, SqliteCatalogStore};
use log::error;
use std::process::ExitCode;

fn main() -> ExitCode {
    let Some(path) = std::env::args_os().nth(1) else {
        eprintln!("usage: catalog-import <file.csv>");
        return ExitCode::from(2);
    };

    let config = CatalogConfig::from_env();
    if let Err(err) = init_logging(&config.logging) {
        eprintln!("warning: file logging disabled: {err}");
    }

    match run(&config, path.as_ref()) {
        Ok(message) => {
            println!("{message}");
            ExitCode::SUCCESS
        }
        Err(message) => {
            error!("event=cli_import module=cli status=error");
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &CatalogConfig, path: &std::path::Path) -> Result<String, String> {
    let conn = open_db(&config.db_path).map_err(|err| err.to_string())?;
    let store = SqliteCatalogStore::try_new(&conn).map_err(|err| err.to_string())?;
    let summary = AuthorImportService::new(store)
        .import_file(path)
        .map_err(|err| err.to_string())?;
    Ok(summary.message())
}
