use std::path::Path;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::logging;
use crate::io::store::{DocumentStore, JsonFileStore};
use crate::model::Collection;
use crate::ops::record_ops;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli, data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    logging::init_stderr_logging();
    let json = cli.json;

    match cli.command {
        None => Ok(()),
        Some(cmd) => match cmd {
            // Init is handled in main.rs before the data dir is required
            Commands::Init(args) => cmd_init(args, data_dir),

            Commands::List(args) => cmd_list(&open_store(data_dir)?, args, json),
            Commands::Show(args) => cmd_show(&open_store(data_dir)?, args, json),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn open_store(data_dir: &Path) -> Result<JsonFileStore, String> {
    if !data_dir.is_dir() {
        return Err(format!(
            "no carebook data at {} (run `carebook init` first)",
            data_dir.display()
        ));
    }
    Ok(JsonFileStore::new(data_dir))
}

fn parse_collection_arg(s: &str) -> Result<Collection, String> {
    Collection::parse_collection(s).ok_or_else(|| {
        let names: Vec<&str> = Collection::ALL.iter().map(|c| c.name()).collect();
        format!(
            "unknown collection \"{}\" (expected one of: {})",
            s,
            names.join(", ")
        )
    })
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

pub fn cmd_init(args: InitArgs, data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let path = config_io::init_data_dir(data_dir, args.force)?;
    println!("Initialized carebook in {}", data_dir.display());
    println!("  config: {}", path.display());
    Ok(())
}

fn cmd_list(
    store: &dyn DocumentStore,
    args: ListArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let collection = parse_collection_arg(&args.collection)?;

    if json {
        let out = RecordListJson {
            collection: collection.name().to_string(),
            records: store.list(collection)?,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        let rows = record_ops::rows(store, collection)?;
        if rows.is_empty() {
            println!("No {}.", collection.name());
        }
        for row in &rows {
            println!("{}", format_row(row));
        }
    }
    Ok(())
}

fn cmd_show(
    store: &dyn DocumentStore,
    args: ShowArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let collection = Collection::from_id(&args.id)
        .ok_or_else(|| format!("not a record id: {}", args.id))?;
    let doc = record_ops::show_record(store, &args.id)?
        .ok_or_else(|| format!("record not found: {}", args.id))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else {
        println!("{}", format_record(collection, &doc));
    }
    Ok(())
}
