use std::path::PathBuf;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::blob_store::FileBlobStore;
use crate::io::data_dir::discover_data_dir;
use crate::io::persistence::Persistence;
use crate::ops::search::filter_items;

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let data_dir = resolve_data_dir(cli.data_dir.as_deref())?;
    tracing::debug!(data_dir = %data_dir.display(), "using data directory");

    match cli.command {
        None => crate::tui::run(&data_dir),
        Some(Commands::List(args)) => cmd_list(&data_dir, args, json),
    }
}

/// `-C` wins; otherwise the nearest `.jot/` above the working directory
fn resolve_data_dir(dir: Option<&str>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    match dir {
        Some(dir) => Ok(PathBuf::from(dir)),
        None => {
            let cwd = std::env::current_dir()
                .map_err(|e| format!("cannot read working directory: {}", e))?;
            Ok(discover_data_dir(&cwd))
        }
    }
}

fn cmd_list(
    data_dir: &std::path::Path,
    args: ListArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let items = Persistence::new(FileBlobStore::new(data_dir)).load();
    let query = args.query.unwrap_or_default();
    let shown = filter_items(&items, &query);

    if json {
        let out: Vec<ItemJson> = shown.into_iter().map(ItemJson::from).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    for item in shown {
        println!("{}", format_item_line(item));
    }
    Ok(())
}
