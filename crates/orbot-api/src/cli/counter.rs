//! Counter subcommands for direct store access.
//!
//! These operate on the same backing file the server uses; run them while
//! the server is stopped (one process per backing file).

use anyhow::Result;
use clap::Subcommand;
use comfy_table::{Cell, ContentArrangement, Table, presets};
use console::style;

use orbot_core::store::CounterStore;
use orbot_infra::store::JsonCounterStore;

/// Counter subcommands.
#[derive(Subcommand)]
pub enum CounterCommand {
    /// Show the claim count for a user id.
    Get {
        /// Platform account id.
        id: String,
    },

    /// Overwrite the claim count for a user id.
    Set {
        /// Platform account id.
        id: String,

        /// New count (may be negative).
        count: i64,
    },

    /// List all counters.
    #[command(alias = "ls")]
    List,
}

/// Handle a counter subcommand.
pub async fn handle_counter_command(
    cmd: CounterCommand,
    store: &JsonCounterStore,
    json: bool,
) -> Result<()> {
    match cmd {
        CounterCommand::Get { id } => counter_get(store, &id, json).await,
        CounterCommand::Set { id, count } => counter_set(store, &id, count, json).await,
        CounterCommand::List => counter_list(store, json).await,
    }
}

async fn counter_get(store: &JsonCounterStore, id: &str, json: bool) -> Result<()> {
    let count = store.get(id).await;

    if json {
        let result = serde_json::json!({ "id": id, "count": count });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!();
        println!(
            "  {} has used {} claims",
            style(id).cyan(),
            style(count).bold()
        );
        println!();
    }

    Ok(())
}

async fn counter_set(store: &JsonCounterStore, id: &str, count: i64, json: bool) -> Result<()> {
    store.set(id, count).await?;

    if json {
        let result = serde_json::json!({ "id": id, "count": count });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!();
        println!(
            "  {} Set '{}' to {}",
            style("ok").green(),
            style(id).cyan(),
            style(count).bold()
        );
        println!();
    }

    Ok(())
}

async fn counter_list(store: &JsonCounterStore, json: bool) -> Result<()> {
    let entries = store.entries().await;

    if json {
        let result: Vec<_> = entries
            .iter()
            .map(|(id, count)| serde_json::json!({ "id": id, "count": count }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!();
        println!("  No counters recorded yet.");
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_BORDERS_ONLY)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![Cell::new("User"), Cell::new("Claims used")]);
    for (id, count) in &entries {
        table.add_row(vec![Cell::new(id), Cell::new(count)]);
    }

    println!();
    println!("{table}");
    println!();

    Ok(())
}
