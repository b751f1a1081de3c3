//! Rentdesk CLI - Command-line front end for the Rentdesk daemon

mod render;
mod rpc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use colored::Colorize;
use render::{
    ActiveLeaseView, CustomerView, DueTodayView, ExtensionView, HistoryView, NoteView,
    SearchRowView, SimView, UnitView,
};
use rpc::RpcClient;
use serde::Deserialize;
use serde_json::json;
use std::path::PathBuf;

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:9630";

#[derive(Parser)]
#[command(name = "rentdesk")]
#[command(about = "Rental unit lease tracker", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RPC server URL
    #[arg(long, env = "RENTDESK_RPC_URL", default_value = DEFAULT_RPC_URL)]
    rpc_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Search units by serial number (5 digits = suffix match)
    Search {
        /// Serial query; omit to list every unit
        #[arg(default_value = "")]
        query: String,

        /// Only units actively leased to this customer
        #[arg(short, long)]
        customer_id: Option<i64>,
    },

    /// Manage customers
    #[command(subcommand)]
    Customer(CustomerCommand),

    /// Manage units
    #[command(subcommand)]
    Unit(UnitCommand),

    /// Lease lifecycle
    #[command(subcommand)]
    Lease(LeaseCommand),

    /// SIM slots of a unit
    #[command(subcommand)]
    Sims(SimsCommand),

    /// Free-text notes on a unit
    #[command(subcommand)]
    Note(NoteCommand),
}

#[derive(Subcommand)]
enum CustomerCommand {
    /// Add a customer (existing names are left as they are)
    Add { name: String },
    /// List customers
    List,
}

#[derive(Subcommand)]
enum UnitCommand {
    /// Add a unit or fill in its model / SIM set number
    Add {
        serial_number: String,
        #[arg(short, long)]
        model: Option<String>,
        #[arg(short, long)]
        sim_set: Option<i64>,
    },
    /// List units
    List,
    /// Set the SIM set number of a unit
    SetSimSet { unit_id: i64, sim_set_number: i64 },
}

#[derive(Subcommand)]
enum LeaseCommand {
    /// Lease a unit to a customer (returns any current lease first)
    Create {
        #[arg(long)]
        unit_id: i64,
        #[arg(long)]
        customer_id: i64,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: NaiveDate,
    },
    /// Push the due date forward (max 5 times)
    Extend {
        lease_id: i64,
        /// New due date (YYYY-MM-DD)
        new_due: NaiveDate,
        #[arg(short, long)]
        reason: Option<String>,
    },
    /// Mark a lease returned
    Return { lease_id: i64 },
    /// Active leases, with the due-today reminder on top
    Active,
    /// Leases due today
    Due,
    /// Lease history of a unit
    History { unit_id: i64 },
    /// Extension log of a lease
    Extensions { lease_id: i64 },
}

#[derive(Subcommand)]
enum SimsCommand {
    /// Show stored SIMs
    Show {
        unit_id: i64,
        /// Show all 8 slots, empty ones included
        #[arg(long)]
        grid: bool,
    },
    /// Write a single slot
    Set {
        unit_id: i64,
        #[arg(long)]
        slot: u8,
        #[arg(long)]
        imei: Option<String>,
        #[arg(long)]
        vendor: Option<String>,
    },
    /// Replace all 8 slots from a JSON array of {slot, imei, vendor}
    Replace {
        unit_id: i64,
        #[arg(long)]
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum NoteCommand {
    /// Add a note
    Add {
        unit_id: i64,
        text: String,
        #[arg(short, long)]
        author: Option<String>,
    },
    /// List notes, newest first
    List { unit_id: i64 },
    /// Replace the text of a note
    Edit { note_id: i64, text: String },
    /// Delete a note
    Delete { note_id: i64 },
}

#[derive(Deserialize)]
struct ExtendResult {
    ok: bool,
    message: String,
    due_date: Option<NaiveDate>,
}

#[derive(Deserialize)]
struct NoteChange {
    note_id: i64,
    changed: bool,
}

fn success(message: String) {
    println!("{}", format!("✓ {}", message).green().bold());
}

fn report_note_change(change: NoteChange, verb: &str) {
    if change.changed {
        success(format!("Note {} {}", change.note_id, verb));
    } else {
        println!("{}", format!("Note {} not found", change.note_id).yellow());
    }
}

async fn run_lease(client: &RpcClient, command: LeaseCommand) -> Result<()> {
    match command {
        LeaseCommand::Create {
            unit_id,
            customer_id,
            start,
            due,
        } => {
            let params = json!({
                "unit_id": unit_id,
                "customer_id": customer_id,
                "start_date": start,
                "due_date": due,
            });
            let result: serde_json::Value = client.call("leases.create.v1", params).await?;
            success(format!("Lease {} created", result["lease_id"]));
        }

        LeaseCommand::Extend {
            lease_id,
            new_due,
            reason,
        } => {
            let params = json!({
                "lease_id": lease_id,
                "new_due_date": new_due,
                "reason": reason,
            });
            let result: ExtendResult = client.call("leases.extend.v1", params).await?;
            match (result.ok, result.due_date) {
                (true, Some(due)) => success(format!("{} New due date: {}", result.message, due)),
                (true, None) => success(result.message),
                (false, _) => println!("{}", format!("✗ {}", result.message).red().bold()),
            }
        }

        LeaseCommand::Return { lease_id } => {
            client
                .call::<serde_json::Value>("leases.return.v1", json!({ "lease_id": lease_id }))
                .await?;
            success(format!("Lease {} returned", lease_id));
        }

        LeaseCommand::Active => {
            let due: Vec<DueTodayView> = client.call("leases.due_today.v1", json!({})).await?;
            if let Some(banner) = render::due_today_banner(&due) {
                println!("{}", banner);
                println!();
            }

            let leases: Vec<ActiveLeaseView> = client.call("leases.active.v1", json!({})).await?;
            if leases.is_empty() {
                println!("{}", "No active leases".yellow());
            } else {
                println!("{}", render::active_table(&leases));
            }
        }

        LeaseCommand::Due => {
            let due: Vec<DueTodayView> = client.call("leases.due_today.v1", json!({})).await?;
            if due.is_empty() {
                println!("{}", "Nothing due today".green());
            } else {
                println!("{}", render::due_today_table(&due));
            }
        }

        LeaseCommand::History { unit_id } => {
            let history: Vec<HistoryView> = client
                .call("leases.history.v1", json!({ "unit_id": unit_id }))
                .await?;
            println!("{}", render::history_table(&history));
        }

        LeaseCommand::Extensions { lease_id } => {
            let log: Vec<ExtensionView> = client
                .call("leases.extensions.v1", json!({ "lease_id": lease_id }))
                .await?;
            println!("{}", render::extensions_table(&log));
        }
    }
    Ok(())
}

async fn run_sims(client: &RpcClient, command: SimsCommand) -> Result<()> {
    match command {
        SimsCommand::Show { unit_id, grid } => {
            let sims: Vec<SimView> = client
                .call("sims.list.v1", json!({ "unit_id": unit_id, "grid": grid }))
                .await?;
            println!("{}", render::sims_table(&sims));
        }

        SimsCommand::Set {
            unit_id,
            slot,
            imei,
            vendor,
        } => {
            let params = json!({
                "unit_id": unit_id,
                "slot": slot,
                "imei": imei,
                "vendor": vendor,
            });
            client
                .call::<serde_json::Value>("sims.upsert.v1", params)
                .await?;
            success(format!("Slot {} of unit {} saved", slot, unit_id));
        }

        SimsCommand::Replace { unit_id, file } => {
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let sims: serde_json::Value =
                serde_json::from_str(&raw).context("SIM file is not valid JSON")?;
            let result: serde_json::Value = client
                .call("sims.replace.v1", json!({ "unit_id": unit_id, "sims": sims }))
                .await?;
            success(format!(
                "SIM set of unit {} replaced ({} slots)",
                unit_id, result["slots"]
            ));
        }
    }
    Ok(())
}

async fn run_note(client: &RpcClient, command: NoteCommand) -> Result<()> {
    match command {
        NoteCommand::Add {
            unit_id,
            text,
            author,
        } => {
            let params = json!({ "unit_id": unit_id, "text": text, "author": author });
            let result: serde_json::Value = client.call("notes.add.v1", params).await?;
            success(format!("Note {} added", result["note_id"]));
        }

        NoteCommand::List { unit_id } => {
            let notes: Vec<NoteView> = client
                .call("notes.list.v1", json!({ "unit_id": unit_id }))
                .await?;
            if notes.is_empty() {
                println!("{}", "No notes".yellow());
            } else {
                println!("{}", render::notes_table(&notes));
            }
        }

        NoteCommand::Edit { note_id, text } => {
            let change: NoteChange = client
                .call("notes.update.v1", json!({ "note_id": note_id, "text": text }))
                .await?;
            report_note_change(change, "updated");
        }

        NoteCommand::Delete { note_id } => {
            let change: NoteChange = client
                .call("notes.delete.v1", json!({ "note_id": note_id }))
                .await?;
            report_note_change(change, "deleted");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = RpcClient::new(cli.rpc_url);

    match cli.command {
        Commands::Search { query, customer_id } => {
            let params = json!({ "query": query, "customer_id": customer_id });
            let rows: Vec<SearchRowView> = client.call("units.search.v1", params).await?;
            if rows.is_empty() {
                println!("{}", "No matching units".yellow());
            } else {
                println!("{}", render::search_table(&rows));
            }
        }

        Commands::Customer(CustomerCommand::Add { name }) => {
            let result: serde_json::Value = client
                .call("customers.create.v1", json!({ "name": name }))
                .await?;
            success(format!("Customer {} saved", result["name"]));
        }

        Commands::Customer(CustomerCommand::List) => {
            let customers: Vec<CustomerView> =
                client.call("customers.list.v1", json!({})).await?;
            println!("{}", render::customers_table(&customers));
        }

        Commands::Unit(UnitCommand::Add {
            serial_number,
            model,
            sim_set,
        }) => {
            let params = json!({
                "serial_number": serial_number,
                "model": model,
                "sim_set_number": sim_set,
            });
            let result: serde_json::Value = client.call("units.upsert.v1", params).await?;
            success(format!("Unit {} saved ({})", result["unit_id"], serial_number));
        }

        Commands::Unit(UnitCommand::List) => {
            let units: Vec<UnitView> = client.call("units.list.v1", json!({})).await?;
            println!("{}", render::units_table(&units));
        }

        Commands::Unit(UnitCommand::SetSimSet {
            unit_id,
            sim_set_number,
        }) => {
            let params = json!({ "unit_id": unit_id, "sim_set_number": sim_set_number });
            client
                .call::<serde_json::Value>("units.set_sim_set.v1", params)
                .await?;
            success(format!(
                "Unit {} now uses SIM set {}",
                unit_id, sim_set_number
            ));
        }

        Commands::Lease(command) => run_lease(&client, command).await?,
        Commands::Sims(command) => run_sims(&client, command).await?,
        Commands::Note(command) => run_note(&client, command).await?,
    }

    Ok(())
}
