//! `slotkeeper` CLI: manage provider availability and services, and book,
//! move or cancel appointments against a SQLite database.
//!
//! ## Usage
//!
//! ```sh
//! # Open Mondays 09:00-17:00
//! slotkeeper add-rule --provider $PROVIDER --weekday 1 --start 09:00 --end 17:00
//!
//! # Offer a 30 minute service
//! slotkeeper add-service --provider $PROVIDER --name Haircut --price-cents 2500 --duration 30
//!
//! # Book it, then move it
//! slotkeeper book --client $CLIENT --provider $PROVIDER --service $SERVICE \
//!     --date 2024-01-15 --start 09:00
//! slotkeeper reschedule $BOOKING --date 2024-01-15 --start 10:00
//!
//! # Free start times on a date
//! slotkeeper slots --provider $PROVIDER --service $SERVICE --date 2024-01-15
//! ```
//!
//! Every command prints JSON on stdout. Logs go to stderr and follow
//! `RUST_LOG`.

mod config;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use slotkeeper_adapters::lock::InMemorySlotLocker;
use slotkeeper_adapters::persistence::sqlite::SqliteDb;
use slotkeeper_app::{AvailabilityService, CatalogService, SchedulingService};
use slotkeeper_core::booking::BookingStatus;
use slotkeeper_core::ids::{ClientId, ProviderId, ServiceId};
use slotkeeper_ports::types::{BookingFilter, CreateBookingRequest};

use crate::config::CliConfig;

#[derive(Parser)]
#[command(name = "slotkeeper", version, about = "Appointment scheduling engine")]
struct Cli {
    /// Database URL (overrides SLOTKEEPER_DATABASE_URL)
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish a weekly availability window for a provider
    AddRule {
        #[arg(long)]
        provider: ProviderId,
        /// 0-6, Sunday = 0
        #[arg(long)]
        weekday: u8,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
    },
    /// Change an availability rule's window or pause it
    UpdateRule {
        rule_id: String,
        #[arg(long)]
        weekday: u8,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        #[arg(long)]
        inactive: bool,
    },
    /// List a provider's availability rules
    ListRules {
        #[arg(long)]
        provider: ProviderId,
    },
    /// Delete an availability rule
    RemoveRule { rule_id: String },
    /// Register a bookable service
    AddService {
        #[arg(long)]
        provider: ProviderId,
        #[arg(long)]
        name: String,
        #[arg(long, default_value_t = 0)]
        price_cents: u64,
        /// Length in minutes
        #[arg(long)]
        duration: u32,
    },
    /// Change a service's duration or deactivate it
    UpdateService {
        service_id: String,
        #[arg(long)]
        duration: Option<u32>,
        #[arg(long)]
        active: Option<bool>,
    },
    /// Check whether a window is inside a provider's open hours
    IsOpen {
        #[arg(long)]
        provider: ProviderId,
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        start: String,
        /// Length in minutes
        #[arg(long)]
        duration: u32,
    },
    /// Reserve a slot
    Book {
        #[arg(long)]
        client: ClientId,
        #[arg(long)]
        provider: ProviderId,
        #[arg(long)]
        service: ServiceId,
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        start: String,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Provider accepts a pending booking
    Confirm { booking_id: String },
    /// Cancel a booking
    Cancel { booking_id: String },
    /// Mark a booking as completed
    Complete { booking_id: String },
    /// Move a booking to a new date and start time
    Reschedule {
        booking_id: String,
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        start: String,
    },
    /// Show one booking
    Show { booking_id: String },
    /// List bookings, newest first
    List {
        #[arg(long)]
        provider: Option<ProviderId>,
        #[arg(long)]
        client: Option<ClientId>,
        #[arg(long)]
        status: Option<BookingStatus>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 50)]
        per_page: u32,
    },
    /// List free start times for a service on a date
    Slots {
        #[arg(long)]
        provider: ProviderId,
        #[arg(long)]
        service: ServiceId,
        #[arg(long)]
        date: NaiveDate,
        /// Minutes between candidate start times
        #[arg(long, default_value_t = 15)]
        step: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = CliConfig::from_env().with_database_url(cli.database_url);

    let db = SqliteDb::connect(&config.database_url, config.max_connections)
        .await
        .with_context(|| format!("Failed to open database: {}", config.database_url))?;
    tracing::debug!(database_url = %config.database_url, "database ready");

    let availability = AvailabilityService::new(db.clone());
    let catalog = CatalogService::new(db.clone());
    let scheduling = SchedulingService::new(
        db.clone(),
        db.clone(),
        db.clone(),
        InMemorySlotLocker::new(),
        db,
    );
    let now = Utc::now();

    match cli.command {
        Commands::AddRule {
            provider,
            weekday,
            start,
            end,
        } => print_json(&availability.add_rule(&provider, weekday, &start, &end).await?),
        Commands::UpdateRule {
            rule_id,
            weekday,
            start,
            end,
            inactive,
        } => print_json(
            &availability
                .update_rule(&rule_id, weekday, &start, &end, !inactive)
                .await?,
        ),
        Commands::ListRules { provider } => {
            print_json(&availability.list_rules(&provider).await?)
        }
        Commands::RemoveRule { rule_id } => {
            availability.remove_rule(&rule_id).await?;
            print_json(&serde_json::json!({ "removed": rule_id }))
        }
        Commands::AddService {
            provider,
            name,
            price_cents,
            duration,
        } => print_json(
            &catalog
                .add_service(&provider, &name, price_cents, duration)
                .await?,
        ),
        Commands::UpdateService {
            service_id,
            duration,
            active,
        } => print_json(
            &catalog
                .update_service(&service_id, duration, active)
                .await?,
        ),
        Commands::IsOpen {
            provider,
            date,
            start,
            duration,
        } => {
            let open = availability
                .is_open_at(&provider, date, &start, duration)
                .await?;
            print_json(&serde_json::json!({ "open": open }))
        }
        Commands::Book {
            client,
            provider,
            service,
            date,
            start,
            notes,
        } => {
            let request = CreateBookingRequest {
                client_id: client,
                provider_id: provider,
                service_id: service,
                date,
                start_time: start,
                notes,
            };
            print_json(&scheduling.create_booking(request, now).await?)
        }
        Commands::Confirm { booking_id } => {
            print_json(&scheduling.confirm_booking(&booking_id, now).await?)
        }
        Commands::Cancel { booking_id } => {
            print_json(&scheduling.cancel_booking(&booking_id, now).await?)
        }
        Commands::Complete { booking_id } => {
            print_json(&scheduling.complete_booking(&booking_id, now).await?)
        }
        Commands::Reschedule {
            booking_id,
            date,
            start,
        } => print_json(
            &scheduling
                .reschedule_booking(&booking_id, date, &start, now)
                .await?,
        ),
        Commands::Show { booking_id } => print_json(&scheduling.get_booking(&booking_id).await?),
        Commands::List {
            provider,
            client,
            status,
            page,
            per_page,
        } => {
            let filter = BookingFilter {
                provider_id: provider,
                client_id: client,
                status,
                page,
                per_page,
            };
            print_json(&scheduling.list_bookings(&filter).await?)
        }
        Commands::Slots {
            provider,
            service,
            date,
            step,
        } => print_json(
            &scheduling
                .open_slots(&provider, &service, date, step)
                .await?,
        ),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}
