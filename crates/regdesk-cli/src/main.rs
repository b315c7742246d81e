//! regdesk CLI
//!
//! Review, filter, export, and verify event registrations from the terminal.
//!
//! ## Usage
//!
//! ```bash
//! regdesk list --status pending --search iiser
//! regdesk show REG-0042
//! regdesk export --sub-event x-press --format csv
//! regdesk set-status REG-0042 --status verified --payment-verified true
//! regdesk --input registrations.json columns
//! ```

mod logging;
mod render;

use std::path::PathBuf;
use std::process;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use regdesk_client::{
	ClientConfig, ClientError, Dashboard, EventScope, HttpRegistrationClient, JsonFileApi,
	RegistrationApi,
};
use regdesk_conf::Settings;
use regdesk_tables::export::{ExportFormat, export_rows};
use regdesk_tables::filters::{PaymentFilter, status_counts};
use regdesk_tables::state::Action;
use regdesk_tables::{DetailView, RecordColumn, TableConfig};
use regdesk_types::{RegistrationStatus, StatusUpdate};

#[derive(Parser, Debug)]
#[command(name = "regdesk")]
#[command(about = "Event registration review dashboard", long_about = None)]
#[command(version)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	/// Path to the settings file (defaults to regdesk.toml)
	#[arg(short, long, global = true, value_name = "PATH")]
	config: Option<PathBuf>,

	/// Read registrations from a JSON file instead of the API
	#[arg(short, long, global = true, value_name = "FILE")]
	input: Option<PathBuf>,

	/// Event to load registrations for
	#[arg(short, long, global = true, default_value = "all")]
	event: EventScope,

	/// Verbosity level (can be repeated)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	verbosity: u8,
}

#[derive(Subcommand, Debug)]
enum Commands {
	/// Show the filtered registration table
	List {
		#[command(flatten)]
		filters: FilterArgs,

		/// Show every column instead of the summary columns
		#[arg(long)]
		all_columns: bool,
	},

	/// Show every field of one registration
	Show {
		/// Registration identifier
		#[arg(value_name = "ID")]
		id: String,
	},

	/// Export the filtered registrations
	Export {
		#[command(flatten)]
		filters: FilterArgs,

		/// Output format: csv, tsv, or json
		#[arg(short, long, default_value = "csv")]
		format: ExportFormat,

		/// Output file (defaults to a dated name in the current directory)
		#[arg(short, long, value_name = "PATH")]
		output: Option<PathBuf>,
	},

	/// List the derived columns in display order
	Columns,

	/// Change a registration's status and payment flag
	SetStatus {
		/// Registration identifier
		#[arg(value_name = "ID")]
		id: String,

		/// New status: pending, verified, or cancelled
		#[arg(short, long)]
		status: RegistrationStatus,

		/// New payment flag (defaults to the current value)
		#[arg(long, value_name = "BOOL")]
		payment_verified: Option<bool>,

		/// Message sent to the registrant
		#[arg(short, long)]
		message: Option<String>,
	},
}

#[derive(Args, Debug, Default)]
struct FilterArgs {
	/// Free-text search across every field
	#[arg(long)]
	search: Option<String>,

	/// Only this status
	#[arg(long)]
	status: Option<RegistrationStatus>,

	/// Payment filter: all, verified, or pending
	#[arg(long, default_value = "all")]
	payment: PaymentFilter,

	/// Only registrations that include this sub-event
	#[arg(long, value_name = "ID")]
	sub_event: Option<String>,
}

impl FilterArgs {
	fn actions(&self) -> Vec<Action> {
		vec![
			Action::SetQuery(self.search.clone().unwrap_or_default()),
			Action::SetStatusFilter(self.status),
			Action::SetPaymentFilter(self.payment),
			Action::SetSubEventFilter(self.sub_event.clone()),
		]
	}
}

#[tokio::main]
async fn main() {
	let cli = Cli::parse();

	if let Err(e) = run(cli).await {
		eprintln!("{} {:#}", "Error:".red(), e);
		if let Some(ClientError::Unauthorized {
			login_url: Some(url),
		}) = e.downcast_ref::<ClientError>()
		{
			eprintln!("Log in at {}", url.cyan());
		}
		process::exit(1);
	}
}

fn backend(cli: &Cli, settings: &Settings) -> anyhow::Result<Box<dyn RegistrationApi>> {
	if let Some(path) = &cli.input {
		return Ok(Box::new(JsonFileApi::new(path)));
	}

	let mut config = ClientConfig::new(&settings.api.base_url)
		.with_timeout(std::time::Duration::from_secs(settings.api.timeout_secs));
	if let Some(token) = &settings.api.token {
		config = config.with_token(token);
	}
	if let Some(login_url) = &settings.api.login_url {
		config = config.with_login_url(login_url);
	}
	Ok(Box::new(HttpRegistrationClient::new(config)?))
}

async fn run(cli: Cli) -> anyhow::Result<()> {
	let settings = Settings::load(cli.config.as_deref()).context("loading settings")?;
	logging::init(&settings.logging.level, cli.verbosity);

	let config = settings.table_config()?;
	let dashboard = Dashboard::new(backend(&cli, &settings)?, config.fields.clone());
	dashboard.refresh(&cli.event).await?;

	match cli.command {
		Commands::List {
			filters,
			all_columns,
		} => {
			apply_filters(&dashboard, &filters);
			dashboard.with_state(|state| {
				if state.is_empty() {
					println!("{}", "No registrations match the current filters.".yellow());
					return;
				}
				println!("{}", render::records_table(state, &config, all_columns));
				let counts = status_counts(state.records(), state.fields());
				println!(
					"{}",
					render::counts_line(&counts, state.visible_records().len()).dimmed()
				);
			});
		}
		Commands::Show { id } => {
			let view = dashboard.with_state(|state| {
				state.record(&id).map(|record| {
					DetailView::build(
						record,
						&config.fields.id,
						&config.rules,
						&config.formatter,
						&config.collection_fields,
					)
				})
			});
			let Some(view) = view else {
				bail!("no registration with id '{}'", id);
			};
			print!("{}", render::detail_text(&view));
		}
		Commands::Export {
			filters,
			format,
			output,
		} => {
			apply_filters(&dashboard, &filters);
			let scope = filters
				.sub_event
				.clone()
				.unwrap_or_else(|| cli.event.to_string());
			let path = export(&dashboard, &config, format, &scope, output)?;
			println!("{} {}", "Exported".green(), path.display());
		}
		Commands::Columns => {
			let columns = dashboard.with_state(|state| state.columns(&config));
			if columns.is_empty() {
				println!("{}", "No registrations loaded.".yellow());
			} else {
				print!("{}", render::columns_text(&columns, &config.rules));
			}
		}
		Commands::SetStatus {
			id,
			status,
			payment_verified,
			message,
		} => {
			let current = dashboard.with_state(|state| {
				state
					.record(&id)
					.map(|record| record.payment_verified(&config.fields.payment))
			});
			let Some(current) = current else {
				bail!("no registration with id '{}'", id);
			};

			let mut update = StatusUpdate::new(&id, status, payment_verified.unwrap_or(current));
			if let Some(message) = message {
				update = update.with_message(message);
			}
			let reply = dashboard.update_status(update).await?;
			println!(
				"{} {} is now {}",
				"Updated".green(),
				id,
				status.to_string().bold()
			);
			if let Some(reply) = reply {
				println!("{}", reply.dimmed());
			}
		}
	}

	Ok(())
}

fn apply_filters<A: RegistrationApi>(dashboard: &Dashboard<A>, filters: &FilterArgs) {
	for action in filters.actions() {
		dashboard.dispatch(action);
	}
}

fn export<A: RegistrationApi>(
	dashboard: &Dashboard<A>,
	config: &TableConfig,
	format: ExportFormat,
	scope: &str,
	output: Option<PathBuf>,
) -> anyhow::Result<PathBuf> {
	let date = chrono::Local::now().date_naive();
	let result = dashboard.with_state(|state| {
		let names = state.columns(config);
		let columns = RecordColumn::from_names(&names, &config.rules, &config.formatter);
		export_rows(format, &columns, &state.visible_records(), scope, date)
	})?;

	let path = output.unwrap_or_else(|| PathBuf::from(&result.filename));
	std::fs::write(&path, &result.data)
		.with_context(|| format!("writing {}", path.display()))?;
	tracing::info!(path = %path.display(), rows = result.row_count, "export written");
	Ok(path)
}
