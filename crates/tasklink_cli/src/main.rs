//! Command-line entry point for the task store.
//!
//! # Responsibility
//! - Drive `TaskService` operations with JSON arguments and JSON output.
//! - Resolve configuration from file, environment and flags, in that order.
//!
//! Successful results go to stdout; failures go to stderr with a non-zero
//! exit code, including the per-field mapping for validation failures.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use serde_json::Value;
use std::path::PathBuf;
use std::process::ExitCode;
use tasklink_core::db::open_db;
use tasklink_core::representation::TASK_FIELDS;
use tasklink_core::{
    core_version, init_logging, SqliteTaskRepository, TaskLinkConfig, TaskListQuery,
    TaskService, TaskServiceError,
};

/// Manage tasks through their hyperlinked representation
#[derive(Parser)]
#[command(name = "tasklink", version, about, long_about = None)]
struct Cli {
    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database file
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Origin prefixed to task URLs, e.g. http://localhost:8000
    #[arg(long, global = true)]
    origin: Option<String>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a task from a JSON object, e.g. '{"text": "buy milk"}'
    Create { data: String },

    /// Show one task
    Show { id: i64 },

    /// Update a task from a JSON object
    Update {
        id: i64,
        data: String,

        /// Only change the supplied fields
        #[arg(long)]
        partial: bool,
    },

    /// Delete a task
    Delete { id: i64 },

    /// List tasks ordered by id
    List {
        #[arg(long)]
        completed: Option<bool>,

        #[arg(long)]
        limit: Option<u32>,

        #[arg(long, default_value_t = 0)]
        offset: u32,
    },

    /// Print the exposed field allowlist
    Fields,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(Some(output)) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Ok(None) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<Option<String>> {
    if let Command::Fields = cli.command {
        return Ok(Some(render(&fields_listing())?));
    }

    let config = load_config(&cli)?;
    if let Some(settings) = config.log_settings() {
        init_logging(&settings)?;
    }
    info!(
        "event=cli_start module=cli status=ok version={}",
        core_version()
    );

    let conn = open_db(&config.db_path)
        .with_context(|| format!("cannot open `{}`", config.db_path.display()))?;
    let service = TaskService::new(SqliteTaskRepository::new(&conn), config.resolver()?)
        .with_list_limit_max(config.list_limit_max);

    let output = match cli.command {
        Command::Create { data } => render(&service.create(&parse_data(&data)?)?)?,
        Command::Show { id } => render(&service.retrieve(id)?)?,
        Command::Update { id, data, partial } => {
            let data = parse_data(&data)?;
            let updated = if partial {
                service.partial_update(id, &data)?
            } else {
                service.update(id, &data)?
            };
            render(&updated)?
        }
        Command::Delete { id } => {
            service.destroy(id)?;
            return Ok(None);
        }
        Command::List {
            completed,
            limit,
            offset,
        } => render(&service.list(&TaskListQuery {
            completed,
            limit,
            offset,
        })?)?,
        Command::Fields => render(&fields_listing())?,
    };
    Ok(Some(output))
}

fn load_config(cli: &Cli) -> Result<TaskLinkConfig> {
    let mut config = match &cli.config {
        Some(path) => TaskLinkConfig::from_file(path)?,
        None => TaskLinkConfig::default(),
    }
    .apply_env_overrides();

    if let Some(db) = &cli.db {
        config.db_path = db.clone();
    }
    if let Some(origin) = &cli.origin {
        config.origin = Some(origin.clone());
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(dir) = &cli.log_dir {
        config.log_dir = Some(dir.clone());
    }
    Ok(config)
}

fn parse_data(raw: &str) -> Result<Value> {
    serde_json::from_str(raw).context("task data must be valid JSON")
}

fn fields_listing() -> Value {
    TASK_FIELDS
        .iter()
        .map(|field| {
            serde_json::json!({
                "name": field.name,
                "read_only": field.is_read_only(),
                "required": field.writer().is_some_and(|writer| writer.required),
            })
        })
        .collect()
}

fn render(value: &impl serde::Serialize) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn report(err: &anyhow::Error) {
    match err.downcast_ref::<TaskServiceError>() {
        Some(service_err) => {
            eprintln!("error[{}]: {service_err}", service_err.code());
            if let Some(details) = service_err
                .validation()
                .and_then(|validation| serde_json::to_string_pretty(validation).ok())
            {
                eprintln!("{details}");
            }
        }
        None => eprintln!("error: {err:#}"),
    }
}

#[cfg(test)]
mod tests {
    use super::{fields_listing, Cli};
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn fields_listing_marks_writable_fields() {
        let listing = fields_listing();
        let names: Vec<&str> = listing
            .as_array()
            .unwrap()
            .iter()
            .map(|entry| entry["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["url", "id", "text", "completed", "created_at"]);
        assert_eq!(listing[2]["required"], true);
        assert_eq!(listing[3]["read_only"], false);
        assert_eq!(listing[4]["read_only"], true);
    }
}
