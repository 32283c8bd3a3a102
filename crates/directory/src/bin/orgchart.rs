//! Command-line access to the employee directory and its org chart.
//!
//! Usage: `cargo run --bin orgchart -- --data-dir ./data tree --all`

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use directory::config::resolve_data_dir;
use directory::{
    load_or_create_directory_config, Directory, DirectoryError, DirectoryResult, DirectoryView,
    EmployeePatch, FileEmployeeStore, NewEmployee, ViewRow,
};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "orgchart", about = "Browse and edit the employee directory")]
struct Cli {
    /// Directory holding directory.json and the employee store
    #[arg(long, env = "DIRECTORY_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the org chart for one page of the listing
    Tree {
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Page size; defaults to the view page size from the config
        #[arg(long)]
        limit: Option<usize>,

        /// Expand every manager
        #[arg(long)]
        all: bool,

        /// Print the forest as JSON instead of an indented tree
        #[arg(long)]
        json: bool,
    },

    /// Search by name, designation or department
    Search { query: String },

    /// Show one employee with manager and direct reports
    Show { id: String },

    /// Create employees from a JSON array of create payloads
    Import { path: PathBuf },

    /// Add an employee
    Add {
        first_name: String,
        last_name: String,
        designation: String,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        department: Option<String>,

        #[arg(long)]
        manager: Option<String>,

        #[arg(long)]
        sort_order: Option<i32>,
    },

    /// Change who an employee reports to; omit --manager to make them top-level
    Move {
        id: String,

        #[arg(long)]
        manager: Option<String>,
    },

    /// Delete an employee; their reports become top-level
    Remove { id: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> DirectoryResult<()> {
    let data_dir = resolve_data_dir(cli.data_dir);
    let config = load_or_create_directory_config(&data_dir)?;
    let store = Arc::new(FileEmployeeStore::new(config.store_path(&data_dir)));
    let directory = Directory::open(store)
        .await?
        .with_page_sizes(
            config.listing.default_page_size,
            config.listing.max_page_size,
        );

    match cli.command {
        Commands::Tree {
            page,
            limit,
            all,
            json,
        } => {
            let mut preferences = config.view.clone();
            if let Some(limit) = limit {
                preferences.page_size = limit;
            }
            let mut view = DirectoryView::new(&preferences);
            // Page numbers clamp against the known page count, so learn it first.
            view.refresh(&directory).await?;
            if page > 1 {
                view.set_page(page);
                view.refresh(&directory).await?;
            }
            if all {
                view.expand_all();
            }

            if json {
                print_json(view.forest())?;
            } else if view.is_empty() {
                println!("No employees found.");
            } else {
                print_rows(&view.rows());
                println!(
                    "page {} of {} ({} employees)",
                    view.page(),
                    view.total_pages(),
                    view.total()
                );
            }
        }
        Commands::Search { query } => {
            // Search lists flat matches, so use the wider listing page.
            let mut preferences = config.view.clone();
            preferences.page_size = config.listing.default_page_size;
            let mut view = DirectoryView::new(&preferences);
            view.set_search(query);
            view.refresh(&directory).await?;
            let rows = view.rows();
            if rows.is_empty() {
                println!("No employees match.");
            } else {
                print_rows(&rows);
            }
        }
        Commands::Show { id } => {
            print_json(&directory.get_employee(&id).await?)?;
        }
        Commands::Import { path } => {
            let data = tokio::fs::read(&path).await.map_err(|error| {
                DirectoryError::InvalidInput(format!(
                    "failed to read {}: {error}",
                    path.display()
                ))
            })?;
            let entries: Vec<NewEmployee> = serde_json::from_slice(&data).map_err(|error| {
                DirectoryError::InvalidInput(format!(
                    "failed to parse {}: {error}",
                    path.display()
                ))
            })?;
            let created = directory.import_employees(entries).await?;
            for employee in &created {
                println!("{} {}", employee.id, employee.display_name());
            }
            println!("Imported {} employees.", created.len());
        }
        Commands::Add {
            first_name,
            last_name,
            designation,
            email,
            department,
            manager,
            sort_order,
        } => {
            let mut payload = NewEmployee::new(first_name, last_name, designation);
            payload.email = email;
            payload.department = department;
            payload.manager_id = manager;
            payload.sort_order = sort_order;
            let employee = directory.create_employee(payload).await?;
            println!("{}", employee.id);
        }
        Commands::Move { id, manager } => {
            let patch = EmployeePatch {
                manager_id: Some(manager),
                ..EmployeePatch::default()
            };
            directory.update_employee(&id, patch).await?;
        }
        Commands::Remove { id } => {
            let removed = directory.delete_employee(&id).await?;
            println!("Removed {}", removed.display_name());
        }
    }
    Ok(())
}

fn print_rows(rows: &[ViewRow]) {
    for row in rows {
        let marker = match (row.has_children, row.expanded) {
            (false, _) => ' ',
            (true, true) => '-',
            (true, false) => '+',
        };
        let department = row
            .department
            .as_deref()
            .map(|department| format!(" / {department}"))
            .unwrap_or_default();
        println!(
            "{indent}{marker} {name} ({designation}{department}) [{status}] {id}",
            indent = "  ".repeat(row.depth),
            name = row.name,
            designation = row.designation,
            status = row.status,
            id = row.id,
        );
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> DirectoryResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|error| DirectoryError::Internal(format!("failed to serialize output: {error}")))?;
    println!("{json}");
    Ok(())
}
