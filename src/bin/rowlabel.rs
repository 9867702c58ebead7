//! Rowlabel CLI — feedback-table labelling against a file-backed store.
//!
//! Usage:
//!   rowlabel extract --store <dir> --page <id> [--batch N] [--json]
//!   rowlabel status  --store <dir> --page <id>
//!   rowlabel prompt  --subject <text> [--description <text>]
//!   rowlabel apply   --store <dir> --page <id> --labels <json|@file>
//!   rowlabel seed    --store <dir> --page <id> [--title <text>]

use clap::{Parser, Subcommand};
use rowlabel::{classification_prompt, FileStore, LabelConfig, LabelService};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "rowlabel",
    version,
    about = "Idempotent feedback-table labelling for rich-text documents"
)]
struct Cli {
    /// YAML config with taxonomy and threshold overrides
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the next batch of unlabeled feedback rows
    Extract {
        /// Directory holding page files
        #[arg(long)]
        store: PathBuf,
        /// Page ID
        #[arg(long)]
        page: String,
        /// Rows per batch (clamped to 20)
        #[arg(long)]
        batch: Option<usize>,
        /// Emit the batch as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show how many rows on a page still need labels
    Status {
        #[arg(long)]
        store: PathBuf,
        #[arg(long)]
        page: String,
    },
    /// Print the classification prompt for one feedback row
    Prompt {
        #[arg(long)]
        subject: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Apply a JSON array of {rowIndex, theme, impact} updates
    Apply {
        #[arg(long)]
        store: PathBuf,
        #[arg(long)]
        page: String,
        /// Inline JSON array, or @path to read it from a file
        #[arg(long)]
        labels: String,
    },
    /// Create a sample feedback page in the store, for trying things out
    Seed {
        #[arg(long)]
        store: PathBuf,
        #[arg(long)]
        page: String,
        #[arg(long, default_value = "Customer Feedback")]
        title: String,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<LabelConfig, String> {
    match path {
        Some(p) => LabelConfig::from_yaml_file(p)
            .map_err(|e| format!("cannot load config '{}': {}", p.display(), e)),
        None => Ok(LabelConfig::default()),
    }
}

fn service_for(store: PathBuf, config: LabelConfig) -> LabelService {
    LabelService::new(Arc::new(FileStore::new(store))).with_config(config)
}

async fn cmd_extract(
    service: &LabelService,
    page: &str,
    batch: Option<usize>,
    json: bool,
) -> i32 {
    let result = match service.next_rows(page, batch).await {
        Ok(batch) => batch,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    if json {
        match serde_json::to_string_pretty(&result) {
            Ok(out) => println!("{}", out),
            Err(e) => {
                eprintln!("Error: {}", e);
                return 1;
            }
        }
        return 0;
    }

    if result.rows.is_empty() {
        println!("No unlabeled rows on page '{}'.", page);
        return 0;
    }
    println!("{:>5}  {:<32}  DESCRIPTION", "ROW", "SUBJECT");
    println!("{}", "-".repeat(72));
    for row in &result.rows {
        println!("{:>5}  {:<32}  {}", row.row_index, row.subject, row.description);
    }
    println!(
        "{} unlabeled of {} data rows (table at {})",
        result.rows.len(),
        result.total_rows,
        result.table_path
    );
    0
}

async fn cmd_status(service: &LabelService, page: &str) -> i32 {
    match service.next_rows(page, Some(1)).await {
        Ok(batch) if batch.rows.is_empty() => {
            println!("All {} data rows labeled.", batch.total_rows);
            0
        }
        Ok(batch) => {
            println!(
                "Unlabeled rows remain (first at row {}, {} data rows total).",
                batch.rows[0].row_index, batch.total_rows
            );
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

async fn cmd_apply(service: &LabelService, page: &str, labels: &str) -> i32 {
    let payload = if let Some(path) = labels.strip_prefix('@') {
        match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                eprintln!("Error: cannot read '{}': {}", path, e);
                return 1;
            }
        }
    } else {
        labels.to_string()
    };

    match service.apply_labels_json(page, &payload).await {
        Ok(written) => {
            println!("Wrote {} label cell(s) on page '{}'.", written, page);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_seed(store: &PathBuf, page: &str, title: &str) -> i32 {
    use rowlabel::{kind, Node};

    let header = Node::container(
        kind::TABLE_ROW,
        vec![Node::header_cell("Subject"), Node::header_cell("Description")],
    );
    let rows = [
        ("Export fails", "CSV export times out on large projects"),
        ("Add dark mode", "Please add a dark theme to the dashboard"),
        ("Login loop", "Password reset sends me back to the login page"),
    ];
    let mut table_rows = vec![header];
    for (subject, description) in rows {
        table_rows.push(Node::container(
            kind::TABLE_ROW,
            vec![Node::table_cell(subject), Node::table_cell(description)],
        ));
    }
    let doc = Node::container(
        kind::DOC,
        vec![
            Node::paragraph("Collected feedback"),
            Node::container(kind::TABLE, table_rows),
        ],
    );

    match FileStore::new(store.clone()).create(page, title, &doc) {
        Ok(()) => {
            println!("Seeded page '{}' in {}.", page, store.display());
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match load_config(cli.config.as_ref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let code = match cli.command {
        Commands::Extract {
            store,
            page,
            batch,
            json,
        } => cmd_extract(&service_for(store, config), &page, batch, json).await,
        Commands::Status { store, page } => cmd_status(&service_for(store, config), &page).await,
        Commands::Prompt {
            subject,
            description,
        } => {
            println!(
                "{}",
                classification_prompt(&config.taxonomy, &subject, &description)
            );
            0
        }
        Commands::Apply {
            store,
            page,
            labels,
        } => cmd_apply(&service_for(store, config), &page, &labels).await,
        Commands::Seed { store, page, title } => cmd_seed(&store, &page, &title),
    };
    std::process::exit(code);
}
