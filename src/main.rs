use clap::{Parser, Subcommand, ValueEnum};
use joinlab::datasets::Dataset;
use joinlab::error::JoinlabError;
use joinlab::join::{compute_join, JoinType};
use joinlab::model::DatabaseSchema;
use joinlab::related::find_all_related_rows;
use joinlab::sql::{generate_create_table_sql_in, generate_schema_sql};
use joinlab::table_text::{render_join, render_related, render_table};
use log::{debug, info, LevelFilter};
use std::fs;
use std::path::PathBuf;
use std::process;

/// Explore joins and foreign-key relationships over sample tables.
#[derive(Parser, Debug)]
#[command(name = "joinlab", version, about)]
struct Cli {
    /// Built-in dataset: shop, music or normalization
    #[arg(short, long, global = true, value_enum, default_value_t = Dataset::Music)]
    dataset: Dataset,

    /// JSON schema file ({"tables": [...], "relationships": [...]}); overrides --dataset
    #[arg(short, long, global = true)]
    schema: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Output file (default: stdout)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Join two tables on a column
    Join {
        #[arg(long)]
        left: String,
        #[arg(long)]
        right: String,
        /// Column id in the left table
        #[arg(long)]
        left_column: String,
        /// Column id in the right table (default: same as --left-column)
        #[arg(long)]
        right_column: Option<String>,
        /// inner, left, right, full_outer or cross
        #[arg(short = 't', long = "type", default_value = "inner")]
        join_type: JoinType,
    },
    /// Rows related to one row through foreign keys
    Related {
        #[arg(long)]
        table: String,
        #[arg(long)]
        row: String,
    },
    /// CREATE TABLE statements
    Ddl {
        /// Only this table (default: all)
        #[arg(long)]
        table: Option<String>,
    },
    /// Print the tables of the schema
    Dataset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    // RUST_LOG still wins when set
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn load_schema(cli: &Cli) -> Result<DatabaseSchema, JoinlabError> {
    match &cli.schema {
        Some(path) => {
            info!("Loading schema from {}", path.display());
            let text = fs::read_to_string(path).map_err(|source| JoinlabError::Io {
                path: path.clone(),
                source,
            })?;
            Ok(serde_json::from_str(&text)?)
        }
        None => {
            info!("Using built-in dataset {}", cli.dataset);
            Ok(cli.dataset.schema())
        }
    }
}

fn run(cli: &Cli) -> Result<String, JoinlabError> {
    let schema = load_schema(cli)?;
    debug!(
        "Schema has {} table(s), {} relationship(s)",
        schema.tables.len(),
        schema.relationships.len()
    );
    let json = cli.format == Format::Json;

    let out = match &cli.command {
        Command::Join {
            left,
            right,
            left_column,
            right_column,
            join_type,
        } => {
            let l = schema.require_table(left)?;
            let r = schema.require_table(right)?;
            let right_column = right_column.as_deref().unwrap_or(left_column);
            let result = compute_join(l, r, left_column, right_column, *join_type);
            if json {
                serde_json::to_string_pretty(&result)?
            } else {
                render_join(&result, l, r)
            }
        }
        Command::Related { table, row } => {
            let (t, r) = schema.locate(table, row)?;
            let related = find_all_related_rows(r, t, &schema);
            if json {
                serde_json::to_string_pretty(&related)?
            } else {
                render_related(&related)
            }
        }
        Command::Ddl { table: Some(id) } => {
            generate_create_table_sql_in(&schema, schema.require_table(id)?)
        }
        Command::Ddl { table: None } => generate_schema_sql(&schema),
        Command::Dataset => {
            if json {
                serde_json::to_string_pretty(&schema)?
            } else {
                schema
                    .tables
                    .iter()
                    .map(render_table)
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        }
    };

    Ok(out)
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let out = match run(&cli) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };

    match &cli.output {
        Some(path) => {
            if let Err(e) = fs::write(path, &out) {
                eprintln!("Failed to write {}: {}", path.display(), e);
                process::exit(1);
            }
            info!("Wrote {}", path.display());
        }
        None => {
            if out.ends_with('\n') {
                print!("{}", out);
            } else {
                println!("{}", out);
            }
        }
    }
}
