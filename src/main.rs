use clap::{Parser as ClapParser, Subcommand};
use pql::cli::{self, CheckOptions, CheckResult, CliError};
use std::io::{self, Read};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "pql")]
#[command(about = "PQL - parse and bind bitmap index queries")]
#[command(version)]
struct Cli {
    /// JSON file with extra operation schemas
    #[arg(long, global = true, env = "PQL_SCHEMA")]
    schema: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and bind a query, printing the bound tree as JSON
    Check {
        /// The query (reads from stdin if not provided)
        query: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,

        /// Only validate syntax, don't bind against the schema
        #[arg(long)]
        syntax_only: bool,
    },

    /// Print a query in canonical form
    Format {
        /// The query (reads from stdin if not provided)
        query: Option<String>,
    },

    /// List operations, or describe one
    Schema {
        /// Operation name
        operation: Option<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let registry = cli::load_registry(cli.schema.as_deref())?;

    match cli.command {
        Commands::Check {
            query,
            pretty,
            syntax_only,
        } => {
            let options = CheckOptions {
                query: read_query(query)?,
                pretty,
                syntax_only,
            };
            match cli::execute_check(&options, &registry)? {
                CheckResult::SyntaxValid => println!("Syntax is valid"),
                CheckResult::Success(json) => println!("{}", json),
            }
        }
        Commands::Format { query } => {
            println!("{}", cli::execute_format(&read_query(query)?, &registry)?);
        }
        Commands::Schema { operation: None } => print!("{}", cli::describe_registry(&registry)),
        Commands::Schema {
            operation: Some(name),
        } => print!("{}", cli::describe_operation(&registry, &name)?),
    }
    Ok(())
}

fn read_query(query: Option<String>) -> Result<String, CliError> {
    match query {
        Some(q) => Ok(q),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
        None => Err(CliError::NoInput),
    }
}
