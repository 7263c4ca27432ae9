//! CLI entry point for the `sidelist` command-line tool.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use sidelist::cli::commands;
use sidelist::SidelistError;

#[derive(Parser)]
#[command(
    name = "sidelist",
    about = "Ordered favorites list stored in a keyed object-archive container"
)]
struct Cli {
    /// Container file (default: $SIDELIST_FILE, then the user data directory)
    #[arg(long)]
    file: Option<PathBuf>,

    /// Output format: "text" (default) or "json"
    #[arg(long, default_value = "text")]
    format: String,

    /// Enable debug logging
    #[arg(long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the favorites in stored order
    List,
    /// Add favorites for one or more paths
    Add {
        /// Paths to add, each attempted independently
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Remove the favorite matching a path
    Remove {
        /// Path to remove; no match is a no-op
        path: String,
    },
    /// Remove every favorite
    Clear,
}

fn main() {
    let cli = Cli::parse();
    let json = cli.format == "json";

    if cli.verbose {
        // env_logger is only available in dev/test builds
        eprintln!("Verbose mode enabled");
    }

    let file = match cli.file {
        Some(file) => file,
        None => match commands::default_store_path() {
            Ok(file) => file,
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(3);
            }
        },
    };

    let result = match cli.command {
        Commands::List => commands::cmd_list(&file, json),
        Commands::Add { paths } => commands::cmd_add(&file, &paths, json),
        Commands::Remove { path } => commands::cmd_remove(&file, &path, json),
        Commands::Clear => commands::cmd_clear(&file, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        let code = match &e {
            SidelistError::Io(_) => 1,
            SidelistError::InvalidMagic
            | SidelistError::UnsupportedVersion(_)
            | SidelistError::Truncated
            | SidelistError::Corrupt(_)
            | SidelistError::UnknownClassTag(_)
            | SidelistError::BadReference { .. }
            | SidelistError::CyclicReference(_)
            | SidelistError::InvalidKey(_)
            | SidelistError::DuplicateKey(_)
            | SidelistError::MissingField(_)
            | SidelistError::FieldType { .. } => 2,
            SidelistError::PathUnresolvable { .. }
            | SidelistError::DuplicateFavorite(_)
            | SidelistError::AllAddsFailed(_) => 3,
            SidelistError::Bookmark(_) => 4,
        };
        process::exit(code);
    }
}
