use std::path::PathBuf;
use std::process::ExitCode;

use clap::{arg, Parser};

use crate::commands::{migrate_cmd, render_header_cmd, resolve_cmd, split_cmd};

mod commands;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
enum Args {
    /// Prints the header and body a post record resolves to, as JSON
    Resolve(ResolveArgs),
    /// Splits a legacy header block off a raw HTML file
    Split(SplitArgs),
    /// Moves the legacy header of a post record into its template data
    Migrate(MigrateArgs),
    /// Prints the header markup for a template data JSON file
    RenderHeader(RenderHeaderArgs),
}

#[derive(Parser, Debug)]
struct ResolveArgs {
    /// Post record JSON file
    post: PathBuf,
}

#[derive(Parser, Debug)]
struct SplitArgs {
    /// HTML file holding the post content
    html: PathBuf,

    /// Creation timestamp used when the header has no date
    #[arg(short, long)]
    created_at: String,
}

#[derive(Parser, Debug)]
struct MigrateArgs {
    /// Post record JSON file
    post: PathBuf,

    /// Rewrites the file instead of printing the migrated record
    #[arg(short, long)]
    in_place: bool,
}

#[derive(Parser, Debug)]
struct RenderHeaderArgs {
    /// Template data JSON file
    template: PathBuf,

    /// Creation timestamp used when the template has no date
    #[arg(short, long)]
    created_at: String,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let res = match args {
        Args::Resolve(args) => resolve_cmd(args),
        Args::Split(args) => split_cmd(args),
        Args::Migrate(args) => migrate_cmd(args),
        Args::RenderHeader(args) => render_header_cmd(args),
    };

    match res {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
