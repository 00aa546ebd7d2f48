use std::io;
use std::path::PathBuf;
use std::process;

use clap::{CommandFactory, Parser};
use clap_complete::Shell;

use locus::context::{CliHost, RealFs};
use locus::tags::TagIndex;
use locus::types::SearchConfig;

/// locus — resolve one line of arbitrary text (compiler error, traceback,
/// test failure, grep or status output) to a location in the source tree,
/// and print the editor command that navigates there.
#[derive(Parser)]
#[command(
    name = "locus",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("LOCUS_BUILD_COMMIT"), ")"),
    about
)]
struct Cli {
    /// The line of text to resolve.
    line: Option<String>,

    /// Directory to resolve relative paths against.
    #[arg(long, default_value = ".")]
    scope: PathBuf,

    /// Path prefix to try when searching (repeatable or comma-separated).
    #[arg(long, value_delimiter = ',')]
    prefix: Vec<String>,

    /// Path suffix to try when searching (repeatable or comma-separated).
    #[arg(long, value_delimiter = ',')]
    suffix: Vec<String>,

    /// ctags file backing tag lookups.
    #[arg(long, value_name = "FILE")]
    tags: Option<PathBuf>,

    /// File currently open in the editor; enables same-file line jumps.
    #[arg(long, value_name = "PATH")]
    buffer: Option<PathBuf>,

    /// Machine-readable JSON output.
    #[arg(long)]
    json: bool,

    /// Log resolution steps (-v), or every path checked (-vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print shell completions for the given shell.
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

fn main() {
    let cli = Cli::parse();

    // Shell completions
    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "locus", &mut io::stdout());
        return;
    }

    init_logging(cli.verbose);

    let Some(line) = cli.line else {
        eprintln!("usage: locus <line> [--scope DIR] [--prefix P] [--suffix S] [--tags FILE]");
        process::exit(3);
    };

    let config = SearchConfig::new(cli.prefix, cli.suffix);
    let fs = RealFs::new(cli.scope);
    let tags = match cli.tags {
        Some(ref path) => match TagIndex::load(path) {
            Ok(index) => index,
            Err(e) => {
                eprintln!("cannot read tags file {}: {e}", path.display());
                process::exit(3);
            }
        },
        None => TagIndex::empty(),
    };
    let host = CliHost::new(cli.buffer, tags);

    match locus::resolve(&line, &config, &fs, &host) {
        Ok(action) => {
            if cli.json {
                let payload = serde_json::json!({
                    "input": line,
                    "action": action,
                });
                println!(
                    "{}",
                    serde_json::to_string_pretty(&payload)
                        .expect("actions always serialize")
                );
            } else {
                println!("{action}");
            }
        }
        Err(e) => {
            eprintln!("{e}");
            process::exit(e.exit_code());
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .format_target(false)
        .init();
}
