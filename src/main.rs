use anyhow::{Context, Result};
use bookmark_parse::{Document, ImportOptions};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::io::Read;
use std::path::{Path, PathBuf};

mod config;
mod gather;
mod site;

#[derive(Parser)]
#[command(
    name = "bookmarks",
    version,
    about = "Normalize browser bookmark exports into one canonical JSON tree"
)]
struct Cli {
    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Show debug logging and unchanged files
    #[arg(long, global = true)]
    verbose: bool,

    /// Config file (default: ./bookmarks-cli.json when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy a browser's Bookmarks file out of its profile directory
    Gather {
        /// Browser to read from
        #[arg(value_enum)]
        browser: gather::Browser,

        /// Profile directory name (default from config, usually "Default")
        #[arg(long)]
        profile: Option<String>,

        /// Destination path; `{browser}` and `{profile}` are substituted
        #[arg(long)]
        destination: Option<String>,
    },

    /// Convert an HTML export, Chromium Bookmarks file, or canonical JSON
    Convert {
        /// Input file (`-` reads stdin)
        input: PathBuf,

        /// Where to write canonical JSON (default from config)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Also build the static site into this directory
        #[arg(long)]
        site_dir: Option<PathBuf>,

        /// Static site template directory (default from config)
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Build the static navigation site from a bookmark file
    BuildSite {
        /// Input file
        input: PathBuf,

        /// Output directory
        site_dir: PathBuf,

        /// Static site template directory (default from config)
        #[arg(long)]
        static_dir: Option<PathBuf>,

        /// Rebuild whenever the input file changes
        #[arg(long)]
        watch: bool,
    },

    /// Print folder and bookmark totals
    Stats {
        /// Input file (`-` reads stdin)
        input: PathBuf,
    },

    /// Print the bookmark tree
    Show {
        /// Input file (`-` reads stdin)
        input: PathBuf,
    },

    /// Validate bookmark file(s)
    Validate {
        /// Input files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    let config = config::load_config(cli.config.as_deref(), &cwd)?;
    let options = config.import_options();
    let site_opts = site::SiteOpts {
        quiet: cli.quiet,
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Gather {
            browser,
            profile,
            destination,
        } => {
            let profile = profile.unwrap_or_else(|| config.profile.clone());
            let template = destination.unwrap_or_else(|| config.destination.clone());
            let destination = gather::render_destination(&template, browser, &profile);
            let outcome = gather::gather(
                browser,
                &profile,
                &destination,
                gather::Platform::current(),
                &gather::BaseDirs::from_env(),
                cli.quiet,
            )?;
            let code = outcome.exit_code();
            if code != 0 {
                std::process::exit(code);
            }
        }
        Commands::Convert {
            input,
            output,
            site_dir,
            static_dir,
        } => {
            let document = load_document(&input, &options)?;
            let output = output.unwrap_or_else(|| config.output.clone());
            site::write_canonical(&document, &output)?;
            if !cli.quiet {
                let stats = document.statistics();
                println!(
                    "{} {} {}",
                    "Wrote".green().bold(),
                    output.display(),
                    format!(
                        "({} folders, {} bookmarks)",
                        stats.total_folders, stats.total_bookmarks
                    )
                    .dimmed()
                );
            }
            if let Some(site_dir) = site_dir {
                let static_dir = static_dir.unwrap_or_else(|| config.static_dir.clone());
                let report = site::build_static_site(&document, &site_dir, &static_dir, site_opts)?;
                if !cli.quiet {
                    report.print_summary(&site_dir);
                }
            }
        }
        Commands::BuildSite {
            input,
            site_dir,
            static_dir,
            watch,
        } => {
            let static_dir = static_dir.unwrap_or_else(|| config.static_dir.clone());
            let job = site::SiteJob {
                input: &input,
                site_dir: &site_dir,
                static_source: &static_dir,
                options: &options,
                opts: site_opts,
            };
            let report = job.run()?;
            if !cli.quiet {
                report.print_summary(&site_dir);
            }
            if watch {
                site::watch_and_rebuild(&job)?;
            }
        }
        Commands::Stats { input } => {
            let document = load_document(&input, &options)?;
            let stats = document.statistics();
            println!("{}: {}", "Folders".bold(), stats.total_folders);
            println!("{}: {}", "Bookmarks".bold(), stats.total_bookmarks);
        }
        Commands::Show { input } => {
            let document = load_document(&input, &options)?;
            println!("{}", document.to_terminal());
        }
        Commands::Validate { files } => {
            handle_validate(&files, &options)?;
        }
    }

    Ok(())
}

/// Log to stderr; `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Read a file (or stdin for `-`) and import it as a bookmark document.
pub(crate) fn load_document(input: &Path, options: &ImportOptions) -> Result<Document> {
    let (bytes, source) = if input == Path::new("-") {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("Failed to read stdin")?;
        (buf, "stdin".to_string())
    } else {
        let bytes = std::fs::read(input)
            .with_context(|| format!("Failed to read '{}'", input.display()))?;
        (bytes, input.display().to_string())
    };

    let document = bookmark_parse::import_with(&bytes, &source, options)
        .with_context(|| format!("Failed to import '{source}'"))?;
    let stats = document.statistics();
    tracing::debug!(
        source = %source,
        folders = stats.total_folders,
        bookmarks = stats.total_bookmarks,
        "imported document"
    );
    Ok(document)
}

fn handle_validate(files: &[PathBuf], options: &ImportOptions) -> Result<()> {
    let mut has_errors = false;

    for file in files {
        let label = file.display();
        let document = match load_document(file, options) {
            Ok(document) => document,
            Err(e) => {
                has_errors = true;
                println!("{label}: {}: {:#}", "error".red().bold(), e);
                continue;
            }
        };

        let diagnostics = document.validate();
        if diagnostics.is_empty() {
            println!("{}: {}", label, "OK".green());
            continue;
        }

        for diag in &diagnostics {
            let severity_str = match diag.severity {
                bookmark_parse::Severity::Error => {
                    has_errors = true;
                    format!("{}", "error".red().bold())
                }
                bookmark_parse::Severity::Warning => {
                    format!("{}", "warning".yellow().bold())
                }
                bookmark_parse::Severity::Info => {
                    format!("{}", "info".cyan().bold())
                }
            };

            let code_str = match &diag.code {
                Some(c) => format!("[{}] ", c),
                None => String::new(),
            };

            let node_str = match &diag.node_id {
                Some(id) => format!(" {}", format!("(node {id})").dimmed()),
                None => String::new(),
            };

            println!("{label}: {severity_str}: {code_str}{}{node_str}", diag.message);
        }
    }

    if has_errors {
        std::process::exit(1);
    }

    Ok(())
}
