use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use env_logger::{Builder, Target};
use log::LevelFilter;

use sourcefetch::{
    bootstrap::SetupOptions,
    config::write_schema,
    ctx::AppContext,
    locate::locate_config_files,
    menu::Prompter,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "sourcefetch")]
struct Cli {
    /// Directory holding Kconfig and merge_config.py, i.e. `source/` inside
    /// the tool's checkout (defaults to the current directory)
    #[arg(long, global = true, value_name = "DIR")]
    workspace: Option<PathBuf>,

    /// Settings file (defaults to <workspace>/.sourcefetch.toml)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short = 'v', long = "verbose", global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short = 'q', long = "quiet", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Choose a board, configure it and fetch the sources (default)
    Run {
        /// Vendor, skipping the vendor menu
        #[arg(long)]
        vendor: Option<String>,
        /// Board, skipping the board menu (needs --vendor)
        #[arg(long, requires = "vendor")]
        board: Option<String>,
        /// Output directory name, skipping the prompt
        #[arg(short, long)]
        output: Option<String>,
        /// Do not open the configuration editor
        #[arg(long)]
        no_gui: bool,
    },
    /// List the known vendors and boards
    Boards,
    /// Print a board's option files in merge order
    Locate {
        vendor: String,
        board: String,
        /// Tree to search (defaults to the configured defaults root)
        #[arg(long, value_name = "DIR")]
        root: Option<PathBuf>,
    },
    /// Write the JSON schema of the settings file
    Schema,
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Info,
        (false, 1) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    };

    Builder::from_default_env()
        .target(Target::Stderr)
        .filter_level(level)
        .format_timestamp(None)
        .format_module_path(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let workspace = match cli.workspace {
        Some(dir) => dir,
        None => std::env::current_dir().context("cannot read the current directory")?,
    };
    let ctx = AppContext::new(&workspace, cli.config)?;

    match cli.command.unwrap_or(Commands::Run {
        vendor: None,
        board: None,
        output: None,
        no_gui: false,
    }) {
        Commands::Run {
            vendor,
            board,
            output,
            no_gui,
        } => {
            let opts = SetupOptions {
                vendor,
                board,
                output,
                skip_gui: no_gui,
            };
            ctx.run_setup(&mut Prompter::stdio(), &opts)?;
        }
        Commands::Boards => {
            let catalog = ctx.settings.catalog()?;
            for (i, entry) in catalog.entries().iter().enumerate() {
                println!("{}) {}", i + 1, entry.vendor.bold());
                for (j, board) in entry.boards.iter().enumerate() {
                    println!("    {}) {board}", j + 1);
                }
            }
        }
        Commands::Locate {
            vendor,
            board,
            root,
        } => {
            let catalog = ctx.settings.catalog()?;
            if !catalog.contains(&vendor, &board) {
                log::warn!("{vendor}/{board} is not in the board catalog");
            }
            let root = root.unwrap_or_else(|| ctx.defaults_root());
            for file in locate_config_files(&vendor, &board, &root)? {
                println!("{}", file.display());
            }
        }
        Commands::Schema => {
            let path = write_schema(&ctx.paths.settings)?;
            println!("Settings schema written to {}", path.display());
        }
    }

    Ok(())
}
