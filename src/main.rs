//! # DevList
//!
//! Terminal task tracker with priority dispatch and undo.
//!
//! ## Usage
//!
//! ### Interactive Mode (TUI)
//!
//! ```bash
//! devlist
//! # or explicitly
//! devlist ui
//! ```
//!
//! #### TUI Key Bindings
//!
//! *   `a`: Add a custom task (name, description, priority)
//! *   `c`: Add all tasks of a preloaded category
//! *   `Space`: Mark selected task as done
//! *   `d`: Delete selected task
//! *   `n`: Process the next task by priority
//! *   `u`: Undo the last delete / done / process
//! *   `s` / `p`: Sort by date added / priority
//! *   `f`: Toggle the completed tasks view
//! *   `q`: Quit
//!
//! ### Batch Mode
//!
//! Feed JSON-lines commands on stdin or from a file:
//!
//! ```bash
//! printf '%s\n' \
//!   '{"op":"add","name":"A","priority":"high"}' \
//!   '{"op":"add","name":"B","priority":"low"}' \
//!   '{"op":"next"}' '{"op":"undo"}' '{"op":"list"}' | devlist batch
//! ```
//!
//! ## Categories
//!
//! Preloaded categories come from `templates.json` in the config directory
//! (`~/.config/devlist/` on Linux), or `DEVLIST_TEMPLATES` if set. Without a
//! file the built-in Designing / Frontend / Backend categories are used.
//! `devlist templates init` writes them out for editing.
//!
//! Logging is off by default; set `RUST_LOG=devlist=debug` to trace engine steps.

use std::io;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use devlist::commands::{cmd_batch, cmd_templates_init, cmd_templates_list};
use devlist::error::exit_codes;
use devlist::templates::load_templates;
use devlist::tui::run_tui;

#[derive(Parser)]
#[command(name = "devlist")]
#[command(about = "Task tracker with priority dispatch and undo", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open interactive TUI
    Ui,
    /// Run JSON-lines commands against a fresh task list
    Batch {
        /// Script file; reads stdin when omitted
        file: Option<PathBuf>,
        /// Only print views and errors
        #[arg(short, long)]
        quiet: bool,
    },
    /// Manage preloaded task categories
    Templates {
        #[command(subcommand)]
        command: TemplateCommands,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum TemplateCommands {
    /// List categories and their tasks
    List,
    /// Write the built-in categories to the config file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

fn init_tracing() {
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|raw| EnvFilter::try_new(raw.trim()).ok())
        .unwrap_or_else(|| EnvFilter::new("off"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let result = match cli.command {
        Some(Commands::Batch { file, quiet }) => match cmd_batch(file, quiet) {
            Ok(summary) if summary.failed > 0 => std::process::exit(exit_codes::USER_ERROR),
            Ok(_) => Ok(()),
            Err(e) => Err(e),
        },
        Some(Commands::Templates { command }) => match command {
            TemplateCommands::List => {
                cmd_templates_list();
                Ok(())
            }
            TemplateCommands::Init { force } => cmd_templates_init(force).map(|_| ()),
        },
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "devlist", &mut io::stdout());
            Ok(())
        }
        Some(Commands::Ui) | None => {
            if let Err(e) = run_tui(load_templates()) {
                eprintln!("Error running TUI: {}", e);
                std::process::exit(exit_codes::OPERATION_FAILED);
            }
            Ok(())
        }
    };
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}
