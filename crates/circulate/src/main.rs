// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Circulate - library circulation admin server.
//!
//! This is the binary entry point: the admin HTTP server, the ODL 2.x import
//! monitor, admin token provisioning, and plugin maintenance.

mod admin;
mod context;
mod import;
mod plugins;
mod serve;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use circulate_config::CirculateConfig;
use circulate_core::CirculateError;

/// Circulate - library circulation admin server.
#[derive(Parser, Debug)]
#[command(name = "circulate", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the XDG hierarchy.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the admin HTTP server.
    Serve,
    /// Import every ODL 2.x collection once.
    Import {
        /// Only import the collection with this integration id.
        #[arg(long)]
        collection: Option<i64>,
    },
    /// Run the ODL 2.x import monitor on its configured schedule.
    Monitor,
    /// Manage admin accounts.
    Admin {
        #[command(subcommand)]
        action: AdminCommands,
    },
    /// Inspect and run plugins.
    Plugins {
        #[command(subcommand)]
        action: PluginCommands,
    },
}

#[derive(Subcommand, Debug)]
enum AdminCommands {
    /// Create an admin and print its API token.
    Add {
        #[arg(long)]
        email: String,
        /// One of: system, manager-all, librarian-all, manager, librarian.
        #[arg(long)]
        role: String,
        /// Library short name, required for library-scoped roles.
        #[arg(long)]
        library: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum PluginCommands {
    /// List registered plugins and their status.
    List,
    /// Run the scripts of every enabled plugin.
    RunScripts,
}

fn load_config(path: Option<&PathBuf>) -> CirculateConfig {
    let loaded = match path {
        Some(path) => circulate_config::load_and_validate_path(path),
        None => circulate_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => config,
        Err(errors) => {
            circulate_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

async fn run(command: Commands, config: CirculateConfig) -> Result<(), CirculateError> {
    match command {
        Commands::Serve => serve::run_serve(config).await,
        Commands::Import { collection } => {
            let summary = import::run_import(&config, collection).await?;
            println!("{summary}");
            Ok(())
        }
        Commands::Monitor => import::run_monitor(config).await,
        Commands::Admin {
            action:
                AdminCommands::Add {
                    email,
                    role,
                    library,
                },
        } => {
            let token = admin::add_admin(&config, &email, &role, library.as_deref()).await?;
            println!("{token}");
            Ok(())
        }
        Commands::Plugins {
            action: PluginCommands::List,
        } => {
            for line in plugins::list(&config) {
                println!("{line}");
            }
            Ok(())
        }
        Commands::Plugins {
            action: PluginCommands::RunScripts,
        } => plugins::run_scripts(&config).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref());

    let Some(command) = cli.command else {
        println!("circulate: use --help for available commands");
        return;
    };

    context::init_tracing(&config.logging.level);

    if let Err(e) = run(command, config).await {
        eprintln!("circulate: {e}");
        std::process::exit(1);
    }
}
