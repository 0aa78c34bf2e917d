//! `storefront` command: run one storefront action and print its result.
//!
//! The action result is written to stdout as JSON; logs go to stderr.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io::{self, Write};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use serde::Serialize;
use storefront::domain::{ActionResult, MenuCategory};
use storefront::{ClientConfig, StorefrontSettings, connect};
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

/// `storefront` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "storefront",
    about = "Query the restaurant storefront backend",
    version
)]
struct CliArgs {
    #[command(subcommand)]
    action: Action,
}

#[derive(Debug, Subcommand)]
enum Action {
    /// List menu items, optionally limited to one category.
    Menu {
        /// Category slug such as `mains` or `hot-drinks`.
        #[arg(long)]
        category: Option<String>,
    },
    /// List the favourites carousel.
    Favorites,
    /// List customer testimonials.
    Testimonials,
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .with_writer(io::stderr)
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = CliArgs::parse();
    let settings = StorefrontSettings::load_from_iter([OsString::from("storefront")])
        .map_err(|error| eyre!("failed to load storefront settings: {error}"))?;
    let config = ClientConfig::try_from(settings).wrap_err("invalid storefront settings")?;

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(run(args.action, &config))
}

async fn run(action: Action, config: &ClientConfig) -> Result<ExitCode> {
    let actions = connect(config).wrap_err("build storefront client")?;
    match action {
        Action::Menu {
            category: Some(raw),
        } => {
            let category = MenuCategory::new(&raw)
                .map_err(|error| eyre!("invalid category '{raw}': {error}"))?;
            emit(&actions.get_menu_by_category(&category).await)
        }
        Action::Menu { category: None } => emit(&actions.get_menu().await),
        Action::Favorites => emit(&actions.get_favorites().await),
        Action::Testimonials => emit(&actions.get_testimonials().await),
    }
}

fn emit<T: Serialize>(result: &ActionResult<T>) -> Result<ExitCode> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, result).wrap_err("write result")?;
    stdout.write_all(b"\n").wrap_err("write result")?;
    Ok(if result.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
