//! `countrydex` - CLI for browsing countries
//!
//! This binary provides the command-line interface over the countrydex
//! library: listing, interactive browsing, and favourites management.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use countrydex::cli::{session, Cli, Command, ConfigCommand, FavouritesCommand, ListCommand};
use countrydex::country::REGIONS;
use countrydex::favourites::parse_code;
use countrydex::render::{Format, WriterRenderer};
use countrydex::{
    init_logging, Browser, Config, FavouriteStore, RestCountriesSource, SqliteFavouriteStore,
    Status, Storage,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    match cli.command {
        Command::List(list_cmd) => handle_list(&config, &list_cmd).await,
        Command::Browse(browse_cmd) => handle_browse(&config, browse_cmd.format.into()).await,
        Command::Favourites(fav_cmd) => {
            handle_favourites(&config, fav_cmd)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Regions => {
            for region in REGIONS {
                println!("{region}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Config(config_cmd) => {
            handle_config(&config, config_cmd)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn open_favourites(config: &Config) -> anyhow::Result<SqliteFavouriteStore> {
    let path = config.database_path();
    let storage = Storage::open(&path)
        .with_context(|| format!("opening favourites database {}", path.display()))?;
    Ok(SqliteFavouriteStore::new(
        storage,
        config.storage.favourites_key.clone(),
    ))
}

fn exit_code(status: Status) -> ExitCode {
    if status == Status::Failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

async fn handle_list(config: &Config, cmd: &ListCommand) -> anyhow::Result<ExitCode> {
    let store = open_favourites(config)?;
    let source = RestCountriesSource::new(config)?;
    let renderer = WriterRenderer::new(io::stdout(), cmd.format.into(), config.flags.clone());

    let mut browser = Browser::new(store, renderer).with_filter(cmd.filter());
    browser.load(&source).await?;
    Ok(exit_code(browser.state().status))
}

async fn handle_browse(config: &Config, format: Format) -> anyhow::Result<ExitCode> {
    let store = open_favourites(config)?;
    let source = RestCountriesSource::new(config)?;
    let renderer = WriterRenderer::new(io::stdout(), format, config.flags.clone());

    let mut browser = Browser::new(store, renderer);
    browser.load(&source).await?;
    if browser.state().status == Status::Failed {
        return Ok(ExitCode::FAILURE);
    }

    session::run(&mut browser, io::stdin().lock(), &mut io::stdout())?;
    Ok(ExitCode::SUCCESS)
}

fn handle_favourites(config: &Config, cmd: FavouritesCommand) -> anyhow::Result<()> {
    let store = open_favourites(config)?;

    match cmd {
        FavouritesCommand::List { json } => {
            let favourites = store.load();
            if json {
                println!("{}", serde_json::to_string_pretty(&favourites)?);
            } else if favourites.is_empty() {
                println!("No favourites yet.");
            } else {
                for code in favourites.codes() {
                    println!("{code}");
                }
            }
        }
        FavouritesCommand::Toggle { code } => {
            let code = parse_code(&code)?;
            let mut favourites = store.load();
            let liked = favourites.toggle(&code);
            store.save(&favourites);
            info!("{} favourites stored", favourites.len());
            if liked {
                println!("Added {code} to favourites");
            } else {
                println!("Removed {code} from favourites");
            }
        }
        FavouritesCommand::Clear { yes } => {
            if yes {
                if store.clear()? {
                    println!("Favourites cleared.");
                } else {
                    println!("No favourites yet.");
                }
            } else {
                println!("This will remove all favourites.");
                println!("Use --yes to confirm.");
            }
        }
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[API]");
                println!("  Endpoint:           {}", config.api.endpoint);
                println!("  Fields:             {}", config.fields_param());
                match config.request_timeout() {
                    Some(timeout) => println!("  Timeout:            {}s", timeout.as_secs()),
                    None => println!("  Timeout:            none"),
                }
                println!();
                println!("[Flags]");
                println!("  CDN base:           {}", config.flags.cdn_base);
                println!("  Width:              {}", config.flags.width);
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!("  Favourites key:     {}", config.storage.favourites_key);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
