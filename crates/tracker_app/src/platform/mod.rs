mod config;
mod serve;
mod surface;

use std::fs;
use std::sync::Arc;

use anyhow::{bail, Context};
use log::LevelFilter;
use tracker_core::{hostname_of, sheet_id_from_url, ControlState, Request, HELP_TEXT};
use tracker_engine::{
    load_page, CommandTokenProvider, EngineHandle, FetchSettings, PageAgent, PageSnapshot,
    ReqwestFetcher, ReqwestSheetsClient, RonSettingsStore, SettingsPanel, SettingsStore,
    SiteRegistry, StaticTokenProvider, SyncService, TokenProvider,
};
use tracker_logging::{tracker_info, LogDestination};

use crate::cli::{Cli, Command, SettingsAction};
use config::{load_config, AppConfig, TOKEN_ENV_VAR};
use surface::TerminalSurface;

pub fn run_app(cli: Cli) -> anyhow::Result<()> {
    let (config, source) = load_config(&cli.config)?;
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    // stdout carries protocol traffic in serve mode.
    let destination = match cli.command {
        Command::Serve => LogDestination::File,
        _ => LogDestination::Both,
    };
    tracker_logging::initialize(destination, level, config.log_file.as_deref());
    source.log();

    let store: Arc<dyn SettingsStore> = Arc::new(RonSettingsStore::new(&config.settings_path));

    match cli.command {
        Command::Track { url, html, no_wait } => {
            let registry = SiteRegistry::with_defaults()?;
            if !is_supported_url(&registry, &url)? {
                println!("Not a supported job site; nothing to track.");
                return Ok(());
            }
            let page = match html {
                Some(path) => {
                    let markup = fs::read_to_string(&path)
                        .with_context(|| format!("failed to read {:?}", path))?;
                    PageSnapshot::new(url, markup)?
                }
                None => fetch_page(&url)?,
            };
            track(&config, store, &registry, page, no_wait)
        }
        Command::Settings { action } => settings(&config, store, action),
        Command::Test { sheet_id } => {
            let engine = EngineHandle::new(build_service(&config, store)?)?;
            let response = engine.request_blocking(Request::TestConnection { sheet_id });
            if response.success {
                println!(
                    "✅ Connected to '{}'",
                    response.title.as_deref().unwrap_or_default()
                );
                Ok(())
            } else {
                bail!(
                    "connection failed: {}",
                    response.error.unwrap_or_else(|| "Unknown error".to_string())
                )
            }
        }
        Command::Serve => serve::serve_stdio(&build_service(&config, store)?),
    }
}

fn token_provider(config: &AppConfig) -> Arc<dyn TokenProvider> {
    if let Some(token) = config.access_token.as_deref() {
        return Arc::new(StaticTokenProvider::new(token));
    }
    if let Some(provider) = StaticTokenProvider::from_env(TOKEN_ENV_VAR) {
        return Arc::new(provider);
    }
    match CommandTokenProvider::from_command_line(&config.token_command) {
        Some(provider) => Arc::new(provider),
        // A blank static token fails at use with "No token received".
        None => Arc::new(StaticTokenProvider::new("")),
    }
}

fn build_service(config: &AppConfig, store: Arc<dyn SettingsStore>) -> anyhow::Result<SyncService> {
    let sheets = ReqwestSheetsClient::new(config.sheets_settings())?;
    Ok(SyncService::new(Arc::new(sheets), token_provider(config), store).with_placement(config.placement))
}

fn fetch_page(url: &str) -> anyhow::Result<PageSnapshot> {
    let runtime = tokio::runtime::Runtime::new()?;
    let fetcher = ReqwestFetcher::new(FetchSettings::default());
    let page = runtime.block_on(load_page(&fetcher, url))?;
    Ok(page)
}

/// Allow-list check on the requested URL, so unsupported pages are never fetched.
fn is_supported_url(registry: &SiteRegistry, url: &str) -> anyhow::Result<bool> {
    match hostname_of(url) {
        Some(host) => Ok(registry.is_supported(&host)),
        None => bail!("page url has no host: {url}"),
    }
}

fn track(
    config: &AppConfig,
    store: Arc<dyn SettingsStore>,
    registry: &SiteRegistry,
    page: PageSnapshot,
    no_wait: bool,
) -> anyhow::Result<()> {
    let mut surface = TerminalSurface;
    // A redirect can still land off the allow-list.
    let mut agent = PageAgent::load(registry, page, config.timings(), &mut surface);
    if !agent.state().is_injected() {
        println!("Not a supported job site; nothing to track.");
        return Ok(());
    }

    let engine = EngineHandle::new(build_service(config, store)?)?;
    agent.click(&engine, &mut surface);
    let outcome = agent.state().control();

    if !no_wait {
        agent.wait_for_reset(&mut surface);
    }
    tracker_info!("Track finished with {:?}", outcome);
    if outcome == ControlState::Error {
        bail!("job was not saved");
    }
    Ok(())
}

fn settings(
    config: &AppConfig,
    store: Arc<dyn SettingsStore>,
    action: SettingsAction,
) -> anyhow::Result<()> {
    let mut panel = SettingsPanel::open(store.clone());
    let status = match action {
        SettingsAction::Show => {
            match panel.current() {
                Some(id) => println!("Current Sheet ID: {id}"),
                None => println!("No Sheet ID stored; the built-in fallback sheet is used."),
            }
            return Ok(());
        }
        SettingsAction::Help => {
            println!("{HELP_TEXT}");
            return Ok(());
        }
        SettingsAction::Set { sheet_id } => panel.save(&sheet_id),
        SettingsAction::FromUrl { url } => match sheet_id_from_url(&url) {
            Some(sheet_id) => panel.save(&sheet_id),
            None => bail!("no spreadsheet id found in {url}"),
        },
        SettingsAction::Test { sheet_id } => {
            let input = sheet_id
                .or_else(|| panel.current().map(ToOwned::to_owned))
                .unwrap_or_default();
            let engine = EngineHandle::new(build_service(config, store)?)?;
            panel.test(&input, &engine)
        }
    };

    if status.is_success() {
        println!("{}", status.text());
        Ok(())
    } else {
        bail!("{}", status.text())
    }
}
