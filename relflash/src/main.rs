mod cli;
mod config;
mod engine;
mod progress;
mod serial;
mod terminal;

use std::fs;
use std::path::Path;
use std::process;

use anyhow::{Context, Result, bail};
use clap::Parser;
use relflash_lib::{
    Catalog, EngineFactory, FlashEngine, FlashSession, HttpFetcher, NoOpProgress,
    ProgressCallback, materialize_release,
};

use crate::cli::{Cli, Commands};
use crate::config::Settings;
use crate::engine::EsptoolEngine;
use crate::progress::FlashProgress;
use crate::terminal::StdoutTerminal;

fn main() {
    // Log level is controlled by RUST_LOG, e.g.:
    // RUST_LOG=debug, RUST_LOG=relflash_lib=trace
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("off"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let args = Cli::parse();
    if let Err(err) = run(args) {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

fn run(args: Cli) -> Result<()> {
    let settings = config::merge(&args)?;
    let fetcher = HttpFetcher::new(&settings.server);

    match args.command.clone() {
        Commands::List => list(&fetcher),
        Commands::Download(params) => download(&fetcher, &params),
        Commands::Flash(params) => flash(&fetcher, &settings, &params, args.quiet),
    }
}

fn load_catalog(fetcher: &HttpFetcher) -> Result<Catalog> {
    Catalog::load(fetcher).context("failed to load release catalog")
}

fn list(fetcher: &HttpFetcher) -> Result<()> {
    let catalog = load_catalog(fetcher)?;
    if catalog.is_empty() {
        println!("No releases available");
        return Ok(());
    }
    for (index, release) in catalog.releases().iter().enumerate() {
        println!(
            "[{index}] {} ({} partitions)",
            release.name,
            release.partitions.len()
        );
    }
    Ok(())
}

fn download(fetcher: &HttpFetcher, params: &cli::Download) -> Result<()> {
    let catalog = load_catalog(fetcher)?;
    let release = catalog.find(&params.release)?;
    let images = materialize_release(fetcher, release)
        .with_context(|| format!("failed to download release {}", release.name))?;

    fs::create_dir_all(&params.out)?;
    for (partition, image) in release.partitions.iter().zip(&images) {
        let path = Path::new(&params.out).join(format!("{}.bin", partition.name));
        fs::write(&path, &image.data)?;
        println!(
            "{} -> {} ({} bytes at {:#x})",
            partition.name,
            path.display(),
            image.data.len(),
            image.address
        );
    }
    Ok(())
}

fn flash(fetcher: &HttpFetcher, settings: &Settings, params: &cli::Flash, quiet: bool) -> Result<()> {
    let catalog = load_catalog(fetcher)?;
    let release = catalog.find(&params.release)?;
    let images = materialize_release(fetcher, release)
        .with_context(|| format!("failed to download release {}", release.name))?;
    println!("Downloaded {} ({} partitions)", release.name, images.len());

    let mut session = FlashSession::new(Box::new(StdoutTerminal), engine_factory(settings.clone()));
    session.set_images(images);

    session.connect();
    if !session.is_connected() {
        bail!("could not connect to the device");
    }

    let mut progress: Box<dyn ProgressCallback> = if quiet {
        Box::new(NoOpProgress)
    } else {
        Box::new(FlashProgress::new())
    };
    session
        .flash_full(progress.as_mut())
        .context("flashing failed")?;
    println!("Done");
    Ok(())
}

fn engine_factory(settings: Settings) -> EngineFactory {
    Box::new(move || {
        let port = match &settings.port {
            Some(port) => {
                // Only explicitly supplied ports need validating; the
                // picker already offers existing ports only.
                let port = serial::normalize_port_name(port);
                serial::check_port_available(&port)
                    .map_err(|err| relflash_lib::Error::invalid_input(err.to_string()))?;
                port
            }
            None => serial::prompt_for_port()
                .map_err(|err| relflash_lib::Error::invalid_input(err.to_string()))?,
        };
        Ok(Box::new(EsptoolEngine::new(
            settings.esptool.clone(),
            port,
            settings.baud,
            settings.rom_baud,
        )) as Box<dyn FlashEngine>)
    })
}
