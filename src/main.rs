mod audio;
mod chart;
mod cli;
mod config;
mod remote;
mod session;

use anyhow::{Context, Result};
use clap::Parser;

use audio::extremes::{analyze, analyze_clip, Analysis};
use chart::context::ChartContext;
use chart::dataset::{ConflictCheck, Placement};
use cli::{Cli, Command};
use config::Config;
use remote::client::{PointStore, ServiceClient};
use session::Session;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    let mut cfg = Config::default();
    if let Some(path) = config::find_config_path(cli.config.as_deref()) {
        if let Some(loaded) = config::load_config(&path) {
            log::info!("Loaded config from {}", path.display());
            cfg = loaded;
        } else {
            log::warn!("Failed to load config from {}", path.display());
        }
    }
    // Command-line values win over the config file
    if let Some(server) = cli.server.clone() {
        cfg.server.base_url = server;
    }
    if cli.patient.is_some() {
        cfg.server.patient = cli.patient.clone();
    }

    let client = ServiceClient::new(&cfg.server.base_url, &cfg.server.sounds_path)?;
    log::debug!("Patient service: {}", cfg.server.base_url);

    match cli.command {
        Command::Sounds => {
            let names = client.list_audios()?;
            println!("Available sounds:");
            for name in &names {
                println!("  {}", name);
            }
        }

        Command::Analyze { file, sound, ear } => {
            let (analysis, name) = match (file, sound) {
                (Some(path), _) => {
                    log::info!("Analyzing {}...", path.display());
                    let audio = audio::decode::decode_file(&path)?;
                    (analyze(&audio, &cfg.analyzer), path.display().to_string())
                }
                (None, Some(name)) => {
                    let bytes = client.fetch_audio(&name)?;
                    log::info!("Analyzing {}...", name);
                    (analyze_clip(bytes, &name, &cfg.analyzer)?, name)
                }
                (None, None) => anyhow::bail!("An audio file or --sound is required"),
            };

            match ear {
                Some(ear) => {
                    let mut session = open_session(&cfg, &client)?;
                    session.load(ear)?;
                    if session.annotate(ear, analysis).is_none() {
                        println!("No audible band found in {}", name);
                    }
                    print!("{}", session.render(ear));
                }
                None => match analysis {
                    Analysis::Band(band) => println!(
                        "{}: {:.0}-{:.0} Hz, {:.1}-{:.1} dB",
                        name, band.x_min, band.x_max, band.y_min, band.y_max
                    ),
                    Analysis::Inconclusive { frames_polled } => println!(
                        "{}: no audible band found ({} frames checked)",
                        name, frames_polled
                    ),
                },
            }
        }

        Command::Show { ear } => {
            let mut session = open_session(&cfg, &client)?;
            session.load(ear)?;
            print!("{}", session.render(ear));
        }

        Command::Add {
            ear,
            style,
            at,
            frequency,
            decibels,
            allow_mixed_styles,
        } => {
            let check = if allow_mixed_styles {
                ConflictCheck::Skip
            } else {
                ConflictCheck::Enforce
            };

            let mut session = open_session(&cfg, &client)?;
            session.load(ear)?;

            let placement = match (at, frequency, decibels) {
                (Some(at), _, _) => session.add_at_pixel(ear, at[0], at[1], style, check)?,
                (None, Some(frequency), Some(decibels)) => {
                    session.add_entry(ear, &frequency, &decibels, style, check)?
                }
                _ => anyhow::bail!("Give either --at X Y or --frequency and --decibels"),
            };
            if let Placement::Ignored(_) = placement {
                println!("Point already present, nothing added");
            }
            print!("{}", session.render(ear));
        }

        Command::Remove { ear, id } => {
            let mut session = open_session(&cfg, &client)?;
            session.load(ear)?;
            if session.remove(ear, &id).is_none() {
                println!("No point {} on the {} audiogram", id, ear);
            }
            print!("{}", session.render(ear));
        }

        Command::Clear { ear } => {
            let mut session = open_session(&cfg, &client)?;
            session.delete_all(ear);
            print!("{}", session.render(ear));
        }
    }

    Ok(())
}

fn open_session<'a, S: PointStore>(cfg: &Config, store: &'a S) -> Result<Session<'a, S>> {
    let patient = cfg
        .server
        .patient
        .clone()
        .context("A patient id is required (--patient or [server] patient in the config)")?;
    let context = ChartContext::new(cfg.chart.geometry());
    Ok(Session::new(context, patient, store))
}
