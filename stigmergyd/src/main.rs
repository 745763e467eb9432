//! Stigmergy evaluation driver
//!
//! Scores a population of reference brains in the stigmergy maze for a number
//! of generations and writes one JSON summary per generation.
//!
//! Storage locations (unless `--out` is given):
//! - Linux: ~/.local/share/stigmergy/
//! - Windows: %APPDATA%\stigmergy\
//! - MacOS: ~/Library/Application Support/stigmergy/
//!
//! The config is read from `--config <path>`, else `<data dir>/config.json`
//! if present, else built-in defaults.

use std::fs;
use std::path::PathBuf;

use tracing::{error, info, warn};

mod config;
mod error;
mod paths;
mod run;

use config::DriverConfig;
use error::DriverError;
use paths::AppPaths;

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    out: Option<PathBuf>,
    generations: Option<u32>,
    help: bool,
}

fn parse_args(args: &[String]) -> Result<Args, DriverError> {
    let mut out = Args::default();
    let mut it = args.iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-h" | "--help" | "help" => out.help = true,
            "--config" => out.config = Some(next_value(&mut it, "--config")?.into()),
            "--out" => out.out = Some(next_value(&mut it, "--out")?.into()),
            "--generations" => {
                let v = next_value(&mut it, "--generations")?;
                out.generations = Some(
                    v.parse()
                        .map_err(|_| DriverError::Usage(format!("bad --generations value: {v}")))?,
                );
            }
            other => return Err(DriverError::Usage(format!("unknown argument: {other}"))),
        }
    }
    Ok(out)
}

fn next_value<'a>(
    it: &mut impl Iterator<Item = &'a String>,
    flag: &str,
) -> Result<&'a String, DriverError> {
    it.next()
        .ok_or_else(|| DriverError::Usage(format!("{flag} needs a value")))
}

fn print_help() {
    println!("stigmergyd (population evaluation driver)");
    println!("usage:");
    println!("  stigmergyd [--config <file.json>] [--out <dir>] [--generations <n>]");
}

fn load_config(args: &Args, paths: &AppPaths) -> Result<DriverConfig, DriverError> {
    let mut cfg = match &args.config {
        Some(path) => DriverConfig::load(path)?,
        None => {
            let default_path = paths.config_file();
            if default_path.is_file() {
                DriverConfig::load(&default_path)?
            } else {
                info!("No config file; using defaults");
                DriverConfig::default()
            }
        }
    };
    if let Some(g) = args.generations {
        cfg.generations = g;
        cfg.validate()?;
    }
    Ok(cfg)
}

fn drive(args: Args) -> Result<(), DriverError> {
    let paths = match &args.out {
        Some(dir) => AppPaths::at(dir)?,
        None => AppPaths::new()?,
    };
    info!("Data directory: {:?}", paths.data_dir());

    let cfg = load_config(&args, &paths)?;
    info!(
        "World {}x{} wall_percent={} life_time={} evaluations={} bits={}",
        cfg.world.x_dim,
        cfg.world.y_dim,
        cfg.world.wall_percent,
        cfg.world.life_time,
        cfg.world.evaluations_per_generation,
        cfg.world.stigmergy_bits
    );
    if cfg.world.seed.is_none() {
        warn!("No world seed configured; using seed 1");
    }

    let mut organisms = run::build_population(&cfg, cfg.world.seed.unwrap_or(1));
    for generation in 0..cfg.generations {
        let report = run::run_generation(&cfg, generation, &mut organisms)?;
        let path = paths.generation_file(generation);
        fs::write(&path, serde_json::to_string_pretty(&report)?)?;
    }
    info!("✓ {} generations written", cfg.generations);
    Ok(())
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let argv: Vec<String> = std::env::args().skip(1).collect();
    let args = match parse_args(&argv) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("{e}");
            print_help();
            std::process::exit(2);
        }
    };
    if args.help {
        print_help();
        return;
    }

    if let Err(e) = drive(args) {
        error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(s: &[&str]) -> Vec<String> {
        s.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn parses_flags() {
        let a = parse_args(&argv(&["--config", "c.json", "--generations", "3"])).unwrap();
        assert_eq!(a.config, Some(PathBuf::from("c.json")));
        assert_eq!(a.generations, Some(3));
        assert!(a.out.is_none());
        assert!(!a.help);
    }

    #[test]
    fn rejects_unknown_and_incomplete_flags() {
        assert!(parse_args(&argv(&["--bogus"])).is_err());
        assert!(parse_args(&argv(&["--out"])).is_err());
        assert!(parse_args(&argv(&["--generations", "x"])).is_err());
    }

    #[test]
    fn run_writes_one_file_per_generation() {
        let dir = std::env::temp_dir().join(format!("stigmergyd-run-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("config.json"),
            r#"{ "generations": 2, "population": 3, "world": { "life_time": 20, "seed": 4 } }"#,
        )
        .unwrap();

        let args = Args {
            out: Some(dir.clone()),
            ..Args::default()
        };
        drive(args).unwrap();
        for g in 0..2 {
            let text = fs::read_to_string(dir.join(format!("generation_{g:04}.json"))).unwrap();
            let v: serde_json::Value = serde_json::from_str(&text).unwrap();
            assert_eq!(v["generation"], g);
            assert_eq!(v["organisms"].as_array().unwrap().len(), 3);
        }
        let _ = fs::remove_dir_all(&dir);
    }
}
