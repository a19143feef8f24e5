use std::{env, io::Write, sync::Arc};

use anyhow::{Context, Result, bail};
use log::{info, warn};
use parking_lot::Mutex;
use rand::{SeedableRng, rngs::StdRng};
use tokio::signal;

use perceptron::{Driver, Mode, Session, settings::Settings};

const USAGE: &str = "Usage: perceptron-demo [separable|xor|custom] [--config <path>]";

/// Parses `[MODE] [--config PATH]`.
fn parse_args(args: &[String]) -> Result<(Option<Mode>, Option<String>)> {
    let mut mode = None;
    let mut config = None;
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter.next().context("--config expects a path")?;
                config = Some(path.clone());
            }
            "-h" | "--help" => bail!(USAGE),
            other if mode.is_none() => mode = Some(other.parse::<Mode>()?),
            other => bail!("unexpected argument '{other}'\n{USAGE}"),
        }
    }

    Ok((mode, config))
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let (mode, config) = parse_args(&args)?;

    let mut settings = match config {
        Some(path) => Settings::from_file(&path).with_context(|| format!("loading {path}"))?,
        None => Settings::default(),
    }
    .merge_env()?;

    if let Some(mode) = mode {
        settings.mode = mode;
    }

    info!("settings: {settings:?}");

    let cfg = settings.trainer_config()?;
    let mut rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let session = Session::new(settings.mode, cfg);
    let mut driver = Driver::new(Arc::new(Mutex::new(session)));
    let mut snapshots = driver.subscribe();

    driver.update(|s| s.init_weights(&mut rng, settings.sigma))?;

    driver.run(settings.epoch_limit, settings.interval())?;

    let cancel = driver.cancellation();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            info!("received ctrl-c, stopping");
            cancel.cancel();
        }
    });

    let printer = tokio::spawn(async move {
        let mut stdout = std::io::stdout();

        while snapshots.changed().await.is_ok() {
            let snapshot = snapshots.borrow_and_update().clone();
            let line = serde_json::to_string(&snapshot)?;
            writeln!(stdout, "{line}")?;
        }

        anyhow::Ok(())
    });

    let Some(outcome) = driver.join().await else {
        bail!("the training run ended abnormally");
    };

    // Dropping the driver closes the snapshot channel and ends the printer.
    drop(driver);
    printer.await??;

    if outcome.converged() {
        info!("converged after {} epochs", outcome.epoch);
    } else {
        warn!(
            "did not converge: reason={:?} epoch={}",
            outcome.reason, outcome.epoch
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_mode_and_config() {
        let (mode, config) = parse_args(&args(&["xor", "--config", "demo.json"])).unwrap();
        assert_eq!(mode, Some(Mode::Xor));
        assert_eq!(config.as_deref(), Some("demo.json"));
    }

    #[test]
    fn no_args_is_fine() {
        let (mode, config) = parse_args(&[]).unwrap();
        assert!(mode.is_none());
        assert!(config.is_none());
    }

    #[test]
    fn rejects_bad_arguments() {
        assert!(parse_args(&args(&["spiral"])).is_err());
        assert!(parse_args(&args(&["xor", "separable"])).is_err());
        assert!(parse_args(&args(&["--config"])).is_err());
    }
}
