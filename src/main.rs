use anyhow::{Context, anyhow};
use batch_voice::catalog::load_catalog;
use batch_voice::config::Config;
use batch_voice::driver::EnigoDriver;
use batch_voice::executor::{Engine, FocusOutcome, RunEvent, RunResult, StopToken};
use batch_voice::hotkey::{parse_stop_key, spawn_stop_listener};
use chrono::Local;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;

/// Batch-generate audio files by driving a desktop text-to-speech application.
#[derive(Parser, Debug)]
#[command(name = "batch-voice", version)]
struct Cli {
    /// Catalog file name inside the catalog directory (e.g. fruits.json)
    catalog: String,
    /// First catalog index to process
    #[arg(short, long, default_value_t = 0)]
    start: usize,
    /// Stop before this catalog index (default: end of catalog)
    #[arg(short, long)]
    end: Option<usize>,
    /// Configuration file
    #[arg(short, long, default_value = "tools/config.json")]
    config: PathBuf,
    /// Project base directory; catalog and audio paths resolve against it
    #[arg(long, default_value = ".")]
    base_dir: PathBuf,
    /// Do not install the global stop hotkey
    #[arg(long)]
    no_hotkey: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(result) if result.failed_count > 0 => ExitCode::FAILURE,
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<RunResult> {
    let config = Config::load(&cli.config)
        .context("copy config.json.example to config.json and fill it in")?;
    let generation = config.mp3_generation;

    let catalog_path = cli
        .base_dir
        .join(&generation.catalog_dir)
        .join(&cli.catalog);
    let items = load_catalog(&catalog_path)?;
    if items.is_empty() {
        log::warn!("Catalog {} is empty", catalog_path.display());
        return Ok(RunResult::default());
    }

    let stop = StopToken::new();
    if !cli.no_hotkey {
        match parse_stop_key(&generation.stop_hotkey) {
            Some(key) => {
                spawn_stop_listener(key, stop.clone());
                println!("Press {} to stop after the current step", generation.stop_hotkey);
            }
            None => log::warn!(
                "Unsupported stop_hotkey '{}', running without one",
                generation.stop_hotkey
            ),
        }
    }

    let (tx, rx) = crossbeam_channel::unbounded();
    let base_dir = cli.base_dir.clone();
    let (start, end) = (cli.start, cli.end);
    let worker = thread::spawn(move || {
        let driver = EnigoDriver::from_config(&generation);
        let mut engine = Engine::new(driver, generation, base_dir)
            .with_stop_token(stop)
            .with_events(tx);
        engine.run(&items, start, end)
    });

    for event in rx.iter() {
        print_event(&event);
    }

    let result = worker
        .join()
        .map_err(|_| anyhow!("automation thread panicked"))?;
    Ok(result)
}

fn print_event(event: &RunEvent) {
    let now = Local::now().format("%H:%M:%S");
    match event {
        RunEvent::BatchStarted { count, first, last } => {
            println!("[{}] Processing {} items (index {} to {})", now, count, first, last);
        }
        RunEvent::ItemStarted {
            position,
            total,
            id,
            name,
        } => println!("[{}] [{}/{}] ID {} {}", now, position, total, id, name),
        RunEvent::StepStarted(_) => {}
        RunEvent::WindowFocus(FocusOutcome::Focused) => {}
        RunEvent::WindowFocus(FocusOutcome::FailedFallbackToManual) => {
            println!("[{}] Could not focus the target window, switch to it manually", now);
        }
        RunEvent::ItemFinished { id, outcome } => match outcome {
            Ok(status) => println!("[{}]   ID {}: {}", now, id, status),
            Err(e) => println!("[{}]   ID {}: FAILED {}", now, id, e),
        },
        RunEvent::Finished(result) => {
            println!("{}", "=".repeat(60));
            println!("Succeeded: {}", result.success_count);
            println!("Failed:    {}", result.failed_count);
            if !result.errors.is_empty() {
                println!("\nErrors:");
                for error in &result.errors {
                    println!("  - {}", error);
                }
            }
            println!("{}", "=".repeat(60));
        }
    }
}
