use clap::Parser;
use colored::Colorize;

use crate::cli::args::CliArgs;
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::runner::{Options, ProbeError, Runner};

fn trim_url(url: &str) -> String {
    url.trim().to_string()
}

fn format_kv_line(label: &str, value: &str) {
    eprintln!(":: {:<10}: {}", label, value.bold().cyan());
}

// everything here goes to stderr; stdout carries only result lines
fn print_header(options: &Options) {
    eprintln!(
        "{} {}",
        "dirprobe".bold().white(),
        env!("CARGO_PKG_VERSION").bold().cyan()
    );
    eprintln!(
        "{}",
        "----------------------------------------------------------"
            .bold()
            .white()
    );
    format_kv_line("Target", &options.base_url);
    format_kv_line("Wordlist", &options.wordlist);
    format_kv_line("Threads", &options.threads.to_string());
    format_kv_line("Delay", &format!("{}s", options.delay));
    format_kv_line("Filter", if options.filter_errors { "on" } else { "off" });
    eprintln!(
        "{}",
        "----------------------------------------------------------"
            .bold()
            .white()
    );
}

fn build_options(args: CliArgs, cfg: ConfigFile) -> Result<(Options, bool), String> {
    validation::validate(&args)?;

    let no_color = args.no_color || cfg.no_color.unwrap_or(false);

    let base_url = match args.url.or(cfg.url) {
        Some(url) => trim_url(&url),
        None => return Err("missing target URL (set --url or the config file's url)".to_string()),
    };
    let wordlist = match args.wordlist.or(cfg.wordlist) {
        Some(path) => config::expand_tilde_string(&path),
        None => {
            return Err(
                "missing wordlist (set --wordlist or the config file's wordlist)".to_string(),
            )
        }
    };
    let filter_errors = args.filter || cfg.filter.unwrap_or(false);
    let delay = args.delay.or(cfg.delay).unwrap_or(0.0);
    let threads = args.threads.or(cfg.threads).unwrap_or(10);

    Ok((
        Options {
            base_url,
            wordlist,
            filter_errors,
            delay,
            threads,
        },
        no_color,
    ))
}

pub fn run_cli() -> Result<(), String> {
    let args = CliArgs::parse();

    let user_config_path = args.config.clone().map(|p| config::expand_tilde(&p));
    let cfg = match user_config_path.as_ref() {
        Some(path) => config::load_config(path, false)?,
        None => match config::default_config_path() {
            Some(path) => config::load_config(&path, true)?,
            None => ConfigFile::default(),
        },
    };

    let (options, no_color) = build_options(args, cfg)?;
    if no_color {
        colored::control::set_override(false);
    }
    print_header(&options);

    let threads = options.threads;
    let runner = Runner::new(options).map_err(|e| e.to_string())?;

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(threads)
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    match rt.block_on(runner.run()) {
        Ok(stats) => {
            eprintln!(
                ":: Completed :: {} probed, {} found, took {}s ::",
                stats.dispatched,
                stats.found,
                stats.elapsed.as_secs()
            );
            Ok(())
        }
        Err(ProbeError::Interrupted) => {
            println!("\nProcess terminated by user. Exiting...");
            Ok(())
        }
        Err(e) => Err(e.to_string()),
    }
}
