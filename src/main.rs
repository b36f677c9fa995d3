//! voxline command-line entry point
//!
//! Reads a markup document from a file (or stdin with `-`) and either runs
//! the full synthesis pipeline or only shows how the markup was parsed.

use anyhow::{bail, Context};
use log::{error, info};
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;
use voxline::config::Config;
use voxline::lexicon::AcronymRegistry;
use voxline::markup::{MarkupDocument, Segment};
use voxline::speech::backends::ProcessEngine;
use voxline::VoiceSynthesizer;

const USAGE: &str = "\
Usage: voxline [--debug|-d] [--config PATH] <command> <INPUT|->

Commands:
  synth   Synthesize the markup, write the WAV file and print phoneme timings
  parse   Show segments and acronym registrations without synthesizing";

/// Parsed command line
struct Args {
    debug: bool,
    config: Option<PathBuf>,
    command: String,
    input: String,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut debug = false;
    let mut config = None;
    let mut positional = Vec::new();

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--debug" | "-d" => debug = true,
            "--config" | "-c" => {
                let path = args.next().context("--config needs a path")?;
                config = Some(PathBuf::from(path));
            }
            "--help" | "-h" => {
                println!("{}", USAGE);
                process::exit(0);
            }
            _ => positional.push(arg),
        }
    }

    match <[String; 2]>::try_from(positional) {
        Ok([command, input]) => Ok(Args {
            debug,
            config,
            command,
            input,
        }),
        Err(_) => bail!("expected a command and an input\n\n{}", USAGE),
    }
}

fn init_logging(debug_mode: bool) {
    if debug_mode {
        // Debug mode: write to voxline.log file
        use std::fs::OpenOptions;
        match OpenOptions::new()
            .create(true)
            .append(true)
            .open("voxline.log")
        {
            Ok(log_file) => {
                env_logger::Builder::new()
                    .filter_level(log::LevelFilter::Debug)
                    .target(env_logger::Target::Pipe(Box::new(log_file)))
                    .init();
            }
            Err(e) => {
                eprintln!("Warning: Failed to open voxline.log for debug logging: {}", e);
                eprintln!("Continuing without file logging...");
                env_logger::Builder::new()
                    .filter_level(log::LevelFilter::Warn)
                    .init();
            }
        }

        info!(
            "voxline version {} starting (debug mode, logging to voxline.log)",
            voxline::VERSION
        );
    } else {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Error)
            .parse_default_env()
            .init();
    }
}

fn main() {
    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    };

    init_logging(args.debug);

    if let Err(e) = run(&args) {
        error!("Fatal error: {:#}", e);
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let markup = read_input(&args.input)?;

    match args.command.as_str() {
        "parse" => show_parse(&markup),
        "synth" => synth(args, &markup),
        other => bail!("unknown command {:?}\n\n{}", other, USAGE),
    }
}

fn read_input(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read markup from stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("failed to read {}", input))
    }
}

fn load_config(args: &Args) -> anyhow::Result<Config> {
    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    info!("Using config {:?}", config.path());
    Ok(config)
}

/// Dry run: print what the parser made of the markup
fn show_parse(markup: &str) -> anyhow::Result<()> {
    let mut registry = AcronymRegistry::new();
    let document = MarkupDocument::parse_and_register(markup, &mut registry)?;

    for (idx, segment) in document.segments().iter().enumerate() {
        match segment {
            Segment::Text { content } => println!("{:>3}  text   {}", idx, content),
            Segment::Pause { duration_ms } => println!("{:>3}  pause  {}ms", idx, duration_ms),
        }
    }

    println!();
    println!("plain text: {}", document.plain_text());

    for (word, candidates) in registry.iter() {
        if let Some(preferred) = candidates.first() {
            println!("acronym:    {} -> {}", word, preferred.join(" "));
        }
    }

    Ok(())
}

fn synth(args: &Args, markup: &str) -> anyhow::Result<()> {
    let config = load_config(args)?;

    let (command, engine_args) = config
        .engine_command()
        .context("no [engine] command configured")?;
    let model = config.model_source()?;
    let engine = ProcessEngine::new(command, engine_args, model);

    let mut synthesizer = VoiceSynthesizer::from_config(&config, engine)?;
    let output = synthesizer.tts(markup).context("synthesis failed")?;

    if let Some(path) = &output.wav_path {
        info!("Wrote {}", path.display());
    }
    print!("{}", output.phonemes);

    Ok(())
}
