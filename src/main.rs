mod batch;
mod cli;
mod clipboard;
mod config;
mod logging;
mod output;
mod synth;

use anyhow::{Context as _, Result};
use clap::Parser;
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "emailgen",
    about = "Generate email addresses from names using a format template",
    after_help = output::PLACEHOLDER_HELP
)]
pub struct Args {
    #[arg(
        value_name = "NAMES",
        help = "Comma-separated names; several arguments are joined with commas. Starts an interactive session when empty"
    )]
    pub names: Vec<String>,

    #[arg(
        short,
        long,
        env = "EMAILGEN_FORMAT",
        help = "Email format, e.g. firstname.lastname@company.com"
    )]
    pub format: Option<String>,

    #[arg(long, help = "Read names from stdin (commas or newlines separate names)")]
    pub stdin: bool,

    #[arg(long, value_name = "MODE", help = "Render mode: cascade, tokenized")]
    pub mode: Option<String>,

    #[arg(long, conflicts_with = "emails_only", help = "Print results as JSON")]
    pub json: bool,

    #[arg(long, help = "Print only the emails, one per line")]
    pub emails_only: bool,

    #[arg(long, help = "Copy all emails to the clipboard")]
    pub copy: bool,

    #[arg(
        long,
        env = "EMAILGEN_CLIPBOARD",
        value_name = "COMMAND",
        help = "Clipboard command that reads from stdin (e.g. 'xclip -selection clipboard')"
    )]
    pub clipboard_cmd: Option<String>,

    #[arg(long, help = "Config file path")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Print the effective configuration and exit")]
    pub show_config: bool,

    #[arg(long, help = "Verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Debug output")]
    pub debug: bool,
}

impl Args {
    fn output_style(&self) -> output::OutputStyle {
        if self.json {
            output::OutputStyle::Json
        } else if self.emails_only {
            output::OutputStyle::EmailsOnly
        } else {
            output::OutputStyle::Table
        }
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    logging::init(args.verbose, args.debug);

    // Load configuration, falling back to defaults when the layered files are unreadable
    let mut cfg = if let Some(config_path) = &args.config {
        config::Config::load_from(config_path)?
    } else {
        config::Config::load().unwrap_or_else(|e| {
            tracing::warn!("Ignoring config files: {:#}", e);
            config::Config::default()
        })
    };

    // CLI and environment override the files
    if let Some(format) = &args.format {
        cfg.format = Some(format.clone());
    }
    if let Some(mode_str) = &args.mode {
        if let Some(mode) = synth::RenderMode::from_str(mode_str) {
            cfg.render_mode = Some(mode);
        } else {
            return Err(anyhow::anyhow!(
                "Invalid render mode: {}. Use: cascade, tokenized",
                mode_str
            ));
        }
    }
    if let Some(command) = &args.clipboard_cmd {
        cfg.clipboard.command = Some(command.clone());
    }

    let problems = cfg.validate().err().unwrap_or_default();
    for problem in &problems {
        tracing::warn!("Config {}", problem);
    }

    if args.show_config {
        println!("format: {}", cfg.format());
        println!("render_mode: {}", cfg.render_mode().as_str());
        match clipboard::Clipboard::from_config(&cfg.clipboard) {
            Ok(clip) => println!("clipboard: {}", clip.describe()),
            Err(e) => println!("clipboard: <invalid> ({:#})", e),
        }
        for problem in &problems {
            println!("warning: {}", problem);
        }
        return Ok(());
    }

    tracing::debug!(
        format = cfg.format(),
        mode = cfg.render_mode().as_str(),
        "effective settings"
    );

    let root = std::env::current_dir()?;
    let ctx = cli::Context::new(root, &cfg);

    if args.stdin {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .context("Failed to read names from stdin")?;
        let mut names = input.replace('\n', ",");
        if !args.names.is_empty() {
            names = format!("{},{}", args.names.join(","), names);
        }
        cli::run_once(&ctx, &names, args.output_style(), args.copy)
    } else if !args.names.is_empty() {
        cli::run_once(&ctx, &args.names.join(","), args.output_style(), args.copy)
    } else {
        cli::run_repl(ctx)
    }
}
