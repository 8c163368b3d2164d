use crate::{
    batch::{self, EmailResult},
    clipboard::Clipboard,
    config::{ClipboardConfig, Config},
    output::{self, OutputStyle},
    synth::{FormatSpec, RenderMode},
};
use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::cell::{Cell, RefCell};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// How long the "copied" marker stays on after a bulk copy
const COPIED_FLAG_TTL: Duration = Duration::from_secs(2);

/// Session state. Lives only as long as the process.
pub struct Context {
    pub root: PathBuf,
    pub format: RefCell<String>,
    pub mode: Cell<RenderMode>,
    pub clipboard: ClipboardConfig,
    pub results: RefCell<Vec<EmailResult>>,
    copied_at: Cell<Option<Instant>>,
}

impl Context {
    pub fn new(root: PathBuf, config: &Config) -> Self {
        Self {
            root,
            format: RefCell::new(config.format().to_string()),
            mode: Cell::new(config.render_mode()),
            clipboard: config.clipboard.clone(),
            results: RefCell::new(Vec::new()),
            copied_at: Cell::new(None),
        }
    }

    /// Generate results for a name list and keep them as the current results
    pub fn generate(&self, names: &str) -> Vec<EmailResult> {
        let results = batch::generate(names, &self.format.borrow(), self.mode.get());
        *self.results.borrow_mut() = results.clone();
        self.copied_at.set(None);
        results
    }

    pub fn is_copied(&self) -> bool {
        self.copied_at
            .get()
            .is_some_and(|at| at.elapsed() < COPIED_FLAG_TTL)
    }

    /// Copy every current email, newline-joined. Returns how many were copied.
    pub fn copy_all(&self) -> Result<usize> {
        let results = self.results.borrow();
        Clipboard::from_config(&self.clipboard)?.copy(&batch::emails_text(&results))?;
        self.copied_at.set(Some(Instant::now()));
        Ok(results.len())
    }

    /// Copy a single email string
    pub fn copy_one(&self, email: &str) -> Result<()> {
        Clipboard::from_config(&self.clipboard)?.copy(email)
    }
}

pub fn run_once(ctx: &Context, names: &str, style: OutputStyle, copy: bool) -> Result<()> {
    let results = ctx.generate(names);

    let rendered = output::render(&results, style)?;
    if !rendered.is_empty() {
        println!("{}", rendered);
    }

    if copy {
        match ctx.copy_all() {
            Ok(count) => eprintln!("Copied {} emails to clipboard", count),
            Err(e) => tracing::warn!("Clipboard copy failed: {:#}", e),
        }
    }

    Ok(())
}

pub fn run_repl(ctx: Context) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    let mut stdout = io::stdout();

    println!("emailgen - enter comma-separated names, /help for commands, /exit to quit");
    println!("Format: {} ({})", ctx.format.borrow(), ctx.mode.get().as_str());

    loop {
        match rl.readline("names> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                rl.add_history_entry(line)?;

                match handle_line(&ctx, line, &mut stdout) {
                    Ok(true) => break,
                    Ok(false) => {}
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Input error: {}", e);
                break;
            }
        }
    }

    Ok(())
}

/// Handle one line of input. Returns true when the session should end.
pub fn handle_line(ctx: &Context, line: &str, out: &mut dyn Write) -> Result<bool> {
    if line.starts_with('/') {
        return handle_command(ctx, line, out);
    }

    let results = ctx.generate(line);
    if results.is_empty() {
        writeln!(out, "No names given")?;
    } else {
        writeln!(out, "{}", output::numbered(&results, false))?;
    }
    Ok(false)
}

fn handle_command(ctx: &Context, cmd: &str, out: &mut dyn Write) -> Result<bool> {
    let parts: Vec<&str> = cmd.splitn(2, ' ').collect();
    let arg = parts.get(1).map(|s| s.trim()).filter(|s| !s.is_empty());

    match parts[0] {
        "/exit" | "/quit" => return Ok(true),
        "/help" => {
            writeln!(out, "Enter names separated by commas to generate emails.")?;
            writeln!(out, "Commands:")?;
            writeln!(out, "  /exit            - quit")?;
            writeln!(out, "  /help            - show commands")?;
            writeln!(out, "  /format [fmt]    - get/set the email format")?;
            writeln!(out, "  /mode [name]     - get/set render mode (cascade|tokenized)")?;
            writeln!(out, "  /placeholders    - list format placeholders")?;
            writeln!(out, "Results:")?;
            writeln!(out, "  /results         - show the last results")?;
            writeln!(out, "  /json            - show the last results as JSON")?;
            writeln!(out, "  /copy [n]        - copy all emails, or the n-th one")?;
            writeln!(out, "  /clear           - clear results")?;
            writeln!(out, "  /save            - save the format to .emailgen/config.local.toml")?;
        }
        "/format" => {
            if let Some(format) = arg {
                *ctx.format.borrow_mut() = format.to_string();
                if FormatSpec::parse(format).is_none() {
                    writeln!(
                        out,
                        "Warning: format has no '@'; generated emails will be empty"
                    )?;
                }
            }
            writeln!(out, "Format: {}", ctx.format.borrow())?;
        }
        "/mode" => match arg {
            Some(name) => match RenderMode::from_str(name) {
                Some(mode) => {
                    ctx.mode.set(mode);
                    writeln!(out, "Render mode: {}", mode.as_str())?;
                }
                None => writeln!(out, "Unknown mode: {}. Use: cascade, tokenized", name)?,
            },
            None => writeln!(out, "Render mode: {}", ctx.mode.get().as_str())?,
        },
        "/placeholders" => writeln!(out, "{}", output::PLACEHOLDER_HELP)?,
        "/results" => {
            let results = ctx.results.borrow();
            if results.is_empty() {
                writeln!(out, "No results yet")?;
            } else {
                writeln!(out, "{}", output::numbered(&results, ctx.is_copied()))?;
            }
        }
        "/json" => writeln!(out, "{}", output::json(&ctx.results.borrow())?)?,
        "/copy" => copy_command(ctx, arg, out)?,
        "/clear" => {
            ctx.results.borrow_mut().clear();
            ctx.copied_at.set(None);
            writeln!(out, "Results cleared")?;
        }
        "/save" => {
            let format = ctx.format.borrow().clone();
            match Config::save_local_format(&ctx.root, &format) {
                Ok(()) => writeln!(out, "Saved format to .emailgen/config.local.toml")?,
                Err(e) => writeln!(out, "Save failed: {:#}", e)?,
            }
        }
        _ => writeln!(out, "Unknown command: {}. Type /help for commands.", parts[0])?,
    }

    Ok(false)
}

fn copy_command(ctx: &Context, arg: Option<&str>, out: &mut dyn Write) -> Result<()> {
    let count = ctx.results.borrow().len();
    if count == 0 {
        writeln!(out, "Nothing to copy")?;
        return Ok(());
    }

    let Some(arg) = arg else {
        match ctx.copy_all() {
            Ok(count) => writeln!(out, "Copied {} emails", count)?,
            Err(e) => writeln!(out, "Copy failed: {:#}", e)?,
        }
        return Ok(());
    };

    let index = match arg.parse::<usize>() {
        Ok(n) if (1..=count).contains(&n) => n - 1,
        _ => {
            writeln!(out, "Usage: /copy [n] where n is between 1 and {}", count)?;
            return Ok(());
        }
    };

    let email = ctx.results.borrow()[index].email.clone();
    match ctx.copy_one(&email) {
        Ok(()) => writeln!(out, "Copied {}", email)?,
        Err(e) => writeln!(out, "Copy failed: {:#}", e)?,
    }
    Ok(())
}
