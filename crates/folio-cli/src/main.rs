//! Folio CLI
//!
//! Drives the portfolio page engine from the command line.
//!
//! ## Usage
//!
//! ```bash
//! # Run the demo page through a scripted visit and print the final state
//! folio run --duration-ms 2000
//!
//! # Inspect or change the stored theme preference
//! folio theme get --system-dark
//! folio theme set dark
//! folio theme toggle
//!
//! # Check a value against the contact form rules
//! folio validate --name email --kind email --required "me@example.com"
//!
//! # Submit a form to a live endpoint
//! folio submit --endpoint https://formsubmit.co/ajax/me@example.com \
//!     --field name=Ada --field email=ada@example.com --field "message=Hello there!"
//!
//! # Print the particle background configuration
//! folio particles dark
//!
//! # Print typewriter frames
//! folio typewriter --ticks 20
//! ```

mod context;
mod demo;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand, ValueEnum};
use folio_core::form::check_value;
use folio_core::{
    ContactForm, Document, Element, EventBus, EventSource, HttpTransport, ParticleConfig,
    PortfolioApp, Services, SubmitOutcome, ThemePreference, ThemeStore, TracingParticleRenderer,
    TypewriterState,
};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::context::CliContext;

/// Folio - portfolio page interactivity engine
#[derive(Parser)]
#[command(name = "folio")]
#[command(version = "0.1.0")]
#[command(about = "Folio - portfolio page interactivity engine")]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Data directory (default: <data dir>/folio)
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Page configuration (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the demo page through a scripted visit
    Run {
        /// How long to keep the page running, in milliseconds
        #[arg(long, default_value_t = 1500)]
        duration_ms: u64,

        /// Print the final state as JSON
        #[arg(long)]
        json: bool,
    },

    /// Theme preference management
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },

    /// Validate a single field value
    Validate {
        /// Field name (`message` enables the length rule)
        #[arg(long)]
        name: String,

        #[arg(long, value_enum, default_value_t = FieldKind::Text)]
        kind: FieldKind,

        #[arg(long)]
        required: bool,

        value: String,
    },

    /// Submit the contact form to an endpoint
    Submit {
        #[arg(long)]
        endpoint: String,

        /// Field as name=value (repeatable)
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },

    /// Print the particle configuration for a theme
    Particles {
        #[arg(value_enum)]
        theme: ThemeArg,
    },

    /// Print the typewriter's frames
    Typewriter {
        #[arg(long, default_value_t = 40)]
        ticks: usize,
    },
}

#[derive(Subcommand)]
enum ThemeAction {
    /// Show the theme the page would start with
    Get {
        /// Pretend the system prefers dark
        #[arg(long)]
        system_dark: bool,
    },
    /// Store an explicit choice
    Set {
        #[arg(value_enum)]
        theme: ThemeArg,
    },
    /// Switch to the other theme and store it
    Toggle {
        #[arg(long)]
        system_dark: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FieldKind {
    Text,
    Email,
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeArg {
    Light,
    Dark,
}

impl From<ThemeArg> for ThemePreference {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Light => ThemePreference::Light,
            ThemeArg::Dark => ThemePreference::Dark,
        }
    }
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{raw}'"))?;
    if name.is_empty() {
        return Err("field name must not be empty".into());
    }
    Ok((name.to_string(), value.to_string()))
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let ctx = CliContext::load(cli.data_dir, cli.config.as_deref())?;

    match cli.command {
        Commands::Run { duration_ms, json } => run_demo(&ctx, duration_ms, json).await?,

        Commands::Theme { action } => {
            let store = theme_store(&ctx)?;
            let theme = match action {
                ThemeAction::Get { system_dark } => store.init(system_dark),
                ThemeAction::Set { theme } => {
                    store.init(false);
                    store.set_theme(theme.into());
                    theme.into()
                }
                ThemeAction::Toggle { system_dark } => {
                    store.init(system_dark);
                    store.toggle_theme()
                }
            };
            store.shutdown();
            let source = if store.persisted().is_some() {
                "stored"
            } else {
                "system"
            };
            println!("Theme: {} ({})", theme, source);
        }

        Commands::Validate {
            name,
            kind,
            required,
            value,
        } => {
            let result = check_value(&value, required, matches!(kind, FieldKind::Email), name == "message");
            match result.message {
                None => println!("valid"),
                Some(message) => anyhow::bail!("{}: {}", name, message),
            }
        }

        Commands::Submit { endpoint, fields } => submit(&ctx, endpoint, fields).await?,

        Commands::Particles { theme } => {
            println!("{}", ParticleConfig::for_theme(theme.into()).to_json()?);
        }

        Commands::Typewriter { ticks } => {
            let timing = &ctx.config().typewriter;
            let mut state = TypewriterState::new(timing.phrases.clone())
                .context("No typewriter phrases configured")?;
            for _ in 0..ticks {
                let frame = state.tick(timing);
                println!("{:>5}ms  {}", frame.delay.as_millis(), frame.text);
            }
        }
    }

    Ok(())
}

/// A theme store over the durable preferences and an empty page.
fn theme_store(ctx: &CliContext) -> Result<ThemeStore> {
    Ok(ThemeStore::new(
        Document::new().into_shared(),
        ctx.preferences()?,
        Arc::new(TracingParticleRenderer),
        ctx.config().theme.clone(),
    ))
}

async fn run_demo(ctx: &CliContext, duration_ms: u64, as_json: bool) -> Result<()> {
    let page = demo::build_demo_page();
    let services = Services {
        preferences: ctx.preferences()?,
        particles: Arc::new(TracingParticleRenderer),
        transport: Arc::new(HttpTransport::new(Duration::from_millis(ctx.config().form.timeout_ms))?),
    };

    let bus = EventBus::new();
    let events = bus.subscribe();
    let cancel = CancellationToken::new();
    let mut app = PortfolioApp::new(page.doc.clone(), ctx.config(), services);
    let controller = tokio::spawn({
        let cancel = cancel.clone();
        async move { app.run_events(events, cancel).await }
    });

    let duration = Duration::from_millis(duration_ms);
    tokio::select! {
        _ = demo::play_tour(&bus, &page, duration / 12) => {
            tokio::time::sleep(duration / 4).await;
        }
        _ = tokio::time::sleep(duration) => {}
    }
    cancel.cancel();
    controller.await.context("Controller task failed")?;
    info!("Demo run finished");

    let summary = demo::summarize(&page.doc);
    if as_json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Demo page after {}ms:", duration_ms);
        if let Some(fields) = summary.as_object() {
            for (key, value) in fields {
                println!("  {}: {}", key, value);
            }
        }
    }
    Ok(())
}

async fn submit(ctx: &CliContext, endpoint: String, fields: Vec<(String, String)>) -> Result<()> {
    let mut doc = Document::new();
    let form = doc.append(doc.body(), Element::new("form").with_class("contact-form"));
    for (name, value) in &fields {
        let (tag, class) = if name == "message" {
            ("textarea", "form-textarea")
        } else {
            ("input", "form-input")
        };
        let mut field = Element::new(tag)
            .with_class(class)
            .with_attr("name", name.clone())
            .with_attr("required", "")
            .with_value(value.clone());
        if name == "email" {
            field = field.with_attr("type", "email");
        }
        doc.append(form, field);
        doc.append(form, Element::new("span").with_class("error-message"));
    }
    doc.append(form, Element::new("div").with_class("form-status"));
    let doc = doc.into_shared();

    let mut config = ctx.config().form.clone();
    config.endpoint = Some(endpoint);
    let transport = Arc::new(HttpTransport::new(Duration::from_millis(config.timeout_ms))?);
    let form = ContactForm::attach(doc.clone(), &config, transport).context("Form did not attach")?;

    let outcome = form.submit().await;
    if outcome == SubmitOutcome::Invalid {
        let d = doc.read();
        for slot in d.by_class("error-message") {
            if let Some(el) = d.get(slot).filter(|el| el.is_displayed() && !el.text().is_empty()) {
                eprintln!("  {}", el.text());
            }
        }
        anyhow::bail!("Form is invalid, nothing was sent");
    }

    let status = {
        let d = doc.read();
        d.first_by_class("form-status")
            .and_then(|n| d.get(n))
            .map(|el| el.text().to_string())
            .unwrap_or_default()
    };
    println!("{}", status);
    match outcome {
        SubmitOutcome::Sent => Ok(()),
        _ => anyhow::bail!("Submission failed"),
    }
}
