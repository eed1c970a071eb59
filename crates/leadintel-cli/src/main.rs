mod display;
mod input;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use leadintel_api::{ApiError, DEFAULT_BASE_URL, LeadClient, ResearchApi};
use leadintel_core::LeadAnalysis;
use leadintel_workflow::{HistoryLoaded, LeadForm, WorkflowController};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{UnboundedSender, unbounded_channel};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use input::Command;

#[derive(Parser)]
#[command(name = "leadintel", version, about = "Research companies and draft outreach with the lead intelligence agent")]
struct Cli {
    /// Research backend base URL.
    #[arg(long, env = "LEADINTEL_API_URL", default_value = DEFAULT_BASE_URL)]
    api_url: String,

    /// Log filter, e.g. `debug` or `leadintel_api=debug`. Defaults to `RUST_LOG`, then `warn`.
    #[arg(long)]
    log: Option<String>,
}

/// Completions of background network calls, delivered back to the UI loop.
enum Event {
    Health(Result<(), ApiError>),
    Submitted(Result<LeadAnalysis, ApiError>),
    History(HistoryLoaded),
    Opened(Result<LeadAnalysis, ApiError>),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log.as_deref())?;
    info!(api_url = %cli.api_url, "leadintel v{}", env!("CARGO_PKG_VERSION"));

    let client: Arc<dyn ResearchApi> = Arc::new(LeadClient::new(cli.api_url));
    let mut ctl = WorkflowController::new(Arc::clone(&client));
    let (tx, mut rx) = unbounded_channel();

    let health_tx = tx.clone();
    tokio::spawn(async move {
        let _ = health_tx.send(Event::Health(client.health().await));
    });
    spawn_history_refresh(&mut ctl, &tx);

    display::print_help();
    display::print_screen(&ctl);
    display::prompt(&ctl);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("reading stdin")? else {
                    break;
                };
                match input::parse(&line) {
                    Ok(Command::Quit) => break,
                    Ok(cmd) => handle_command(cmd, &mut ctl, &tx),
                    Err(msg) => println!("{msg}"),
                }
            }
            Some(event) = rx.recv() => handle_event(event, &mut ctl, &tx),
        }
        display::prompt(&ctl);
    }
    Ok(())
}

fn init_tracing(filter: Option<&str>) -> anyhow::Result<()> {
    let filter = match filter {
        Some(f) => EnvFilter::try_new(f).with_context(|| format!("invalid log filter `{f}`"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn handle_command(cmd: Command, ctl: &mut WorkflowController, tx: &UnboundedSender<Event>) {
    match cmd {
        Command::SetName(v) => return edit_form(ctl, |form| form.company_name = v),
        Command::SetDomain(v) => return edit_form(ctl, |form| form.company_domain = v),
        Command::SetPersona(v) => return edit_form(ctl, |form| form.icp_persona = v),
        Command::Submit => match ctl.begin_submission() {
            Ok(pending) => {
                let tx = tx.clone();
                tokio::spawn(async move {
                    let _ = tx.send(Event::Submitted(pending.run().await));
                });
                println!("Agent researching...");
                return;
            }
            Err(err) => println!("! {}", err.user_message()),
        },
        Command::OpenIndex(n) => {
            if !ctl.select_history(n - 1) {
                println!("no recent lead #{n}");
                return;
            }
        }
        Command::OpenId(id) => {
            if let Some(fetch) = ctl.open_lead(&id) {
                let tx = tx.clone();
                tokio::spawn(async move {
                    let _ = tx.send(Event::Opened(fetch.run().await));
                });
                println!("Loading {id}...");
                return;
            }
        }
        Command::Back => ctl.back_to_form(),
        Command::New => ctl.new_research(),
        Command::Resume => {
            if !ctl.resume_result() {
                println!("no result to return to");
                return;
            }
        }
        Command::Refresh => {
            spawn_history_refresh(ctl, tx);
            return;
        }
        Command::Help => {
            display::print_help();
            return;
        }
        Command::Show | Command::Quit => {}
    }
    display::print_screen(ctl);
}

fn edit_form(ctl: &mut WorkflowController, edit: impl FnOnce(&mut LeadForm)) {
    match ctl.submission_mut().form_mut() {
        Ok(form) => edit(form),
        Err(err) => {
            println!("! {}", err.user_message());
            return;
        }
    }
    display::print_screen(ctl);
}

fn handle_event(event: Event, ctl: &mut WorkflowController, tx: &UnboundedSender<Event>) {
    match event {
        Event::Health(Ok(())) => info!("research backend is healthy"),
        Event::Health(Err(err)) => warn!(error = %err, "research backend health check failed"),
        Event::Submitted(outcome) => {
            if ctl.finish_submission(outcome).is_ok() {
                spawn_history_refresh(ctl, tx);
            }
            display::print_screen(ctl);
        }
        Event::History(loaded) => {
            if ctl.apply_history(loaded) {
                display::print_screen(ctl);
            }
        }
        Event::Opened(result) => match ctl.finish_open(result) {
            Ok(()) => display::print_screen(ctl),
            Err(err) => println!("! {err}"),
        },
    }
}

fn spawn_history_refresh(ctl: &mut WorkflowController, tx: &UnboundedSender<Event>) {
    let fetch = ctl.history_fetch();
    let tx = tx.clone();
    tokio::spawn(async move {
        let _ = tx.send(Event::History(fetch.run().await));
    });
}
