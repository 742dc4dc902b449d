use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;

use anyhow::Context;
use catalog_core::{load_query_state, update, AppState, Msg};
use catalog_logging::{catalog_info, catalog_warn};
use clap::Parser;

use super::config::{AppConfig, Cli};
use super::effects::EffectRunner;
use super::location::FileLocation;
use super::ui::constants::{HELP_TEXT, PROMPT};
use super::ui::input::{parse_command, UiCommand};
use super::ui::render;

/// Everything the main loop reacts to, in arrival order.
pub enum Inbox {
    Msg(Msg),
    Command(UiCommand),
    InputClosed,
}

pub fn run_app() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let (mut config, config_error) = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => (config, None),
        Err(err) => (AppConfig::default(), Some(err)),
    };
    config.apply_cli(&cli);
    catalog_logging::initialize(&config.log);
    if let Some(err) = config_error {
        catalog_warn!("{}; using defaults", err);
    }

    let base = config.base_url()?;
    let location = FileLocation::open(config.location_file.clone(), cli.location.clone());
    let parsed = load_query_state(&location);
    for ignored in &parsed.ignored {
        catalog_warn!(
            "Ignoring location parameter {}={:?}: {}",
            ignored.key,
            ignored.value,
            ignored.reason
        );
    }

    let (inbox_tx, inbox_rx) = mpsc::channel::<Inbox>();
    let runner = EffectRunner::new(config.engine_settings(), base.clone(), location, inbox_tx.clone())
        .context("failed to start catalog engine")?;
    spawn_input_reader(inbox_tx);
    catalog_info!("Catalog started against {}", base);

    let mut app = App {
        state: AppState::with_query(parsed.state),
        runner,
    };
    app.dispatch_all(vec![Msg::Started]);

    while let Ok(item) = inbox_rx.recv() {
        match item {
            Inbox::Msg(msg) => app.dispatch_all(vec![msg]),
            Inbox::Command(UiCommand::Dispatch(msgs)) => app.dispatch_all(msgs),
            Inbox::Command(UiCommand::Help) => print_block(HELP_TEXT),
            Inbox::Command(UiCommand::ListCategories) => {
                print_block(&render::render_categories(&app.state.view()))
            }
            Inbox::Command(UiCommand::Invalid(reason)) => print_block(&reason),
            Inbox::Command(UiCommand::Quit) | Inbox::InputClosed => break,
        }
    }

    app.runner.shutdown();
    catalog_info!("Catalog stopped");
    Ok(())
}

struct App {
    state: AppState,
    runner: EffectRunner,
}

impl App {
    /// Applies `msgs` in order, then renders once if anything visible changed.
    fn dispatch_all(&mut self, msgs: Vec<Msg>) {
        for msg in msgs {
            let state = std::mem::take(&mut self.state);
            let (state, effects) = update(state, msg);
            self.state = state;
            self.runner.enqueue(effects);
        }

        if self.state.consume_dirty() {
            let screen = render::render(&self.state.view(), &self.runner.location().display());
            print_block(&screen);
        }
    }
}

fn print_block(text: &str) {
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "\n{}", text.trim_end());
    let _ = write!(stdout, "{PROMPT}");
    let _ = stdout.flush();
}

fn spawn_input_reader(tx: mpsc::Sender<Inbox>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(Inbox::Command(parse_command(&line))).is_err() {
                return;
            }
        }
        let _ = tx.send(Inbox::InputClosed);
    });
}
