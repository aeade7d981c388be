extern crate octocrab;
extern crate tokio;
#[macro_use]
extern crate serde_derive;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use std::io::{IsTerminal, Write};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod input;
pub mod render;
pub mod repositories;
pub mod state;
pub mod users;

use api::OctocrabApi;
use config::Args;
use controller::SearchController;
use input::Command;
use render::{LoadingIndicator, RenderOptions};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let api = OctocrabApi::new(&args.api_url, config::USER_AGENT_NAME)
        .with_context(|| format!("failed to set up GitHub client for {}", args.api_url))?;
    info!("Using GitHub API at {}", args.api_url);
    let mut controller = SearchController::new(Arc::new(api));

    let options = RenderOptions {
        hyperlinks: !args.no_hyperlinks && std::io::stdout().is_terminal(),
    };

    match args.query {
        Some(query) => one_shot(&mut controller, &query, args.expand, &options).await,
        None => interactive(&mut controller, &options).await,
    }
}

async fn one_shot(
    controller: &mut SearchController,
    query: &str,
    expand: bool,
    options: &RenderOptions,
) -> Result<()> {
    let mut spinner = LoadingIndicator::new();
    spinner.sync(state::is_searchable(query));
    let output = one_shot_output(controller, query, expand, options).await;
    spinner.sync(false);

    print!("{}", output);
    std::io::stdout().flush()?;
    Ok(())
}

async fn one_shot_output(
    controller: &mut SearchController,
    query: &str,
    expand: bool,
    options: &RenderOptions,
) -> String {
    if !state::is_searchable(query) {
        return format!("{}\n", short_query_hint());
    }
    controller.search(query).await;
    if expand {
        controller.expand_all();
    }
    render::render(controller.state(), options)
}

fn short_query_hint() -> String {
    format!("Type at least {} characters to search.", state::MIN_QUERY_LEN)
}

async fn interactive(controller: &mut SearchController, options: &RenderOptions) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut spinner = LoadingIndicator::new();

    println!("{}", input::HELP);
    prompt()?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read from stdin")? else {
                    break;
                };
                match Command::parse(&line) {
                    Command::Quit => break,
                    Command::Help => println!("{}", input::HELP),
                    Command::Search(query) => {
                        if !controller.spawn_search(&query, tx.clone()) {
                            println!("{}", short_query_hint());
                        }
                        redraw(controller, options)?;
                    }
                    Command::Toggle(target) => {
                        match resolve_login(controller, &target) {
                            Some(login) => {
                                controller.toggle(&login);
                                redraw(controller, options)?;
                            }
                            None => println!("No user {:?} in the results.", target),
                        }
                    }
                    Command::ExpandAll => {
                        controller.expand_all();
                        redraw(controller, options)?;
                    }
                    Command::CollapseAll => {
                        controller.collapse_all();
                        redraw(controller, options)?;
                    }
                    Command::Unknown(command) => {
                        println!("Unknown command {:?}, try :help", command);
                    }
                }
                spinner.sync(controller.state().is_loading());
                prompt()?;
            }
            Some((ticket, outcome)) = rx.recv() => {
                if controller.apply(ticket, outcome) {
                    spinner.sync(controller.state().is_loading());
                    println!();
                    redraw(controller, options)?;
                    prompt()?;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                warn!("Interrupted");
                break;
            }
        }
    }
    spinner.sync(false);
    Ok(())
}

/// Maps a `:toggle` argument, a 1-based position or a login, to a login in the results.
fn resolve_login(controller: &SearchController, target: &str) -> Option<String> {
    let state = controller.state();
    if let Ok(index) = target.parse::<usize>() {
        return state.login_at(index).map(str::to_string);
    }
    state
        .results()
        .iter()
        .find(|u| u.login.eq_ignore_ascii_case(target))
        .map(|u| u.login.clone())
}

fn redraw(controller: &SearchController, options: &RenderOptions) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    write!(stdout, "{}", render::render(controller.state(), options))?;
    stdout.flush()?;
    Ok(())
}

fn prompt() -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    write!(stdout, "{} > ", render::PROMPT)?;
    stdout.flush()?;
    Ok(())
}
