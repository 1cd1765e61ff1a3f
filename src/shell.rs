//! Interactive command loop.
//!
//! Reads commands from stdin and prints a status line whenever a photo
//! fetch settles or a new error shows up. Snapshots reach the loop through
//! a channel so that nothing is printed from inside a store subscriber.

use std::sync::Arc;

use flickrer_core::{FeedCore, FeedState};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::commands::{self, Command, PageTrigger};
use crate::render;

pub async fn run(core: &FeedCore) -> anyhow::Result<()> {
    let store = core.store();
    let (tx, mut rx) = mpsc::unbounded_channel::<Arc<FeedState>>();
    let subscription = store.subscribe(move |state| {
        let _ = tx.send(Arc::clone(state));
    });

    let mut trigger = PageTrigger::new();
    let mut last = store.snapshot();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", commands::HELP);
    store.spawn_fetch_photos(0);

    let result = loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break Ok(()),
                    Err(e) => break Err(e.into()),
                };
                let command = match commands::parse(&line) {
                    Ok(Some(command)) => command,
                    Ok(None) => continue,
                    Err(e) => {
                        println!("{}", e.message);
                        continue;
                    }
                };
                if !execute(core, &mut trigger, command) {
                    break Ok(());
                }
            }
            Some(state) = rx.recv() => {
                let settled = last.is_loading && !state.is_loading;
                if settled || (state.error.is_some() && state.error != last.error) {
                    println!("{}", render::status_line(&state));
                }
                last = state;
            }
        }
    };

    store.unsubscribe(subscription);
    result
}

/// Run one command. Returns `false` when the loop should stop.
fn execute(core: &FeedCore, trigger: &mut PageTrigger, command: Command) -> bool {
    let store = core.store();
    tracing::debug!(?command, "Executing command");

    match command {
        Command::Search(text) => commands::search(store, trigger, &text),
        Command::Tag(tag) => commands::filter_tag(store, trigger, &tag),
        Command::Tags(tags) => commands::filter_tags(store, trigger, &tags),
        Command::More => {
            if commands::load_more(store, trigger).is_none() {
                println!("nothing more to load right now");
            }
        }
        Command::Expand(id) => match commands::expand(store, &id) {
            Ok(_) => println!("{}", render::render_feed(&store.snapshot(), &core.settings.display)),
            Err(e) => println!("{}", e.message),
        },
        Command::Refresh => commands::refresh(store, trigger),
        Command::Show => println!("{}", render::render_feed(&store.snapshot(), &core.settings.display)),
        Command::Help => println!("{}", commands::HELP),
        Command::Quit => return false,
    }

    true
}
