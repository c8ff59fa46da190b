use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;

use crate::config::Config;
use crate::domain::SearchPhase;
use crate::services::SearchState;
use crate::state::SharedState;

use super::print_movie;

pub async fn cmd_browse(config: &Config) -> anyhow::Result<()> {
    let state = SharedState::new(config.clone()).await?;
    let search = state.search.clone();
    drop(state);

    println!("Type a query and press enter. Empty line shows popular movies, Ctrl+D quits.");

    let printer = tokio::spawn(print_snapshots(
        search.subscribe(),
        config.catalog.image_base_url.clone(),
    ));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if !search.set_query(line.trim_end_matches('\r')) {
            break;
        }
    }

    search.shutdown().await;
    printer.abort();

    Ok(())
}

async fn print_snapshots(mut rx: watch::Receiver<SearchState>, image_base_url: String) {
    let mut last_printed: Option<SearchState> = None;

    while rx.changed().await.is_ok() {
        let snapshot = rx.borrow_and_update().clone();

        if snapshot.is_loading || !snapshot.phase.is_terminal() {
            continue;
        }
        if last_printed.as_ref() == Some(&snapshot) {
            continue;
        }

        print_snapshot(&snapshot, &image_base_url);
        last_printed = Some(snapshot);
    }
}

fn print_snapshot(snapshot: &SearchState, image_base_url: &str) {
    println!();
    if snapshot.debounced_query.is_empty() {
        println!("Popular movies:");
    } else {
        println!("Results for '{}':", snapshot.debounced_query);
    }
    println!("{:-<60}", "");

    if snapshot.phase == SearchPhase::Failed {
        if let Some(message) = &snapshot.error_message {
            println!("{message}");
        }
        return;
    }

    if snapshot.movies.is_empty() {
        println!("No movies found.");
    }
    for movie in snapshot.movies.iter().take(10) {
        print_movie(movie, image_base_url);
    }

    if !snapshot.trending.is_empty() {
        let terms: Vec<&str> = snapshot
            .trending
            .iter()
            .map(|t| t.search_term.as_str())
            .collect();
        println!("Trending: {}", terms.join(", "));
    }
}
