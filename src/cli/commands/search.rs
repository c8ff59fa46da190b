use crate::config::Config;
use crate::domain::SearchPhase;
use crate::services::SearchSettings;
use crate::state::SharedState;

use super::print_movie;

pub async fn cmd_search(config: &Config, query: &str) -> anyhow::Result<()> {
    println!("Searching for: {query}");

    let settings = SearchSettings {
        initial_query: query.to_string(),
        ..SearchSettings::from(config)
    };
    let state = SharedState::with_settings(config.clone(), settings).await?;
    let search = state.search.clone();
    drop(state);

    let Some(result) = search
        .wait_for(|s| !s.is_loading && s.phase.is_terminal())
        .await
    else {
        anyhow::bail!("Search controller stopped before the search finished");
    };

    if result.phase == SearchPhase::Failed {
        let message = result.error_message.unwrap_or_default();
        println!("{message}");
        search.shutdown().await;
        return Ok(());
    }

    if result.movies.is_empty() {
        println!("No movies found matching '{query}'");
        search.shutdown().await;
        return Ok(());
    }

    println!();
    println!("Search Results:");
    println!("{:-<60}", "");

    for movie in result.movies.iter().take(10) {
        print_movie(movie, &config.catalog.image_base_url);
        println!();
    }

    if result.movies.len() > 10 {
        println!("... and {} more", result.movies.len() - 10);
    }

    // Lets the trending write for this search complete before exiting
    search.shutdown().await;

    Ok(())
}
