use crate::config::Config;
use crate::state::build_clients;

pub async fn cmd_trending(config: &Config, limit: Option<u64>) -> anyhow::Result<()> {
    let limit = limit.unwrap_or(config.trending.top_limit).max(1);

    let (_, trending) = build_clients(config).await?;
    let entries = trending.top_entries(limit).await?;

    if entries.is_empty() {
        println!("No trending searches yet.");
        return Ok(());
    }

    println!("Trending Searches:");
    println!("{:-<60}", "");

    for (rank, entry) in entries.iter().enumerate() {
        println!("{:>2}. {} ({} searches)", rank + 1, entry.search_term, entry.count);
        if let Some(poster) = &entry.poster_url {
            println!("    Poster: {poster}");
        }
    }

    Ok(())
}
