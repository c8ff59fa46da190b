mod browse;
mod search;
mod trending;

pub use browse::cmd_browse;
pub use search::cmd_search;
pub use trending::cmd_trending;

use crate::models::MovieSummary;

pub(crate) fn print_movie(movie: &MovieSummary, image_base_url: &str) {
    let year = movie.release_year().unwrap_or("????");
    let rating = movie
        .vote_average
        .map_or_else(|| "-".to_string(), |v| format!("{v:.1}"));

    println!("• {} ({})", movie.title, year);
    println!("  Rating: {} | ID: {}", rating, movie.id);
    if let Some(poster) = movie.poster_url(image_base_url) {
        println!("  Poster: {poster}");
    }
}
