use crate::domain::MovieId;
use serde::{Deserialize, Serialize};

/// One movie as returned by the catalog's discover and search endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: MovieId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub original_language: Option<String>,
}

impl MovieSummary {
    /// Full poster URL under `image_base_url`, if the movie has a poster.
    #[must_use]
    pub fn poster_url(&self, image_base_url: &str) -> Option<String> {
        self.poster_path
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|p| format!("{}{}", image_base_url.trim_end_matches('/'), p))
    }

    /// Release year taken from `release_date` (`YYYY-MM-DD`).
    #[must_use]
    pub fn release_year(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .and_then(|d| d.split('-').next())
            .filter(|y| y.len() == 4)
    }
}

/// A search term with the number of times it produced results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingEntry {
    /// Assigned by the store.
    pub id: String,
    pub search_term: String,
    pub count: u64,
    pub movie_id: Option<MovieId>,
    /// Poster of the first result the term ever produced.
    pub poster_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(poster: Option<&str>) -> MovieSummary {
        MovieSummary {
            id: MovieId::new(1),
            title: "Dune".to_string(),
            poster_path: poster.map(str::to_string),
            popularity: Some(88.1),
            vote_average: None,
            release_date: Some("2021-09-15".to_string()),
            original_language: Some("en".to_string()),
        }
    }

    #[test]
    fn poster_url_joins_base_and_path() {
        let m = movie(Some("/d5NXSklXo0qyIYkgV94XAgMIckC.jpg"));
        assert_eq!(
            m.poster_url("https://image.tmdb.org/t/p/w500/").as_deref(),
            Some("https://image.tmdb.org/t/p/w500/d5NXSklXo0qyIYkgV94XAgMIckC.jpg")
        );
        assert_eq!(movie(None).poster_url("https://img"), None);
        assert_eq!(movie(Some("")).poster_url("https://img"), None);
    }

    #[test]
    fn release_year_from_date() {
        assert_eq!(movie(None).release_year(), Some("2021"));
    }

    #[test]
    fn deserializes_catalog_payload_ignoring_unknown_fields() {
        let json = r#"{
            "adult": false,
            "id": 438631,
            "title": "Dune",
            "poster_path": "/abc.jpg",
            "popularity": 120.5,
            "vote_average": 7.8,
            "genre_ids": [878, 12]
        }"#;

        let m: MovieSummary = serde_json::from_str(json).unwrap();
        assert_eq!(m.id, MovieId::new(438631));
        assert_eq!(m.title, "Dune");
        assert_eq!(m.release_date, None);
    }
}
