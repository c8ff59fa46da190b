use reelscout::db::Store;
use reelscout::domain::MovieId;
use reelscout::models::MovieSummary;
use reelscout::services::{SeaOrmTrendingStore, TrendingStore};

async fn temp_store() -> (Store, std::path::PathBuf) {
    let path = std::env::temp_dir().join(format!("reelscout-test-{}.db", uuid::Uuid::new_v4()));
    let url = format!("sqlite:{}", path.display());
    let store = Store::new(&url).await.expect("Failed to open test database");
    (store, path)
}

fn movie(id: u64, poster: Option<&str>) -> MovieSummary {
    MovieSummary {
        id: MovieId::new(id),
        title: format!("Movie {id}"),
        poster_path: poster.map(str::to_string),
        popularity: None,
        vote_average: None,
        release_date: None,
        original_language: None,
    }
}

#[tokio::test]
async fn migrations_apply_on_fresh_file() {
    let (store, path) = temp_store().await;
    store.ping().await.unwrap();
    assert!(store.top_trending(5).await.unwrap().is_empty());
    let _ = std::fs::remove_file(path);
}

#[tokio::test]
async fn repeat_record_increments_and_keeps_first_poster() {
    let (store, path) = temp_store().await;
    let trending = SeaOrmTrendingStore::new(store.clone(), "https://image.tmdb.org/t/p/w500");

    trending
        .record_search("dune", &movie(438631, Some("/dune.jpg")))
        .await
        .unwrap();
    let row = store.get_trending("dune").await.unwrap().unwrap();
    assert_eq!(row.count, 1);

    trending
        .record_search("dune", &movie(841, Some("/other.jpg")))
        .await
        .unwrap();
    let row = store.get_trending("dune").await.unwrap().unwrap();
    assert_eq!(row.count, 2);
    assert_eq!(row.movie_id, Some(438631));
    assert_eq!(
        row.poster_url.as_deref(),
        Some("https://image.tmdb.org/t/p/w500/dune.jpg")
    );

    let _ = std::fs::remove_file(path);
}

#[tokio::test]
async fn top_entries_are_ordered_and_limited() {
    let (store, path) = temp_store().await;
    let trending = SeaOrmTrendingStore::new(store, "https://image.tmdb.org/t/p/w500");

    let counts = [
        ("alien", 3),
        ("batman", 1),
        ("cars", 6),
        ("dune", 2),
        ("elf", 5),
        ("fargo", 4),
    ];
    for (i, (term, n)) in counts.iter().enumerate() {
        for _ in 0..*n {
            trending
                .record_search(term, &movie(i as u64 + 1, Some("/p.jpg")))
                .await
                .unwrap();
        }
    }

    let top = trending.top_entries(5).await.unwrap();
    let terms: Vec<&str> = top.iter().map(|e| e.search_term.as_str()).collect();
    assert_eq!(terms, vec!["cars", "elf", "fargo", "alien", "dune"]);
    assert_eq!(top[0].count, 6);
    assert_eq!(top[0].movie_id, Some(MovieId::new(3)));

    let top = trending.top_entries(2).await.unwrap();
    assert_eq!(top.len(), 2);

    let _ = std::fs::remove_file(path);
}

#[tokio::test]
async fn in_memory_database_is_usable() {
    let store = Store::new("sqlite::memory:").await.unwrap();
    let trending = SeaOrmTrendingStore::new(store, "https://image.tmdb.org/t/p/w500");

    trending.record_search("heat", &movie(949, None)).await.unwrap();

    let top = trending.top_entries(5).await.unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].count, 1);
    assert!(top[0].poster_url.is_none());
}
