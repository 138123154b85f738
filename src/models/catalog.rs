use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Movie document as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub poster: Option<String>,
    #[serde(default)]
    pub backdrop: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub rating: Option<f32>,
    /// Runtime in minutes
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ContentKind {
    #[default]
    Movie,
    Series,
    Live,
}

impl ContentKind {
    fn from_backend(kind: Option<&str>) -> Self {
        match kind.map(str::to_ascii_lowercase).as_deref() {
            Some("series") | Some("show") | Some("tv") => ContentKind::Series,
            Some("live") | Some("channel") => ContentKind::Live,
            _ => ContentKind::Movie,
        }
    }
}

/// What cards, rows and the details view render
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieView {
    pub id: String,
    pub title: String,
    pub overview: String,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    /// Raw source handed to the player
    pub stream_url: Option<String>,
    pub year: Option<i32>,
    pub genres: Vec<String>,
    pub rating: Option<f32>,
    pub runtime_minutes: Option<u32>,
    pub kind: ContentKind,
    pub added_at: Option<DateTime<Utc>>,
}

impl MovieView {
    pub fn is_playable(&self) -> bool {
        self.stream_url.is_some()
    }
}

impl From<MovieRecord> for MovieView {
    fn from(record: MovieRecord) -> Self {
        let title = match record.title.trim() {
            "" => "Untitled".to_string(),
            title => title.to_string(),
        };
        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        Self {
            id: record.id,
            title,
            overview: record.description.unwrap_or_default(),
            // Cards fall back to the backdrop when a poster is missing
            poster_url: non_empty(record.poster).or_else(|| non_empty(record.backdrop.clone())),
            backdrop_url: non_empty(record.backdrop),
            stream_url: non_empty(record.video_url),
            year: record.year,
            genres: record
                .genres
                .into_iter()
                .map(|genre| genre.trim().to_string())
                .filter(|genre| !genre.is_empty())
                .collect(),
            rating: record.rating,
            runtime_minutes: record.duration.filter(|minutes| *minutes > 0),
            kind: ContentKind::from_backend(record.kind.as_deref()),
            added_at: record.created_at,
        }
    }
}

/// One horizontal row on the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRow {
    pub title: String,
    pub items: Vec<MovieView>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_from_backend_json() {
        let record: MovieRecord = serde_json::from_value(json!({
            "_id": "65f0",
            "title": "Night Train",
            "description": "A thriller",
            "poster": "https://img.example/p.jpg",
            "videoUrl": "https://cdn.example/night/master.m3u8",
            "year": 2021,
            "genres": ["Thriller", " Drama "],
            "rating": 7.4,
            "duration": 104,
            "type": "movie",
            "createdAt": "2024-03-01T12:00:00Z"
        }))
        .unwrap();

        let view = MovieView::from(record);

        assert_eq!(view.id, "65f0");
        assert_eq!(view.genres, vec!["Thriller", "Drama"]);
        assert_eq!(view.runtime_minutes, Some(104));
        assert_eq!(view.kind, ContentKind::Movie);
        assert!(view.is_playable());
        assert_eq!(
            view.added_at.map(|at| at.to_rfc3339()),
            Some("2024-03-01T12:00:00+00:00".to_string())
        );
    }

    #[test]
    fn test_missing_fields_default() {
        let record: MovieRecord = serde_json::from_value(json!({
            "_id": "x",
            "backdrop": "https://img.example/b.jpg",
            "type": "Series",
            "videoUrl": ""
        }))
        .unwrap();

        let view = MovieView::from(record);

        assert_eq!(view.title, "Untitled");
        assert_eq!(view.overview, "");
        assert_eq!(view.poster_url.as_deref(), Some("https://img.example/b.jpg"));
        assert_eq!(view.kind, ContentKind::Series);
        assert!(!view.is_playable());
        assert!(view.genres.is_empty());
    }
}
