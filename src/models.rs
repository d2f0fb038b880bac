use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One catalog record as the catalog service returns it.
///
/// Movies carry `title`/`release_date`, shows carry `name`/`first_air_date`;
/// the accessors below hide that split.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MediaItem {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f32>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
}

impl MediaItem {
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.is_empty())
            .or(self.name.as_deref())
            .unwrap_or_default()
    }

    pub fn year(&self) -> Option<String> {
        self.release_date
            .as_deref()
            .filter(|d| !d.is_empty())
            .or(self.first_air_date.as_deref())
            .and_then(extract_year)
    }
}

pub fn extract_year(date: &str) -> Option<String> {
    date.split('-')
        .next()
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Trending,
    Popular,
    TopRated,
    Action,
    Comedy,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Trending,
        Category::Popular,
        Category::TopRated,
        Category::Action,
        Category::Comedy,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Trending => "Trending Now",
            Category::Popular => "Popular Movies",
            Category::TopRated => "Top Rated",
            Category::Action => "Action Movies",
            Category::Comedy => "Comedy Movies",
        }
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            Category::Trending => "/trending/movie/week",
            Category::Popular => "/movie/popular",
            Category::TopRated => "/movie/top_rated",
            Category::Action => "/discover/movie?with_genres=28",
            Category::Comedy => "/discover/movie?with_genres=35",
        }
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "trending" => Ok(Category::Trending),
            "popular" => Ok(Category::Popular),
            "top_rated" | "top-rated" => Ok(Category::TopRated),
            "action" => Ok(Category::Action),
            "comedy" => Ok(Category::Comedy),
            other => Err(anyhow!("unknown category '{}'", other)),
        }
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct CategoryResult {
    pub category: Category,
    pub items: Vec<MediaItem>,
}

/// External video id used to embed a trailer.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct TrailerReference(pub String);

impl TrailerReference {
    pub fn key(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Bot,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub speaker: Speaker,
    pub text: String,
}
