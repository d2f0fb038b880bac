use serde::Serialize;

use super::controller::HomeSnapshot;
use super::{BACKDROP_BASE, EMBED_BASE, PLACEHOLDER_IMAGE, POSTER_BASE};
use crate::models::{MediaItem, TrailerReference};

const BRAND: &str = "NETFLIX";
const NAV_LINKS: [&str; 5] = ["Home", "TV Shows", "Movies", "New & Popular", "My List"];

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HeaderView {
    pub brand: &'static str,
    pub nav: Vec<&'static str>,
    pub search_open: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HeroView {
    pub id: i64,
    pub title: String,
    pub overview: Option<String>,
    pub backdrop_url: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CardView {
    pub id: i64,
    pub title: String,
    pub poster_url: String,
    pub match_percent: Option<u32>,
    pub year: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RowView {
    pub index: usize,
    pub title: String,
    pub offset: u32,
    pub cards: Vec<CardView>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PlayerEmbed {
    pub video_id: String,
    pub url: String,
    pub autoplay: bool,
    pub controls: bool,
    pub related: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ModalView {
    pub title: String,
    pub overview: Option<String>,
    pub player: Option<PlayerEmbed>,
    pub no_trailer_message: Option<String>,
    pub rating: Option<String>,
    pub release: Option<String>,
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PageView {
    Loading {
        brand: &'static str,
    },
    Ready {
        header: HeaderView,
        hero: HeroView,
        rows: Vec<RowView>,
        modal: Option<ModalView>,
    },
}

pub fn render_page(snapshot: &HomeSnapshot) -> PageView {
    let Some(home) = snapshot.home() else {
        return PageView::Loading { brand: BRAND };
    };
    let rows = snapshot
        .visible_rows()
        .into_iter()
        .enumerate()
        .map(|(index, (title, items))| {
            let offset = snapshot.row_offsets.get(index).copied().unwrap_or(0);
            render_row(index, title, items, offset, snapshot)
        })
        .collect();
    let modal = if snapshot.modal_open {
        snapshot
            .selected
            .as_ref()
            .map(|item| render_modal(item, snapshot.trailer.as_ref()))
    } else {
        None
    };
    PageView::Ready {
        header: render_header(snapshot.search_open),
        hero: render_hero(&home.hero),
        rows,
        modal,
    }
}

pub fn render_header(search_open: bool) -> HeaderView {
    HeaderView {
        brand: BRAND,
        nav: NAV_LINKS.to_vec(),
        search_open,
    }
}

pub fn render_hero(item: &MediaItem) -> HeroView {
    HeroView {
        id: item.id,
        title: item.display_title().to_string(),
        overview: item.overview.clone(),
        backdrop_url: image_url(BACKDROP_BASE, item.backdrop_path.as_deref()),
    }
}

pub fn render_row(
    index: usize,
    title: &str,
    items: &[MediaItem],
    offset: u32,
    snapshot: &HomeSnapshot,
) -> RowView {
    RowView {
        index,
        title: title.to_string(),
        offset,
        cards: items
            .iter()
            .map(|m| render_card(m, snapshot.broken_images.contains(&m.id)))
            .collect(),
    }
}

pub fn render_card(item: &MediaItem, image_broken: bool) -> CardView {
    let poster_url = if image_broken {
        PLACEHOLDER_IMAGE.to_string()
    } else {
        image_url(POSTER_BASE, item.poster_path.as_deref())
    };
    CardView {
        id: item.id,
        title: item.display_title().to_string(),
        poster_url,
        match_percent: item.vote_average.map(|v| (v * 10.0).round().max(0.0) as u32),
        year: item.year(),
    }
}

pub fn render_modal(item: &MediaItem, trailer: Option<&TrailerReference>) -> ModalView {
    let title = item.display_title().to_string();
    let player = trailer.map(|t| PlayerEmbed {
        video_id: t.key().to_string(),
        url: format!("{EMBED_BASE}/{}?autoplay=1&controls=1&rel=0", t.key()),
        autoplay: true,
        controls: true,
        related: false,
    });
    let no_trailer_message = if player.is_some() {
        None
    } else {
        Some(format!("No trailer available for {title}"))
    };
    ModalView {
        overview: item.overview.clone(),
        player,
        no_trailer_message,
        rating: item.vote_average.map(|v| format!("Rating: {v:.1}/10")),
        release: item.year().map(|y| format!("Release: {y}")),
        duration: item.runtime.map(|r| format!("Duration: {r} min")),
        title,
    }
}

fn image_url(base: &str, path: Option<&str>) -> String {
    match path.filter(|p| !p.is_empty()) {
        Some(p) => format!("{base}{p}"),
        None => PLACEHOLDER_IMAGE.to_string(),
    }
}
