//! Fixed catalog data used whenever the live catalog is unavailable or empty.
use crate::models::MediaItem;
use once_cell::sync::Lazy;

/// Substituted for a failed trailer lookup.
pub const PLACEHOLDER_TRAILER: &str = "dQw4w9WgXcQ";

static FALLBACK_ITEMS: Lazy<Vec<MediaItem>> = Lazy::new(|| {
    vec![
        item(
            1,
            "The Amateur",
            "After his life is turned upside down when his wife is killed in a London terrorist attack, a brilliant but introverted CIA decoder takes matters into his own hands when his supervisors refuse to take action.",
            "/6van4BavoNXaZhCPdzLHNQ4Uc8H.jpg",
            "/SNEoUInCa5fAgwuEBMIMBGvkkh.jpg",
            6.9,
            "2025-04-09",
        ),
        item(
            2,
            "Deep Cover",
            "Kat is an improv comedy teacher beginning to question if she's missed her shot at success. When an undercover cop offers her the role of a lifetime, she recruits two of her students to infiltrate London's gangland by impersonating dangerous criminals.",
            "/sNpoGjbV2a65HfZXCtTvf313cBT.jpg",
            "/euM8fJvfH28xhjGy25LiygxfkWc.jpg",
            6.9,
            "2025-06-04",
        ),
        item(
            3,
            "Final Destination Bloodlines",
            "Plagued by a violent recurring nightmare, college student Stefanie heads home to track down the one person who might be able to break the cycle and save her family from the grisly demise that inevitably awaits them all.",
            "/uIpJPDNFoeX0TVml9smPrs9KUVx.jpg",
            "/6WxhEvFsauuACfv8HyoVX6mZKFj.jpg",
            7.0,
            "2025-05-14",
        ),
        item(
            4,
            "How to Train Your Dragon",
            "On the rugged isle of Berk, where Vikings and dragons have been bitter enemies for generations, Hiccup stands apart, defying centuries of tradition when he befriends Toothless, a feared Night Fury dragon.",
            "/7HqLLVjdjhXS0Qoz1SgZofhkIpE.jpg",
            "/q5pXRYTycaeW6dEgsCrd4mYPmxM.jpg",
            8.0,
            "2025-06-06",
        ),
        item(
            5,
            "The Accountant²",
            "When an old acquaintance is murdered, Wolff is compelled to solve the case. Realizing more extreme measures are necessary, Wolff recruits his estranged and highly lethal brother, Brax, to help.",
            "/yBDvgpyynDsbMyK21FoQu1c2wYR.jpg",
            "/kMDUS7VmFhb2coRfVBoGLR8ADBt.jpg",
            7.2,
            "2025-04-23",
        ),
    ]
});

fn item(
    id: i64,
    title: &str,
    overview: &str,
    backdrop: &str,
    poster: &str,
    rating: f32,
    release: &str,
) -> MediaItem {
    MediaItem {
        id,
        title: Some(title.to_string()),
        name: None,
        overview: Some(overview.to_string()),
        poster_path: Some(poster.to_string()),
        backdrop_path: Some(backdrop.to_string()),
        vote_average: Some(rating),
        release_date: Some(release.to_string()),
        first_air_date: None,
        runtime: None,
    }
}

pub fn fallback_items() -> Vec<MediaItem> {
    FALLBACK_ITEMS.clone()
}

pub fn hero() -> MediaItem {
    FALLBACK_ITEMS[0].clone()
}

/// Case-insensitive substring match over fallback titles.
pub fn search_fallback(query: &str) -> Vec<MediaItem> {
    let needle = query.to_lowercase();
    FALLBACK_ITEMS
        .iter()
        .filter(|m| m.display_title().to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
