//! Homepage state and the pure render functions that turn it into views.

mod controller;
mod views;

pub use controller::{HomeController, HomeSnapshot, LoadState, ScrollDirection, DEFAULT_VIEWPORT};
pub use views::{
    render_card, render_header, render_hero, render_modal, render_page, render_row, CardView,
    HeaderView, HeroView, ModalView, PageView, PlayerEmbed, RowView,
};

pub const POSTER_BASE: &str = "https://image.tmdb.org/t/p/w500";
pub const BACKDROP_BASE: &str = "https://image.tmdb.org/t/p/original";
pub const PLACEHOLDER_IMAGE: &str =
    "https://images.pexels.com/photos/8058392/pexels-photo-8058392.jpeg";
pub const EMBED_BASE: &str = "https://www.youtube.com/embed";

pub const SCROLL_STEP: u32 = 800;
pub const CARD_WIDTH: u32 = 200;
pub const CARD_GAP: u32 = 16;
