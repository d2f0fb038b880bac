use serde::Deserialize;
use std::collections::HashSet;
use tracing::debug;

use super::{CARD_GAP, CARD_WIDTH, SCROLL_STEP};
use crate::aggregator::HomeData;
use crate::models::{MediaItem, TrailerReference};

pub const DEFAULT_VIEWPORT: u32 = 1280;
const SEARCH_ROW_TITLE: &str = "Search Results";

#[derive(Debug, Clone, Default, PartialEq)]
pub enum LoadState {
    #[default]
    Loading,
    Ready(HomeData),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    Left,
    Right,
}

/// Immutable view of all homepage UI state, handed to the render functions.
#[derive(Debug, Clone, Default)]
pub struct HomeSnapshot {
    pub load: LoadState,
    pub search_open: bool,
    pub search_results: Vec<MediaItem>,
    pub selected: Option<MediaItem>,
    pub trailer: Option<TrailerReference>,
    pub modal_open: bool,
    pub row_offsets: Vec<u32>,
    /// Keyed by media id: every card for an item shares one poster URL, so a
    /// failed load switches all of them to the placeholder.
    pub broken_images: HashSet<i64>,
}

impl HomeSnapshot {
    pub fn home(&self) -> Option<&HomeData> {
        match &self.load {
            LoadState::Ready(data) => Some(data),
            LoadState::Loading => None,
        }
    }

    /// Rows currently on screen: search results replace the category rows.
    pub fn visible_rows(&self) -> Vec<(&str, &[MediaItem])> {
        if !self.search_results.is_empty() {
            return vec![(SEARCH_ROW_TITLE, self.search_results.as_slice())];
        }
        match self.home() {
            Some(home) => home
                .categories
                .iter()
                .map(|c| (c.category.label(), c.items.as_slice()))
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn find_item(&self, id: i64) -> Option<&MediaItem> {
        self.search_results
            .iter()
            .find(|m| m.id == id)
            .or_else(|| self.home().and_then(|h| h.find_item(id)))
            .or_else(|| self.home().map(|h| &h.hero).filter(|m| m.id == id))
    }
}

/// Sole owner of homepage state. Every mutation goes through a transition below.
#[derive(Debug, Clone)]
pub struct HomeController {
    state: HomeSnapshot,
    viewport_width: u32,
}

impl Default for HomeController {
    fn default() -> Self {
        Self::new(DEFAULT_VIEWPORT)
    }
}

impl HomeController {
    pub fn new(viewport_width: u32) -> Self {
        Self {
            state: HomeSnapshot::default(),
            viewport_width,
        }
    }

    pub fn snapshot(&self) -> &HomeSnapshot {
        &self.state
    }

    pub fn begin_loading(&mut self) {
        self.state.load = LoadState::Loading;
        self.state.row_offsets.clear();
    }

    pub fn ready(&mut self, data: HomeData) {
        self.state.load = LoadState::Ready(data);
        self.reset_offsets();
    }

    pub fn open_search(&mut self) {
        self.state.search_open = true;
    }

    pub fn close_search(&mut self) {
        self.state.search_open = false;
    }

    pub fn apply_search(&mut self, results: Vec<MediaItem>) {
        debug!("Search produced {} results", results.len());
        self.state.search_results = results;
        self.state.search_open = false;
        self.reset_offsets();
    }

    pub fn clear_search(&mut self) {
        self.state.search_results.clear();
        self.reset_offsets();
    }

    pub fn open_modal(&mut self, item: MediaItem, trailer: Option<TrailerReference>) {
        self.state.selected = Some(item);
        self.state.trailer = trailer;
        self.state.modal_open = true;
    }

    pub fn close_modal(&mut self) {
        self.state.modal_open = false;
        self.state.selected = None;
        self.state.trailer = None;
    }

    /// Moves a row by one fixed step. Returns the new offset, or `None` for an unknown row.
    pub fn scroll_row(&mut self, index: usize, direction: ScrollDirection) -> Option<u32> {
        let max = {
            let rows = self.state.visible_rows();
            let (_, items) = rows.get(index)?;
            max_offset(items.len(), self.viewport_width)
        };
        let offset = self.state.row_offsets.get_mut(index)?;
        *offset = match direction {
            ScrollDirection::Left => offset.saturating_sub(SCROLL_STEP),
            ScrollDirection::Right => (*offset + SCROLL_STEP).min(max),
        };
        Some(*offset)
    }

    pub fn mark_image_broken(&mut self, id: i64) {
        self.state.broken_images.insert(id);
    }

    fn reset_offsets(&mut self) {
        let rows = self.state.visible_rows().len();
        self.state.row_offsets = vec![0; rows];
    }
}

fn max_offset(cards: usize, viewport: u32) -> u32 {
    let cards = cards as u32;
    if cards == 0 {
        return 0;
    }
    let track = cards * CARD_WIDTH + (cards - 1) * CARD_GAP;
    track.saturating_sub(viewport)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback;

    fn ready_controller(viewport: u32) -> HomeController {
        let mut controller = HomeController::new(viewport);
        controller.ready(HomeData::all_fallback());
        controller
    }

    #[test]
    fn closing_modal_resets_selection_and_trailer() {
        let mut controller = ready_controller(DEFAULT_VIEWPORT);
        controller.open_modal(
            fallback::hero(),
            Some(TrailerReference("abc".to_string())),
        );
        assert!(controller.snapshot().modal_open);
        controller.close_modal();
        let s = controller.snapshot();
        assert!(!s.modal_open);
        assert!(s.selected.is_none());
        assert!(s.trailer.is_none());
    }

    #[test]
    fn search_results_replace_category_rows() {
        let mut controller = ready_controller(DEFAULT_VIEWPORT);
        assert_eq!(controller.snapshot().visible_rows().len(), 5);
        controller.open_search();
        controller.apply_search(fallback::search_fallback("dragon"));
        let rows = controller.snapshot().visible_rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].0, "Search Results");
        assert!(!controller.snapshot().search_open);

        controller.clear_search();
        assert_eq!(controller.snapshot().visible_rows().len(), 5);
    }

    #[test]
    fn scroll_moves_by_fixed_step_and_clamps() {
        // five cards: 5 * 200 + 4 * 16 = 1064 wide
        let mut controller = ready_controller(200);
        assert_eq!(controller.scroll_row(0, ScrollDirection::Right), Some(800));
        assert_eq!(controller.scroll_row(0, ScrollDirection::Right), Some(864));
        assert_eq!(controller.scroll_row(0, ScrollDirection::Left), Some(64));
        assert_eq!(controller.scroll_row(0, ScrollDirection::Left), Some(0));
        assert_eq!(controller.snapshot().row_offsets[1], 0);
    }

    #[test]
    fn scroll_on_unknown_row_is_rejected() {
        let mut controller = ready_controller(DEFAULT_VIEWPORT);
        assert_eq!(controller.scroll_row(9, ScrollDirection::Right), None);
        let mut loading = HomeController::default();
        assert_eq!(loading.scroll_row(0, ScrollDirection::Right), None);
    }

    #[test]
    fn wide_viewport_never_scrolls() {
        let mut controller = ready_controller(DEFAULT_VIEWPORT);
        assert_eq!(controller.scroll_row(2, ScrollDirection::Right), Some(0));
    }
}
