/// Virtualized card grid
///
/// The grid only materializes the cards inside the visible viewport plus a
/// fixed look-ahead window; everything scrolled past or not yet reached is
/// replaced by spacers so the scrollbar geometry stays correct.

use iced::widget::{column, container, scrollable, Space};
use iced::{Element, Length};
use iced_aw::Wrap;

use super::cards::{CARD_HEIGHT, CARD_WIDTH};
use crate::state::data::GalleryItem;
use crate::Message;

/// How many extra pages past the visible one are rendered ahead of scroll
pub const WINDOWS_AHEAD: usize = 3;

/// How many cards fit one viewport page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSpec {
    pub columns: usize,
    pub rows: usize,
}

impl PageSpec {
    /// Compute the page layout for a viewport.
    ///
    /// Clamped to at least one column and one row so a tiny window still
    /// renders something.
    pub fn from_viewport(width: f32, height: f32) -> Self {
        let columns = ((width / CARD_WIDTH).floor() as usize).max(1);
        let rows = ((height / CARD_HEIGHT).floor() as usize).max(1);
        PageSpec { columns, rows }
    }

    pub fn page_size(&self) -> usize {
        self.columns * self.rows
    }
}

/// The slice of items to materialize for the current scroll position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderWindow {
    /// First item index to render (inclusive)
    pub first_item: usize,
    /// Last item index to render (exclusive)
    pub last_item: usize,
    /// Whole rows scrolled past, replaced by the top spacer
    pub rows_above: usize,
    /// Whole rows past the look-ahead, replaced by the bottom spacer
    pub rows_below: usize,
}

/// Work out which rows are visible at the given scroll offset and extend
/// them by `WINDOWS_AHEAD` pages of look-ahead.
pub fn render_window(spec: PageSpec, total_items: usize, scroll_offset: f32) -> RenderWindow {
    let total_rows = total_items.div_ceil(spec.columns.max(1));
    let first_row = ((scroll_offset / CARD_HEIGHT).floor() as usize).min(total_rows);
    let rendered_rows = spec.rows * (1 + WINDOWS_AHEAD);
    let end_row = (first_row + rendered_rows).min(total_rows);

    RenderWindow {
        first_item: (first_row * spec.columns).min(total_items),
        last_item: (end_row * spec.columns).min(total_items),
        rows_above: first_row,
        rows_below: total_rows - end_row,
    }
}

/// Build the scrollable, virtualized card grid for one tab's view list.
pub fn gallery_grid<'a>(
    items: &'a [GalleryItem],
    spec: PageSpec,
    scroll_offset: f32,
    render_card: impl Fn(&'a GalleryItem) -> Element<'a, Message>,
    on_scroll: impl Fn(scrollable::Viewport) -> Message + 'a,
) -> Element<'a, Message> {
    let window = render_window(spec, items.len(), scroll_offset);

    let mut cards = Vec::with_capacity(window.last_item - window.first_item);
    for item in &items[window.first_item..window.last_item] {
        cards.push(render_card(item));
    }

    let mut content = column![];
    if window.rows_above > 0 {
        content = content.push(Space::with_height(Length::Fixed(
            window.rows_above as f32 * CARD_HEIGHT,
        )));
    }
    content = content.push(Wrap::with_elements(cards));
    if window.rows_below > 0 {
        content = content.push(Space::with_height(Length::Fixed(
            window.rows_below as f32 * CARD_HEIGHT,
        )));
    }

    scrollable(container(content).width(Length::Fill))
        .on_scroll(on_scroll)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}
