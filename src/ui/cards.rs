/// Notebook card rendering
///
/// One card per gallery item: name, author, description, clickable tags,
/// engagement counters, and the action buttons. Clicking the card body
/// opens the notebook.

use iced::widget::{button, column, container, row, text, Space};
use iced::{Element, Length};

use crate::state::data::GalleryItem;
use crate::Message;

/// Card footprint in the grid, including the gutter around the card
pub const CARD_WIDTH: f32 = 276.0;
pub const CARD_HEIGHT: f32 = 232.0;

const CARD_GUTTER: f32 = 8.0;

/// Render a single gallery card.
///
/// `is_favorite` comes from the favorites cache so the like button is
/// correct on every tab, not just the Favorites tab. Delete is only
/// offered on the user's own published work.
pub fn gallery_card(item: &GalleryItem, is_favorite: bool, show_delete: bool) -> Element<'_, Message> {
    let header = button(
        column![
            text(&item.name).size(17),
            text(&item.author).size(13),
            text(&item.description).size(13),
        ]
        .spacing(4),
    )
    .style(button::text)
    .padding(0)
    .on_press(Message::NotebookOpened(item.clone()));

    let mut tags = row![].spacing(4);
    for tag in &item.tags {
        tags = tags.push(
            button(text(tag).size(12))
                .style(button::secondary)
                .padding([2.0, 6.0])
                .on_press(Message::TagSelected(tag.clone())),
        );
    }

    let counters = text(format!(
        "{} views · {} downloads · {} likes",
        item.views, item.downloads, item.favorites
    ))
    .size(12);

    let like = if is_favorite {
        button(text("Unlike").size(13)).on_press(Message::UnfavoriteRequested(item.clone()))
    } else {
        button(text("Like").size(13)).on_press(Message::FavoriteRequested(item.clone()))
    };

    let mut actions = row![
        like,
        button(text("Download").size(13)).on_press(Message::DownloadRequested(item.clone())),
    ]
    .spacing(8);

    if show_delete {
        actions = actions.push(
            button(text("Delete").size(13))
                .style(button::danger)
                .on_press(Message::DeleteRequested(item.clone())),
        );
    }

    let body = column![
        header,
        tags,
        Space::with_height(Length::Fill),
        counters,
        actions,
    ]
    .spacing(8)
    .padding(12);

    container(
        container(body)
            .style(container::rounded_box)
            .width(Length::Fixed(CARD_WIDTH - 2.0 * CARD_GUTTER))
            .height(Length::Fixed(CARD_HEIGHT - 2.0 * CARD_GUTTER)),
    )
    .padding(CARD_GUTTER)
    .into()
}
