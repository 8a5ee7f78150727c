/// UI widget module
///
/// This module builds the gallery's visual pieces:
/// - Notebook cards with action buttons (cards.rs)
/// - The virtualized card grid and its paging math (grid.rs)

pub mod cards;
pub mod grid;
