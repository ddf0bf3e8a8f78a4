//! ProPresenter playlist handling: conflict resolution and localization

mod document;
mod localize;
mod resolve;

pub use document::{parse_modified_date, playlist_modified_date, rewrite_cue_paths};
pub use localize::{localize, localized_reference};
pub use resolve::resolve_winner;
