mod download;
mod extract;
mod filename;

pub use download::download_media;
pub use extract::{Episode, extract_episode};
pub use filename::{episode_filename, sanitize_title};
