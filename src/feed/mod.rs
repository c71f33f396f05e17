mod fetch;
mod parse;

pub use fetch::fetch_feed;
pub use parse::{Feed, Item, parse_feed};
