pub mod feed;

pub use feed::{FeedTask, QuakeFeature, QuakeFeed, FEED_URL};
