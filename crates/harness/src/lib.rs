pub mod tracker;

pub use tracker::{movie, show, webcomic, TestTracker};
