//! Tiling infrastructure

pub mod greedy_tiling;
pub mod marking;
pub mod window_index;

pub use greedy_tiling::GreedyStringTiler;
pub use marking::TokenMarks;
pub use window_index::WindowIndex;
