//! State module for tracking crawl progress
//!
//! - `RunState`: lifecycle of one BFS engine run (`Init -> Running -> Done`)

mod run_state;

pub use run_state::RunState;
