//! One module per graph node. Each stage owns a single async `run(state,
//! deps)` function that mutates `RunState` in place and sets `next_node`.

pub mod action;
pub mod coverage;
pub mod draft;
pub mod escalate;
pub mod finalize;
pub mod gather;
pub mod initialize;
pub mod plan;
pub mod response;
pub mod validate;
