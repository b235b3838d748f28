pub mod runner;

pub use runner::{
    EventSink, ItemError, ItemEvent, ItemFailure, ItemState, RunOutcome, RunStatus, Runner,
};
