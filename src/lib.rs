// src/lib.rs

//! Job postings watcher library

pub mod error;
pub mod matching;
pub mod models;
pub mod notify;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
