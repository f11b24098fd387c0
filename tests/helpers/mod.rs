//! Shared fixtures and assertions for the integration tests.

#![allow(dead_code)]

pub mod grammar_fixtures;
pub mod lookahead_assertions;
