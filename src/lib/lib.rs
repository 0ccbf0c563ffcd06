//! A small server-rendered todo list.
//!
//! [`storage`] persists records, [`core::TodoList`] holds the rules, and
//! [`adapters::TodoApp`] exposes them over HTTP.

pub mod adapters;
pub mod config;
pub mod core;
pub mod storage;

#[cfg(test)]
mod tests;
