//! Lightweight inline markup for item and project descriptions.
//!
//! Recognizes `**bold**`, `*italic*` and `[text](http(s)://url)` only; there
//! is no nesting and no block syntax beyond line breaks.

pub mod inline;
