//! CLI command handlers

pub mod ask;
pub mod config;
pub mod loan;
pub mod stock;

/// Join trailing positional words into one argument
pub fn join_words(words: &[String]) -> String {
    words.join(" ")
}
