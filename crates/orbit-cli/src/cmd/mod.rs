pub mod discover;
pub mod serve;
