pub mod filter;
pub mod search_history;
pub mod space;
