// animelistsync/src/utils/mod.rs
pub mod http;
pub mod pager;
