// src/draft_store/mod.rs

mod drafts;
mod fs;
mod kv;

pub use drafts::{
    decode_drafts, decode_last_accepted, encode_drafts, encode_last_accepted, panel_values,
    restore_panel, DRAFTS_KEY, LAST_SIG_KEY,
};
pub use fs::FileKv;
pub use kv::{KvStore, MemoryKv};
