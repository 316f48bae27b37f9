// Adapters layer: concrete implementations for external systems (local files, EDHREC, Scryfall).

pub mod deck_cache;
pub mod edhrec;
pub mod http;
pub mod scryfall;
pub mod storage;
