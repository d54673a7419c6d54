pub mod cache;
pub mod config;
pub mod dossier;
pub mod fund;
pub mod normalize;
pub mod query;
pub mod server;
pub mod session;
pub mod source;
pub mod table;

pub use cache::TableCache;
pub use table::{CanonicalRecord, CanonicalTable};
