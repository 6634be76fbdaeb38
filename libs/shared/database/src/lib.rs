pub mod memory;
pub mod store;
pub mod supabase;

pub use memory::MemoryStore;
pub use store::{Collection, Condition, DocumentStore, Filter, FindOptions, SortOrder};
pub use supabase::{SupabaseClient, SupabaseStore};
