pub mod handle;
pub mod key_dict;
pub mod source;
pub mod symbol_index;

pub use handle::IndexHandle;
pub use key_dict::{EntryId, KeyDictionary, KeyDictionaryBuilder};
pub use source::TableSource;
pub use symbol_index::SymbolIndex;
