pub(crate) mod cache;
pub use cache::{MemoryCache, MemoryCacheEnvError, TokenCache, TOKEN_CACHE_KEY};

pub(crate) mod dropdown;
pub use dropdown::{DropdownSink, ListRule, MemoryDropdowns};

pub(crate) mod notify;
pub use notify::{Notifier, TracingNotifier};

pub(crate) mod store;
pub use store::{ConfigStore, Field, MemoryStore};
