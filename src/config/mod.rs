// Re-export all items from the submodules
mod run_config;

pub use run_config::{
    RunConfig,
    load_or_create_config,
    DEFAULT_IDENTITIES,
};
