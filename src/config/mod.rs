// Re-export all items from the submodules
mod fleet_config;
mod profiles;

// Re-export fleet config
pub use fleet_config::{
    FleetConfig,
    load_or_default,
};

// Re-export profile loading
pub use profiles::{
    ProfileList,
    load_profiles_json,
};
