mod client;

pub use multimodal_live_types as types;
pub use client::{
    connect, connect_with_config, Client, ClientError, Config, ConfigBuilder, ConfigError, EventRx,
    Result, StateRx, Stats,
};

#[cfg(feature = "utils")]
pub use multimodal_live_utils as utils;
