//! Command handlers, one module per subcommand group.

pub mod config_cmd;
pub mod devices;
pub mod serve;
pub mod util;
