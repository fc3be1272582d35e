pub mod args;
pub mod handlers;

pub use args::{Cli, Commands};
pub use handlers::{handle_buddies, handle_cliques, handle_compare, handle_specials, CliqueArgs};
