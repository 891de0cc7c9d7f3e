//! # CLI Module
//!
//! Command-line front end for the `routelet` binary. It drives the docs demo
//! application (see [`crate::demo`]) without any network transport, which
//! makes it handy for checking route patterns and middleware configuration.
//!
//! ## Commands
//!
//! ### `dispatch`
//!
//! Dispatch a single request and print the status line, headers and body:
//!
//! ```bash
//! routelet dispatch --method GET --path /docs/1
//! ```
//!
//! Options:
//! - `--method <METHOD>` - Request method (default: `GET`)
//! - `--path <PATH>` - Request path (required)
//! - `--request-id <ULID>` - Reuse a correlation id instead of minting one
//! - `--config <FILE>` - YAML dispatcher configuration
//!
//! ### `routes`
//!
//! List the route table in registration order:
//!
//! ```bash
//! routelet routes
//! ```
//!
//! ## Configuration
//!
//! Settings from `--config` are applied first, then `ROUTELET_*`
//! environment variables override them (see [`crate::config`]).

mod commands;

pub use commands::{run, run_cli, Cli, Commands};
