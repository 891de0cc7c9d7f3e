use crate::{config::DispatcherConfig, demo::docs_app, server::Environ};
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

/// Command-line interface for routelet
#[derive(Parser, Debug)]
#[command(name = "routelet")]
#[command(about = "Dispatch requests against the routelet docs demo", long_about = None)]
pub struct Cli {
    /// Log level: trace/debug/info/warn/error (overrides ROUTELET_LOG_LEVEL)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Dispatch one request and print the emitted response
    Dispatch {
        /// Request method
        #[arg(short, long, default_value = "GET")]
        method: String,

        /// Request path, without query string
        #[arg(short, long)]
        path: String,

        /// Upstream request id (ULID) to reuse
        #[arg(long)]
        request_id: Option<String>,

        /// YAML dispatcher configuration file
        #[arg(short, long, env = "ROUTELET_CONFIG")]
        config: Option<PathBuf>,
    },
    /// List the route table in registration order
    Routes,
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<DispatcherConfig> {
    let base = match path {
        Some(path) => DispatcherConfig::from_yaml_file(path)?,
        None => DispatcherConfig::default(),
    };
    Ok(base.merge_env())
}

/// Execute a parsed command, writing its output to `out`.
pub fn run(cli: &Cli, out: &mut dyn Write) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Dispatch {
            method,
            path,
            request_id,
            config,
        } => {
            let config = load_config(config.as_ref())?;
            let dispatcher = docs_app(config).context("Failed to build docs application")?;

            let mut environ = Environ::new(method.as_str(), path.as_str());
            if let Some(id) = request_id {
                environ = environ.with_request_id(id.as_str());
            }

            let mut head = Vec::new();
            let body = dispatcher
                .dispatch(&environ, |status_line, headers| {
                    head.push(status_line.to_string());
                    head.extend(headers.iter().map(|(k, v)| format!("{k}: {v}")));
                })
                .with_context(|| format!("Dispatch of {method} {path} failed"))?;

            for line in &head {
                writeln!(out, "{line}")?;
            }
            writeln!(out)?;
            let bytes = body.into_bytes();
            if !bytes.is_empty() {
                out.write_all(&bytes)?;
                writeln!(out)?;
            }
        }
        Commands::Routes => {
            let dispatcher = docs_app(DispatcherConfig::default())
                .context("Failed to build docs application")?;
            for route in dispatcher.routes().routes() {
                writeln!(out, "{} {}", route.method(), route.pattern())?;
            }
        }
    }
    Ok(())
}

/// Parse `std::env::args` and run against stdout.
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(&cli, &mut out)
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let mut log_config = crate::logging::LogConfig::from_env();
    if let Some(level) = &cli.log_level {
        log_config.log_level = level.clone();
    }
    crate::logging::init_logging_with_config(&log_config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_args(args: &[&str]) -> anyhow::Result<String> {
        let cli = Cli::try_parse_from(args)?;
        let mut out = Vec::new();
        run(&cli, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn test_dispatch_found() {
        let output = run_args(&["routelet", "dispatch", "--path", "/docs/1"]).unwrap();
        assert_eq!(output, "200 OK\n\n{\"pk\":1,\"data\":\"Doc1\"}\n");
    }

    #[test]
    fn test_dispatch_not_found() {
        let output = run_args(&["routelet", "dispatch", "--path", "/nope"]).unwrap();
        assert_eq!(output, "404 NOT FOUND\nContent-Type: text/plain\n\n");
    }

    #[test]
    fn test_routes_listing() {
        let output = run_args(&["routelet", "routes"]).unwrap();
        assert_eq!(output, "GET /\nGET /docs\nGET /docs/(\\d+)\n");
    }

    #[test]
    fn test_dispatch_oversized_id_is_not_found() {
        let output =
            run_args(&["routelet", "dispatch", "--path", "/docs/99999999999999999999999"]).unwrap();
        assert_eq!(output, "404 NOT FOUND\n\n");
    }

    #[test]
    fn test_dispatch_unicode_digit_id() {
        let output = run_args(&["routelet", "dispatch", "--path", "/docs/\u{661}"]).unwrap();
        assert_eq!(output, "200 OK\n\n{\"pk\":1,\"data\":\"Doc1\"}\n");
    }

    #[test]
    fn test_dispatch_invalid_method_is_error() {
        let err = run_args(&["routelet", "dispatch", "--method", "GE T", "--path", "/"]).unwrap_err();
        assert!(err.to_string().contains("Dispatch of GE T / failed"));
    }
}
