use clap::Parser;
use std::path::PathBuf;

/// Server configuration, taken from positional command-line arguments.
///
/// There are no flags, environment variables, or config files: the whole
/// interface is `serve [port] [root_dir]`.
#[derive(Debug, Clone, Parser)]
#[command(name = "serve")]
#[command(about = "A tiny single-threaded HTTP/1.1 static file server")]
#[command(version)]
pub struct Config {
    /// Port to listen on
    #[arg(default_value_t = 8080)]
    pub port: u16,

    /// Directory served as the document root
    #[arg(default_value = "public")]
    pub root: PathBuf,
}

impl Config {
    /// The address the listener binds to: every interface, on the
    /// configured port.
    pub fn listen_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
