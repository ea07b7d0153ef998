use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::{Args, Subcommand};

use crate::exit::{CliError, CliResult, INTERNAL};
use crate::output::OutputFormat;

pub mod pose;
pub mod send;
pub mod serve;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Receive a length-prefixed stream over TCP.
    Serve(ServeArgs),
    /// Send length-prefixed frames to a receiver.
    Send(SendArgs),
    /// Poll headset pose at a fixed rate and print orientation.
    Pose(PoseArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Serve(args) => serve::run(args, format),
        Command::Send(args) => send::run(args, format),
        Command::Pose(args) => pose::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Interface to listen on.
    #[arg(long, default_value = "0.0.0.0", env = "XRLINK_HOST")]
    pub host: String,
    /// Port to listen on.
    #[arg(long, default_value = "12345", env = "XRLINK_PORT")]
    pub port: u16,
    /// Socket receive-buffer size hint in bytes.
    #[arg(long, default_value = "65536")]
    pub recv_buffer: usize,
    /// Requested listen backlog.
    #[arg(long, default_value = "5")]
    pub backlog: u32,
    /// Emit a statistics line every N frames.
    #[arg(long, default_value = "10")]
    pub print_interval: u64,
    /// Flush the output file every N frames.
    #[arg(long, default_value = "10")]
    pub flush_interval: u64,
    /// Capacity of the in-memory frame buffer.
    #[arg(long, default_value = "100")]
    pub buffer_capacity: usize,
    /// Disable the in-memory frame buffer and rate telemetry.
    #[arg(long)]
    pub no_buffer: bool,
    /// Save received payloads to a file.
    #[arg(long)]
    pub save: bool,
    /// Directory for saved files.
    #[arg(long, default_value = "video_output")]
    pub output_dir: PathBuf,
    /// Filename prefix for saved files.
    #[arg(long, default_value = "received_video")]
    pub file_prefix: String,
    /// Filename extension for saved files.
    #[arg(long, default_value = "h265")]
    pub file_extension: String,
    /// Exit after serving N sessions.
    #[arg(long)]
    pub sessions: Option<u64>,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Receiver address (host:port).
    pub addr: String,
    /// Raw string payload.
    #[arg(long, conflicts_with = "file")]
    pub data: Option<String>,
    /// Read the payload from a file.
    #[arg(long, conflicts_with = "data")]
    pub file: Option<PathBuf>,
    /// Send the payload N times.
    #[arg(long, default_value = "1")]
    pub repeat: u64,
    /// Delay between frames in milliseconds.
    #[arg(long, default_value = "0")]
    pub delay_ms: u64,
}

#[derive(Args, Debug)]
pub struct PoseArgs {
    /// Target polling frequency in Hz.
    #[arg(long, default_value = "60")]
    pub hz: f64,
    /// Stop after N samples.
    #[arg(long)]
    pub count: Option<u64>,
    /// Simulated rotation speed in degrees per second.
    #[arg(long, default_value = "22.5")]
    pub yaw_rate: f64,
    /// Simulated warm-up polls before data turns valid.
    #[arg(long, default_value = "3")]
    pub warmup: u32,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Install the Ctrl-C handler used by the long-running subcommands.
///
/// Flips the shared flag; blocking loops observe it between operations.
pub fn install_interrupt_flag() -> CliResult<Arc<AtomicBool>> {
    let running = Arc::new(AtomicBool::new(true));
    let flag = running.clone();
    ctrlc::set_handler(move || {
        flag.store(false, Ordering::SeqCst);
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))?;
    Ok(running)
}
