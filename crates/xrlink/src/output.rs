use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use xrlink_device::PoseSample;
use xrlink_receiver::ReceiverStats;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct SummaryOutput {
    total_packets: u64,
    total_bytes: u64,
    total_mib: f64,
    sessions: u64,
}

/// Final cumulative statistics, printed unconditionally at shutdown.
pub fn print_summary(stats: &ReceiverStats, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = SummaryOutput {
                total_packets: stats.total_packets,
                total_bytes: stats.total_bytes,
                total_mib: stats.total_mib(),
                sessions: stats.sessions,
            };
            println!("{}", to_json_line(&out));
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["TOTAL PACKETS", "TOTAL BYTES", "MiB", "SESSIONS"])
                .add_row(vec![
                    stats.total_packets.to_string(),
                    stats.total_bytes.to_string(),
                    format!("{:.2}", stats.total_mib()),
                    stats.sessions.to_string(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "total_packets={} total_bytes={} ({:.2} MiB) sessions={}",
                stats.total_packets,
                stats.total_bytes,
                stats.total_mib(),
                stats.sessions
            );
        }
    }
}

#[derive(Serialize)]
struct PoseOutput {
    timestamp_ns: u64,
    qw: f64,
    qx: f64,
    qy: f64,
    qz: f64,
    yaw_deg: f64,
    pitch_deg: f64,
    roll_deg: f64,
}

/// One pose sample per line. Table output degrades to the pretty line —
/// a 60 Hz stream of one-row tables is not useful.
pub fn print_pose_sample(sample: &PoseSample, format: OutputFormat) {
    let q = sample.quaternion;
    let e = sample.euler;
    match format {
        OutputFormat::Json => {
            let out = PoseOutput {
                timestamp_ns: sample.timestamp_ns,
                qw: q.w,
                qx: q.x,
                qy: q.y,
                qz: q.z,
                yaw_deg: e.yaw_deg,
                pitch_deg: e.pitch_deg,
                roll_deg: e.roll_deg,
            };
            println!("{}", to_json_line(&out));
        }
        OutputFormat::Table | OutputFormat::Pretty => {
            println!(
                "quaternion=({:.4}, {:.4}, {:.4}, {:.4}) yaw={:.2} pitch={:.2} roll={:.2}",
                q.w, q.x, q.y, q.z, e.yaw_deg, e.pitch_deg, e.roll_deg
            );
        }
    }
}

#[derive(Serialize)]
struct SendOutput<'a> {
    addr: &'a str,
    frames_sent: u64,
    bytes_sent: u64,
}

pub fn print_send_report(addr: &str, frames_sent: u64, bytes_sent: u64, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = SendOutput {
                addr,
                frames_sent,
                bytes_sent,
            };
            println!("{}", to_json_line(&out));
        }
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("sent {frames_sent} frame(s), {bytes_sent} payload byte(s) to {addr}");
        }
    }
}

fn to_json_line<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
}
