use std::net::TcpStream;
use std::time::Duration;

use xrlink_frame::FrameWriter;

use crate::cmd::SendArgs;
use crate::exit::{frame_error, io_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_send_report, OutputFormat};

pub fn run(args: SendArgs, format: OutputFormat) -> CliResult<i32> {
    let payload = match (&args.data, &args.file) {
        (Some(data), None) => data.clone().into_bytes(),
        (None, Some(path)) => {
            std::fs::read(path).map_err(|err| io_error("payload file read failed", err))?
        }
        _ => {
            return Err(CliError::new(
                USAGE,
                "exactly one of --data or --file is required",
            ))
        }
    };

    let stream =
        TcpStream::connect(&args.addr).map_err(|err| io_error("connect failed", err))?;
    let mut writer = FrameWriter::new(stream);

    let mut frames_sent = 0u64;
    let mut bytes_sent = 0u64;
    for i in 0..args.repeat {
        writer
            .send(&payload)
            .map_err(|err| frame_error("send failed", err))?;
        frames_sent += 1;
        bytes_sent += payload.len() as u64;

        if args.delay_ms > 0 && i + 1 < args.repeat {
            std::thread::sleep(Duration::from_millis(args.delay_ms));
        }
    }

    print_send_report(&args.addr, frames_sent, bytes_sent, format);
    Ok(SUCCESS)
}
