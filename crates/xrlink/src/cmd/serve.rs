use xrlink_receiver::{FileSink, ReceiverConfig, ReceiverError, SinkConfig, StreamReceiver};

use crate::cmd::{install_interrupt_flag, ServeArgs};
use crate::exit::{receiver_error, CliResult, SUCCESS};
use crate::output::{print_summary, OutputFormat};

pub fn run(args: ServeArgs, format: OutputFormat) -> CliResult<i32> {
    let config = ReceiverConfig {
        host: args.host,
        port: args.port,
        recv_buffer_size: args.recv_buffer,
        backlog: args.backlog,
        print_interval: args.print_interval,
        flush_interval: args.flush_interval,
        buffering_enabled: !args.no_buffer,
        buffer_capacity: args.buffer_capacity,
        max_sessions: args.sessions,
        ..ReceiverConfig::default()
    };

    let mut receiver =
        StreamReceiver::bind(config).map_err(|err| receiver_error("bind failed", err))?;

    if args.save {
        let sink_config = SinkConfig {
            output_dir: args.output_dir,
            file_prefix: args.file_prefix,
            file_extension: args.file_extension,
        };
        let sink = FileSink::create(&sink_config)
            .map_err(|err| receiver_error("sink setup failed", ReceiverError::SinkCreate(err)))?;
        receiver = receiver.with_sink(Box::new(sink));
    }

    let running = install_interrupt_flag()?;

    let stats = receiver
        .serve(&running)
        .map_err(|err| receiver_error("serve failed", err))?;

    print_summary(&stats, format);
    Ok(SUCCESS)
}
