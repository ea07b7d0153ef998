use tracing::warn;
use xrlink_device::{HeadsetSdk, PollConfig, PosePoller, SimulatedHeadset};

use crate::cmd::{install_interrupt_flag, PoseArgs};
use crate::exit::{sdk_error, CliResult, SUCCESS};
use crate::output::{print_pose_sample, OutputFormat};

pub fn run(args: PoseArgs, format: OutputFormat) -> CliResult<i32> {
    let mut sdk = SimulatedHeadset::new(args.yaw_rate, args.warmup);
    sdk.init()
        .map_err(|err| sdk_error("SDK initialization failed", err))?;

    let config = PollConfig {
        target_hz: args.hz,
        max_samples: args.count,
    };
    let mut poller = PosePoller::new(sdk, config);

    let running = install_interrupt_flag()?;

    let result = poller.run(&running, |sample| print_pose_sample(sample, format));

    // Close failure never blocks shutdown.
    let mut sdk = poller.into_inner();
    if let Err(err) = sdk.close() {
        warn!(%err, "SDK shutdown failed");
    }

    result.map_err(|err| sdk_error("pose polling failed", err))?;
    Ok(SUCCESS)
}
