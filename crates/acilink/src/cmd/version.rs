use acilink_frame::{DEFAULT_MAX_LENGTH, DEFAULT_QUEUE_DEPTH};

use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("acilink {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: acilink");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "build_target: {}",
        option_env!("ACILINK_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!("max_frame_length: {DEFAULT_MAX_LENGTH}");
    println!("queue_depth: {DEFAULT_QUEUE_DEPTH}");
    println!(
        "features: embedded-hal={}, cli=true",
        cfg!(feature = "embedded-hal")
    );

    Ok(SUCCESS)
}
