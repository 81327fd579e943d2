use std::collections::VecDeque;
use std::fs;
use std::path::Path;

use acilink_frame::Frame;
use acilink_hal::{SimulatedRadio, DEFAULT_FILLER};
use acilink_transport::{Transport, TransportConfig};
use serde::Deserialize;

use crate::cmd::{Driver, SimulateArgs};
use crate::exit::{
    io_error, transport_error, CliError, CliResult, DATA_INVALID, FAILURE, SUCCESS, USAGE,
};
use crate::output::{print_event, print_summary, OutputFormat, SummaryOutput};

/// Scripted simulation loaded with `--script`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Script {
    commands: Vec<String>,
    events: Vec<ScriptEvent>,
    transport: TransportConfig,
    filler: Option<u8>,
    idle_status: u8,
}

#[derive(Debug, Deserialize)]
struct ScriptEvent {
    #[serde(default)]
    status: u8,
    payload: String,
}

pub fn run(args: SimulateArgs, format: OutputFormat) -> CliResult<i32> {
    let mut script = match &args.script {
        Some(path) => load_script(path)?,
        None => Script::default(),
    };
    script.commands.extend(args.commands.iter().cloned());
    script
        .events
        .extend(args.events.iter().map(|payload| ScriptEvent {
            status: args.status,
            payload: payload.clone(),
        }));

    let mut radio = SimulatedRadio::new()
        .with_filler(script.filler.unwrap_or(DEFAULT_FILLER))
        .with_idle_status(script.idle_status);
    for event in &script.events {
        let payload = parse_hex(&event.payload)?;
        radio.push_event(event.status, &payload);
    }

    let mut pending = script
        .commands
        .iter()
        .map(|hex| {
            let payload = parse_hex(hex)?;
            Frame::command(&payload)
                .map_err(|err| CliError::new(DATA_INVALID, format!("command {hex}: {err}")))
        })
        .collect::<CliResult<VecDeque<Frame>>>()?;

    let mut transport: Transport<SimulatedRadio> = Transport::init(radio, script.transport)
        .map_err(|err| transport_error("init failed", err))?;
    tracing::debug!(
        policy = ?transport.config().overflow_policy,
        driver = ?args.driver,
        "simulation started"
    );

    let mut received = 0usize;
    let mut cycles = 0usize;
    while cycles < args.max_cycles {
        cycles += 1;
        queue_commands(&mut transport, &mut pending)?;

        if args.driver == Driver::Edge
            && transport
                .is_peer_ready()
                .map_err(|err| transport_error("ready check failed", err))?
        {
            transport
                .on_ready_edge()
                .map_err(|err| transport_error("transfer failed", err))?;
        }

        match transport
            .try_receive()
            .map_err(|err| transport_error("receive failed", err))?
        {
            Some(event) => {
                print_event(received, &event, format);
                received += 1;
            }
            None if pending.is_empty() && transport.pending_commands() == 0 => {
                let ready = transport
                    .is_peer_ready()
                    .map_err(|err| transport_error("ready check failed", err))?;
                if !ready && transport.pending_events() == 0 {
                    break;
                }
            }
            None => {}
        }
    }

    let summary = SummaryOutput::new(cycles, transport.stats(), transport.link().commands());
    print_summary(&summary, format);

    let undelivered = pending.len() + transport.pending_commands();
    if undelivered > 0 {
        return Err(CliError::new(
            FAILURE,
            format!("{undelivered} command(s) undelivered after {cycles} cycles"),
        ));
    }
    Ok(SUCCESS)
}

fn queue_commands(
    transport: &mut Transport<SimulatedRadio>,
    pending: &mut VecDeque<Frame>,
) -> CliResult<()> {
    while let Some(frame) = pending.front() {
        match transport.send(frame) {
            Ok(()) => {
                pending.pop_front();
            }
            Err(err) if err.is_rejection() => {
                tracing::debug!(error = %err, "command deferred");
                break;
            }
            Err(err) => return Err(transport_error("send failed", err)),
        }
    }
    Ok(())
}

fn load_script(path: &Path) -> CliResult<Script> {
    let text = fs::read_to_string(path)
        .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?;
    serde_json::from_str(&text).map_err(|err| {
        CliError::new(
            DATA_INVALID,
            format!("invalid script {}: {err}", path.display()),
        )
    })
}

fn parse_hex(input: &str) -> CliResult<Vec<u8>> {
    let trimmed = input.trim();
    let digits: String = trimmed
        .strip_prefix("0x")
        .unwrap_or(trimmed)
        .chars()
        .filter(|c| !matches!(c, ' ' | ':' | '-' | '_'))
        .collect();

    if !digits.is_ascii() {
        return Err(CliError::new(USAGE, format!("invalid hex payload: {input}")));
    }
    if digits.len() % 2 != 0 {
        return Err(CliError::new(
            USAGE,
            format!("hex payload has an odd number of digits: {input}"),
        ));
    }

    (0..digits.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| CliError::new(USAGE, format!("invalid hex payload: {input}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hex_accepts_separators_and_prefix() {
        assert_eq!(parse_hex("090909").unwrap(), vec![9, 9, 9]);
        assert_eq!(parse_hex("0x0a:0B").unwrap(), vec![0x0A, 0x0B]);
        assert_eq!(parse_hex("81 02").unwrap(), vec![0x81, 0x02]);
        assert!(parse_hex("").unwrap().is_empty());
    }

    #[test]
    fn parse_hex_rejects_bad_input() {
        assert_eq!(parse_hex("abc").unwrap_err().code, USAGE);
        assert_eq!(parse_hex("zz").unwrap_err().code, USAGE);
        assert_eq!(parse_hex("é1").unwrap_err().code, USAGE);
    }

    #[test]
    fn script_fills_defaults() {
        let script: Script = serde_json::from_str(
            r#"{"commands":["0102"],"events":[{"payload":"81"}],"transport":{"overflow_policy":"drop_oldest"}}"#,
        )
        .unwrap();
        assert_eq!(script.commands, vec!["0102"]);
        assert_eq!(script.events[0].status, 0);
        assert!(script.transport.reset_on_init);
        assert!(script.filler.is_none());
    }
}
