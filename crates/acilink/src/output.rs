use std::io::{IsTerminal, Write};

use acilink_frame::Frame;
use acilink_transport::TransportStats;
use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
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
struct EventOutput {
    kind: &'static str,
    index: usize,
    status: u8,
    length: u8,
    payload: String,
}

#[derive(Serialize)]
pub struct SummaryOutput {
    kind: &'static str,
    cycles: usize,
    transfers: u64,
    empty_polls: u64,
    commands_sent: u64,
    events_received: u64,
    events_dropped: u64,
    backpressure_stalls: u64,
    delivered_commands: Vec<String>,
}

impl SummaryOutput {
    pub fn new(cycles: usize, stats: &TransportStats, delivered: &[Vec<u8>]) -> Self {
        Self {
            kind: "summary",
            cycles,
            transfers: stats.transfers,
            empty_polls: stats.empty_polls,
            commands_sent: stats.commands_sent,
            events_received: stats.events_received,
            events_dropped: stats.events_dropped,
            backpressure_stalls: stats.backpressure_stalls,
            delivered_commands: delivered.iter().map(|c| to_hex(c)).collect(),
        }
    }
}

pub fn print_event<const MAX: usize>(index: usize, frame: &Frame<MAX>, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = EventOutput {
                kind: "event",
                index,
                status: frame.status,
                length: frame.length,
                payload: to_hex(frame.payload()),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["#", "STATUS", "LENGTH", "PAYLOAD"])
                .add_row(vec![
                    index.to_string(),
                    format!("{:#04x}", frame.status),
                    frame.length.to_string(),
                    to_hex(frame.payload()),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "event #{index} status={:#04x} length={} payload={}",
                frame.status,
                frame.length,
                to_hex(frame.payload())
            );
        }
        OutputFormat::Raw => {
            print_raw(frame.payload());
        }
    }
}

pub fn print_summary(summary: &SummaryOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(summary).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["METRIC", "VALUE"])
                .add_row(vec!["cycles".to_string(), summary.cycles.to_string()])
                .add_row(vec!["transfers".to_string(), summary.transfers.to_string()])
                .add_row(vec!["empty polls".to_string(), summary.empty_polls.to_string()])
                .add_row(vec![
                    "commands sent".to_string(),
                    summary.commands_sent.to_string(),
                ])
                .add_row(vec![
                    "events received".to_string(),
                    summary.events_received.to_string(),
                ])
                .add_row(vec![
                    "backpressure stalls".to_string(),
                    summary.backpressure_stalls.to_string(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "cycles={} transfers={} empty_polls={} commands_sent={} events_received={} stalls={}",
                summary.cycles,
                summary.transfers,
                summary.empty_polls,
                summary.commands_sent,
                summary.events_received,
                summary.backpressure_stalls
            );
            for command in &summary.delivered_commands {
                println!("radio got command {command}");
            }
        }
        OutputFormat::Raw => {}
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

pub fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_is_lowercase_and_padded() {
        assert_eq!(to_hex(&[0x09, 0xAB, 0x00]), "09ab00");
        assert_eq!(to_hex(&[]), "");
    }

    #[test]
    fn summary_serializes_kind() {
        let stats = TransportStats {
            transfers: 2,
            ..TransportStats::default()
        };
        let json = serde_json::to_string(&SummaryOutput::new(3, &stats, &[vec![9, 9]])).unwrap();
        assert!(json.contains("\"kind\":\"summary\""));
        assert!(json.contains("\"delivered_commands\":[\"0909\"]"));
    }
}
