//! Loopback demo — a READY "interrupt" thread and an application thread
//! sharing one transport over a simulated radio.
//!
//! Run with:
//!   cargo run --example loopback

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use acilink::frame::Frame;
use acilink::hal::SimulatedRadio;
use acilink::transport::{Cycle, SharedTransport, Transport, TransportConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut radio = SimulatedRadio::new();
    radio.push_event(0x81, &[0x02, 0x00]);
    radio.push_event(0x84, &[0x0C, 0x00, 0x01]);

    let transport: Transport<SimulatedRadio> = Transport::init(radio, TransportConfig::default())?;
    let shared = Arc::new(SharedTransport::new(transport));
    let stop = Arc::new(AtomicBool::new(false));

    // Stands in for the RDYN falling-edge handler.
    let edge = {
        let shared = Arc::clone(&shared);
        let stop = Arc::clone(&stop);
        thread::spawn(move || -> Result<usize, acilink::transport::TransportError> {
            let mut transfers = 0;
            while !stop.load(Ordering::Relaxed) {
                if shared.is_peer_ready()? {
                    if let Some(Cycle::Transferred(_)) = shared.on_ready_edge()? {
                        transfers += 1;
                    }
                }
                thread::sleep(Duration::from_millis(1));
            }
            Ok(transfers)
        })
    };

    for opcode in [0x09u8, 0x0A, 0x0B] {
        shared.send(&Frame::command(&[opcode])?)?;
    }

    let mut events = 0;
    while events < 2 {
        match shared.try_receive()? {
            Some(event) => {
                events += 1;
                eprintln!(
                    "event status={:#04x} payload={:02x?}",
                    event.status,
                    event.payload()
                );
            }
            None => thread::sleep(Duration::from_millis(1)),
        }
    }

    while shared.with(|t| t.pending_commands())? > 0 {
        thread::sleep(Duration::from_millis(1));
    }

    stop.store(true, Ordering::Relaxed);
    let transfers = edge.join().map_err(|_| "edge thread panicked")??;

    let transport = Arc::try_unwrap(shared)
        .map_err(|_| "transport still shared")?
        .into_inner()?;
    eprintln!(
        "{transfers} edge transfers, radio received {:02x?}",
        transport.link().commands()
    );
    Ok(())
}
