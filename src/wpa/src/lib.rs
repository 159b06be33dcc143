//! # wpa
//! `wpa` turns classified capture frames into handshake records: it
//! tracks networks seen in beacons, runs the 4-way authentication
//! state machine per network, and serializes each correlated pair of
//! messages as one record line.
//!
//! Correlation is purely structural. Equal replay counters between
//! messages 1 and 2 mark a plausible exchange (tentative); a counter
//! one increment higher on message 3 proves the access point accepted
//! the client's message 2 (confirmed). No cryptography happens here;
//! the emitted record carries everything an external verifier needs
//! to test password candidates.

use std::io::{Read, Write};

use log::info;
use thiserror::Error;

mod consts;
mod directory;
mod handshake;
mod record;

pub use consts::{EAPOL_CAPACITY, ESSID_CAPACITY, HCCAP_LEN, MAX_NETWORKS};
pub use directory::{
    Confidence, MatchEvent, NetworkDirectory, NetworkEntry, PendingMsg, PendingMsg2,
};
pub use handshake::{auth_offset, EapolKey, KeyInfo, MsgRole};
pub use record::{encode_itoa64, HandshakeRecord};

/// conditions that end processing beyond the current frame
#[derive(Debug, Error)]
pub enum ExtractError {
    /// fatal for the whole run: every entry retains frame buffers, so
    /// the directory must stay bounded
    #[error("too many networks tracked (limit {0})")]
    TooManyNetworks(usize),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// per-file outcome counters
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FileSummary {
    pub frames: u64,
    pub tentative: u64,
    pub confirmed: u64,
}

/// Drain one capture file through the extraction pipeline
/// ## Description
/// Pulls frames from the reader one at a time, strips the vendor
/// preamble, classifies the MAC frame, and routes beacons to the
/// network directory and authentication frames to the per-network
/// state machine. Each match event is encoded and written to `out` as
/// one record line. The directory is shared across files so exchanges
/// split over several captures still correlate.
/// ## Example
/// **Basic usage:**
/// ```no_run
///     let mut reader = capfile::Reader::open("capture.pcap").unwrap();
///     let mut directory = wpa::NetworkDirectory::new();
///     let mut out = std::io::stdout();
///     wpa::process_capture(&mut reader, &mut directory, &mut out).unwrap();
/// ```
pub fn process_capture<R: Read, W: Write>(
    reader: &mut capfile::Reader<R>,
    directory: &mut NetworkDirectory,
    out: &mut W,
) -> Result<FileSummary, ExtractError> {
    let mut summary = FileSummary::default();
    let source = reader.source().to_owned();
    let link_type = reader.link_type();

    while let Some(frame) = reader.next_frame() {
        summary.frames += 1;

        let Some(offset) = dot11::mac_frame_offset(link_type, &frame.data) else {
            continue;
        };
        let mac_frame = &frame.data[offset..];

        match dot11::classify(mac_frame) {
            Some(dot11::FrameKind::Beacon(header)) => {
                let essid = dot11::beacon_ssid(mac_frame).unwrap_or_default();
                directory.record_beacon(header.addr3, essid)?;
            }
            Some(dot11::FrameKind::EapolKey { header, qos }) => {
                let start = auth_offset(qos);
                if mac_frame.len() < start {
                    continue;
                }
                let Some(auth) = EapolKey::decode(&mac_frame[start..]) else {
                    continue;
                };
                // a handshake cannot be attributed to an unnamed network
                let Some(entry) = directory.entry_mut(&header.addr3) else {
                    continue;
                };
                let wire_len = (frame.meta.orig_len as usize).saturating_sub(offset);
                let msg = PendingMsg { frame: mac_frame.to_vec(), header, qos, auth };
                if let Some(event) = entry.handle_message(msg, wire_len, &source) {
                    if let Some(record) = HandshakeRecord::from_event(&event) {
                        announce(&event, &frame.meta, &source);
                        writeln!(out, "{}", record.john_line(&source))?;
                        match event.confidence {
                            Confidence::Tentative => summary.tentative += 1,
                            Confidence::Confirmed => summary.confirmed += 1,
                        }
                    }
                }
            }
            None => {}
        }
    }
    Ok(summary)
}

fn announce(event: &MatchEvent, meta: &capfile::FrameMeta, source: &str) {
    let (label, key) = match event.confidence {
        Confidence::Tentative => ("Key1/Key2 hit (hopeful hit)", 1),
        Confidence::Confirmed => ("Key2/Key3 hit (SURE hit)", 3),
    };
    info!("{}, for SSID:{} ({})", label, event.essid, source);
    info!(
        "Dumping key {} at time: {}.{} BSSID {}",
        key,
        meta.rel_sec,
        meta.rel_usec,
        aux::mac_colon(&event.bssid)
    );
}
