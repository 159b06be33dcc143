use log::warn;

use crate::consts::*;
use crate::directory::{Confidence, MatchEvent};
use crate::handshake::auth_offset;

/// order-preserving base-64 alphabet used by the record encoding
const ITOA64: &[u8; 64] = b"./0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

// field offsets within the fixed 392-byte record
const HCCAP_MAC1: usize = ESSID_CAPACITY; // 36, access point
const HCCAP_MAC2: usize = 42; // station
const HCCAP_NONCE1: usize = 48; // SNonce, from message 2
const HCCAP_NONCE2: usize = 80; // ANonce, from message 1 or 3
const HCCAP_EAPOL: usize = 112;
const HCCAP_EAPOL_SIZE: usize = 368;
const HCCAP_KEYVER: usize = 372;
const HCCAP_KEYMIC: usize = 376;

/// the output artifact of one correlated handshake; never mutated
/// after construction
#[derive(Debug, Clone)]
pub struct HandshakeRecord {
    pub essid: String,
    pub ap_mac: [u8; 6],
    pub sta_mac: [u8; 6],
    pub key_version: u8,
    pub snonce: [u8; 32],
    pub anonce: [u8; 32],
    pub mic: [u8; 16],
    /// message-2 authentication payload with the integrity-tag bytes
    /// zeroed; an external verifier recomputes the tag over this
    pub eapol: Vec<u8>,
    pub confidence: Confidence,
}

impl HandshakeRecord {
    /// Assemble the record from a match event. Addresses come from
    /// fixed header fields of the two correlated frames; the payload
    /// comes from the raw message-2 bytes at its geometric length.
    pub fn from_event(event: &MatchEvent) -> Option<HandshakeRecord> {
        let msg2 = &event.msg2;
        if msg2.eapol_len > EAPOL_CAPACITY {
            warn!(
                "{}: authentication payload of {} bytes exceeds record capacity, dropping match",
                event.essid, msg2.eapol_len
            );
            return None;
        }

        // message 2 travels to-DS: addr1 is the AP. message 1/3 travel
        // from-DS: addr1 is the station.
        let ap_mac = msg2.msg.header.addr1;
        let sta_mac = event.msg13.header.addr1;

        let start = auth_offset(msg2.msg.qos);
        let mut eapol = vec![0u8; msg2.eapol_len];
        let captured = msg2.msg.frame.len().saturating_sub(start).min(msg2.eapol_len);
        if captured > 0 {
            eapol[..captured].copy_from_slice(&msg2.msg.frame[start..start + captured]);
        }
        // zero the integrity tag; bytes past the payload end stay zero
        let mic_end = (AUTH_MIC_OFFSET + 16).min(eapol.len());
        if AUTH_MIC_OFFSET < mic_end {
            eapol[AUTH_MIC_OFFSET..mic_end].fill(0);
        }

        Some(HandshakeRecord {
            essid: event.essid.clone(),
            ap_mac,
            sta_mac,
            key_version: msg2.msg.auth.key_info.descriptor_version(),
            snonce: msg2.msg.auth.nonce,
            anonce: event.msg13.auth.nonce,
            mic: msg2.msg.auth.mic,
            eapol,
            confidence: event.confidence,
        })
    }

    /// Serialize to the fixed 392-byte layout. The name area is left
    /// zeroed; the name travels in the text line instead.
    pub fn to_hccap(&self) -> [u8; HCCAP_LEN] {
        let mut buf = [0u8; HCCAP_LEN];
        buf[HCCAP_MAC1..HCCAP_MAC1 + 6].copy_from_slice(&self.ap_mac);
        buf[HCCAP_MAC2..HCCAP_MAC2 + 6].copy_from_slice(&self.sta_mac);
        buf[HCCAP_NONCE1..HCCAP_NONCE1 + 32].copy_from_slice(&self.snonce);
        buf[HCCAP_NONCE2..HCCAP_NONCE2 + 32].copy_from_slice(&self.anonce);
        buf[HCCAP_EAPOL..HCCAP_EAPOL + self.eapol.len()].copy_from_slice(&self.eapol);
        buf[HCCAP_EAPOL_SIZE..HCCAP_EAPOL_SIZE + 4]
            .copy_from_slice(&(self.eapol.len() as i32).to_le_bytes());
        buf[HCCAP_KEYVER..HCCAP_KEYVER + 4]
            .copy_from_slice(&(self.key_version as i32).to_le_bytes());
        buf[HCCAP_KEYMIC..HCCAP_KEYMIC + 16].copy_from_slice(&self.mic);
        buf
    }

    /// One output line in the format the verifier loader expects.
    pub fn john_line(&self, source: &str) -> String {
        let hccap = self.to_hccap();
        let mut line = format!(
            "{essid}:$WPAPSK${essid}#{blob}:{sta}:{ap}:{gecos}::WPA",
            essid = self.essid,
            blob = encode_itoa64(&hccap[ESSID_CAPACITY..]),
            sta = aux::mac_dashed(&self.sta_mac),
            ap = aux::mac_dashed(&self.ap_mac),
            gecos = aux::mac_compact(&self.ap_mac),
        );
        if self.key_version > 1 {
            line.push_str(&self.key_version.to_string());
        }
        let verified = match self.confidence {
            Confidence::Tentative => "not ",
            Confidence::Confirmed => "",
        };
        line.push_str(&format!(":password {verified}verified:{source}"));
        line
    }
}

/// Encode bytes with the custom base-64 alphabet: 6 bits per symbol,
/// each 3-byte group yielding 4 symbols and a trailing 2-byte group
/// yielding 3.
pub fn encode_itoa64(bytes: &[u8]) -> String {
    let mut out = String::with_capacity((bytes.len() + 2) / 3 * 4);
    for chunk in bytes.chunks(3) {
        out.push(ITOA64[(chunk[0] >> 2) as usize] as char);
        let b1 = chunk.get(1).copied().unwrap_or(0);
        out.push(ITOA64[(((chunk[0] & 0x03) << 4) | (b1 >> 4)) as usize] as char);
        match chunk.len() {
            3 => {
                out.push(ITOA64[(((b1 & 0x0f) << 2) | (chunk[2] >> 6)) as usize] as char);
                out.push(ITOA64[(chunk[2] & 0x3f) as usize] as char);
            }
            2 => out.push(ITOA64[((b1 & 0x0f) << 2) as usize] as char),
            _ => {}
        }
    }
    out
}
