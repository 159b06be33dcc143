use std::collections::HashMap;

use log::{debug, warn};

use crate::consts::MAX_NETWORKS;
use crate::handshake::{EapolKey, MsgRole};
use crate::ExtractError;

/// one captured authentication message, retained in a pending slot
///
/// `frame` holds the MAC frame bytes exactly as captured (the vendor
/// preamble already stripped); `auth` holds the decoded fields. The
/// buffer is never normalized in place, so it doubles as the pristine
/// copy the record encoder needs for the integrity-tag payload.
#[derive(Debug, Clone)]
pub struct PendingMsg {
    pub frame: Vec<u8>,
    pub header: dot11::MacHeader,
    pub qos: bool,
    pub auth: EapolKey,
}

/// a pending message 2, which additionally knows its payload size
#[derive(Debug, Clone)]
pub struct PendingMsg2 {
    pub msg: PendingMsg,
    /// geometric payload length, derived from the wire length rather
    /// than the frame's declared length field
    pub eapol_len: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    /// messages 1 and 2 with equal replay counters; structurally
    /// plausible but unproven
    Tentative,
    /// messages 2 and 3 one replay-counter increment apart; the AP
    /// accepted the client's message 2
    Confirmed,
}

/// a correlated pair of messages, ready for the record encoder
#[derive(Debug, Clone)]
pub struct MatchEvent {
    pub confidence: Confidence,
    pub essid: String,
    pub bssid: [u8; 6],
    pub msg2: PendingMsg2,
    /// message 1 for a tentative match, message 3 for a confirmed one
    pub msg13: PendingMsg,
}

/// per-network tracking state
#[derive(Debug, Clone)]
pub struct NetworkEntry {
    essid: String,
    bssid: [u8; 6],
    msg1: Option<PendingMsg>,
    msg2: Option<PendingMsg2>,
    msg3: Option<PendingMsg>,
    complete: bool,
}

impl NetworkEntry {
    fn new(essid: String, bssid: [u8; 6]) -> Self {
        NetworkEntry {
            essid,
            bssid,
            msg1: None,
            msg2: None,
            msg3: None,
            complete: false,
        }
    }

    pub fn essid(&self) -> &str {
        &self.essid
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Feed one authentication message through the state machine.
    ///
    /// `wire_len` is the frame's on-the-wire length after preamble
    /// stripping; message-2 payload sizing is derived from it. Returns
    /// a match event when replay-counter correlation succeeds.
    pub fn handle_message(
        &mut self,
        msg: PendingMsg,
        wire_len: usize,
        source: &str,
    ) -> Option<MatchEvent> {
        if self.complete {
            return None;
        }
        match msg.auth.key_info.role() {
            MsgRole::One => {
                // a fresh exchange attempt supersedes everything
                self.msg2 = None;
                self.msg3 = None;
                self.msg1 = Some(msg);
                None
            }
            MsgRole::Two => {
                let overhead = dot11::MAC_HEADER_LEN + dot11::LLC_LEN + if msg.qos { 2 } else { 0 };
                if wire_len < overhead {
                    warn!(
                        "{source}: frame len {wire_len}, need at least {overhead}, skipping frame"
                    );
                    return None;
                }
                let pending = PendingMsg2 { msg, eapol_len: wire_len - overhead };
                self.msg3 = None;
                let mut event = None;
                if let Some(msg1) = self.msg1.take() {
                    if msg1.auth.replay_counter == pending.msg.auth.replay_counter {
                        event = Some(MatchEvent {
                            confidence: Confidence::Tentative,
                            essid: self.essid.clone(),
                            bssid: self.bssid,
                            msg2: pending.clone(),
                            msg13: msg1,
                        });
                    }
                }
                // message 1 is consumed whether or not it matched
                self.msg2 = Some(pending);
                event
            }
            MsgRole::Three => {
                self.msg1 = None;
                self.msg3 = Some(msg);
                let mut event = None;
                // both slots are consumed whether or not they match, so a
                // duplicate capture of message 3 cannot re-emit the pair
                if let (Some(msg2), Some(msg3)) = (self.msg2.take(), self.msg3.take()) {
                    if msg2.msg.auth.replay_counter.wrapping_add(1) == msg3.auth.replay_counter {
                        self.complete = true;
                        event = Some(MatchEvent {
                            confidence: Confidence::Confirmed,
                            essid: self.essid.clone(),
                            bssid: self.bssid,
                            msg2,
                            msg13: msg3,
                        });
                    }
                }
                event
            }
            // recognized but deliberately not acted on
            MsgRole::Four => None,
        }
    }
}

/// bounded mapping from access-point address to tracking state
///
/// Entries are added or updated, never removed, for the lifetime of
/// one run; every entry retains frame buffers, hence the bound.
pub struct NetworkDirectory {
    networks: HashMap<[u8; 6], NetworkEntry>,
    limit: usize,
}

impl NetworkDirectory {
    pub fn new() -> Self {
        Self::with_limit(MAX_NETWORKS)
    }

    pub fn with_limit(limit: usize) -> Self {
        NetworkDirectory { networks: HashMap::new(), limit }
    }

    /// Record a beacon sighting. Idempotent for a known address with
    /// an unchanged name; a changed name is adopted in place. Creating
    /// an entry beyond the limit is fatal for the run.
    pub fn record_beacon(&mut self, bssid: [u8; 6], essid: String) -> Result<(), ExtractError> {
        if let Some(entry) = self.networks.get_mut(&bssid) {
            if entry.essid != essid {
                debug!(
                    "network {} renamed {:?} -> {:?}",
                    aux::mac_colon(&bssid),
                    entry.essid,
                    essid
                );
                entry.essid = essid;
            }
            return Ok(());
        }
        if self.networks.len() >= self.limit {
            return Err(ExtractError::TooManyNetworks(self.limit));
        }
        self.networks.insert(bssid, NetworkEntry::new(essid, bssid));
        Ok(())
    }

    pub fn entry_mut(&mut self, bssid: &[u8; 6]) -> Option<&mut NetworkEntry> {
        self.networks.get_mut(bssid)
    }

    pub fn entry(&self, bssid: &[u8; 6]) -> Option<&NetworkEntry> {
        self.networks.get(bssid)
    }

    pub fn len(&self) -> usize {
        self.networks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }
}

impl Default for NetworkDirectory {
    fn default() -> Self {
        Self::new()
    }
}
