use byteorder::{BigEndian, ByteOrder};

use crate::consts::*;

/// decoded key-information bitfield of an EAPOL-Key frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInfo {
    raw: u16,
}

impl KeyInfo {
    pub fn new(raw: u16) -> Self {
        KeyInfo { raw }
    }

    /// key descriptor version (1 = WPA, 2 = WPA2)
    pub fn descriptor_version(&self) -> u8 {
        (self.raw & 0x0007) as u8
    }

    pub fn install(&self) -> bool {
        self.raw & 0x0040 != 0
    }

    pub fn ack(&self) -> bool {
        self.raw & 0x0080 != 0
    }

    pub fn mic_set(&self) -> bool {
        self.raw & 0x0100 != 0
    }

    pub fn secure(&self) -> bool {
        self.raw & 0x0200 != 0
    }

    /// Position of this frame within the 4-message exchange, derived
    /// from header flags alone. Total: every flag combination maps to
    /// exactly one role.
    pub fn role(&self) -> MsgRole {
        if !self.ack() {
            if self.secure() {
                MsgRole::Four
            } else {
                MsgRole::Two
            }
        } else if self.install() {
            MsgRole::Three
        } else {
            MsgRole::One
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MsgRole {
    One,
    Two,
    Three,
    Four,
}

/// byte-order-normalized fields of one EAPOL-Key frame
///
/// The raw frame bytes are kept separately by the owning pending slot;
/// nothing here is ever written back into the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EapolKey {
    pub version: u8,
    pub packet_type: u8,
    /// declared 802.1X body length; unreliable, never used for sizing
    pub declared_len: u16,
    pub descriptor: u8,
    pub key_info: KeyInfo,
    pub key_len: u16,
    pub replay_counter: u64,
    pub nonce: [u8; 32],
    pub mic: [u8; 16],
    pub key_data_len: u16,
}

impl EapolKey {
    /// Decode the authentication frame starting right after the LLC
    /// region. `None` when too few bytes were captured to reach the
    /// fixed fields.
    pub fn decode(auth: &[u8]) -> Option<EapolKey> {
        if auth.len() < AUTH_MIN_LEN {
            return None;
        }
        let mut nonce = [0u8; 32];
        let mut mic = [0u8; 16];
        nonce.copy_from_slice(&auth[AUTH_NONCE_OFFSET..AUTH_NONCE_OFFSET + 32]);
        mic.copy_from_slice(&auth[AUTH_MIC_OFFSET..AUTH_MIC_OFFSET + 16]);
        Some(EapolKey {
            version: auth[AUTH_VERSION_OFFSET],
            packet_type: auth[AUTH_TYPE_OFFSET],
            declared_len: BigEndian::read_u16(&auth[AUTH_LENGTH_OFFSET..AUTH_LENGTH_OFFSET + 2]),
            descriptor: auth[AUTH_DESCRIPTOR_OFFSET],
            key_info: KeyInfo::new(BigEndian::read_u16(
                &auth[AUTH_KEY_INFO_OFFSET..AUTH_KEY_INFO_OFFSET + 2],
            )),
            key_len: BigEndian::read_u16(&auth[AUTH_KEY_LEN_OFFSET..AUTH_KEY_LEN_OFFSET + 2]),
            replay_counter: BigEndian::read_u64(
                &auth[AUTH_REPLAY_OFFSET..AUTH_REPLAY_OFFSET + 8],
            ),
            nonce,
            mic,
            key_data_len: BigEndian::read_u16(
                &auth[AUTH_KEY_DATA_LEN_OFFSET..AUTH_KEY_DATA_LEN_OFFSET + 2],
            ),
        })
    }
}

/// offset of the authentication frame within a MAC frame
pub fn auth_offset(qos: bool) -> usize {
    dot11::MAC_HEADER_LEN + if qos { 2 } else { 0 } + dot11::LLC_LEN
}
