use byteorder::{BigEndian, ByteOrder, LittleEndian};

pub const MAC_HEADER_LEN: usize = 24;
/// logical-link-control region preceding the EtherType
pub const LLC_LEN: usize = 8;
pub const ETHERTYPE_EAPOL: u16 = 0x888e;

// FRAME CONTROL
pub const TYPE_MANAGEMENT: u8 = 0;
pub const TYPE_DATA: u8 = 2;
pub const SUBTYPE_BEACON: u8 = 8;
const SUBTYPE_QOS_BIT: u8 = 8;

// BEACON BODY
// fixed part: timestamp (8) + interval (2) + capabilities (2)
const BEACON_FIXED_LEN: usize = 12;
pub const TAG_SSID: u8 = 0;
/// network names at or above this length do not fit the record and
/// are rejected outright
pub const SSID_CAPACITY: usize = 36;

/// decoded 802.11 frame-control field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameControl {
    raw: u16,
}

impl FrameControl {
    pub fn new(raw: u16) -> Self {
        FrameControl { raw }
    }

    pub fn version(&self) -> u8 {
        (self.raw & 0x0003) as u8
    }

    pub fn frame_type(&self) -> u8 {
        ((self.raw >> 2) & 0x0003) as u8
    }

    pub fn subtype(&self) -> u8 {
        ((self.raw >> 4) & 0x000f) as u8
    }

    pub fn to_ds(&self) -> bool {
        self.raw & 0x0100 != 0
    }

    pub fn from_ds(&self) -> bool {
        self.raw & 0x0200 != 0
    }

    /// QoS variants of data subtypes carry 2 extra header bytes
    pub fn qos(&self) -> bool {
        self.subtype() & SUBTYPE_QOS_BIT != 0
    }
}

/// the fixed 24-byte MAC header common to the frames we care about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacHeader {
    pub frame_control: FrameControl,
    pub duration: u16,
    pub addr1: [u8; 6],
    pub addr2: [u8; 6],
    pub addr3: [u8; 6],
    pub sequence: u16,
}

pub fn parse_mac_header(frame: &[u8]) -> Option<MacHeader> {
    if frame.len() < MAC_HEADER_LEN {
        return None;
    }
    let mut addr1 = [0u8; 6];
    let mut addr2 = [0u8; 6];
    let mut addr3 = [0u8; 6];
    addr1.copy_from_slice(&frame[4..10]);
    addr2.copy_from_slice(&frame[10..16]);
    addr3.copy_from_slice(&frame[16..22]);
    Some(MacHeader {
        frame_control: FrameControl::new(LittleEndian::read_u16(&frame[0..2])),
        duration: LittleEndian::read_u16(&frame[2..4]),
        addr1,
        addr2,
        addr3,
        sequence: LittleEndian::read_u16(&frame[22..24]),
    })
}

/// routing decision for one MAC frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Beacon(MacHeader),
    /// a data frame carrying an 802.1X authentication payload
    EapolKey { header: MacHeader, qos: bool },
}

/// Classify a MAC frame, or `None` to discard it.
///
/// Data frames qualify only when exactly one of the DS direction
/// flags is set and the EtherType after the LLC region is the EAPOL
/// value; everything else is silently dropped.
pub fn classify(frame: &[u8]) -> Option<FrameKind> {
    let header = parse_mac_header(frame)?;
    let fc = header.frame_control;

    if fc.frame_type() == TYPE_MANAGEMENT && fc.subtype() == SUBTYPE_BEACON {
        return Some(FrameKind::Beacon(header));
    }
    if fc.frame_type() != TYPE_DATA {
        return None;
    }
    // EAPOL is only ever directly to-DS or directly from-DS
    if fc.to_ds() == fc.from_ds() {
        return None;
    }
    let qos = fc.qos();
    let ethertype_pos = MAC_HEADER_LEN + if qos { 2 } else { 0 } + LLC_LEN - 2;
    if frame.len() < ethertype_pos + 2 {
        return None;
    }
    if BigEndian::read_u16(&frame[ethertype_pos..ethertype_pos + 2]) != ETHERTYPE_EAPOL {
        return None;
    }
    Some(FrameKind::EapolKey { header, qos })
}

/// Walk a beacon's tag list and return the network name, if any.
///
/// Later SSID tags override earlier ones, and a tag whose declared
/// length is at or above [`SSID_CAPACITY`] is rejected rather than
/// truncated. Walking stops at the end of the captured bytes.
pub fn beacon_ssid(frame: &[u8]) -> Option<String> {
    let mut pos = MAC_HEADER_LEN + BEACON_FIXED_LEN;
    let mut ssid = None;
    while pos + 2 <= frame.len() {
        let tag_type = frame[pos];
        let tag_len = frame[pos + 1] as usize;
        if pos + 2 + tag_len > frame.len() {
            break;
        }
        if tag_type == TAG_SSID && tag_len < SSID_CAPACITY {
            ssid = Some(String::from_utf8_lossy(&frame[pos + 2..pos + 2 + tag_len]).into_owned());
        }
        pos += 2 + tag_len;
    }
    ssid
}
