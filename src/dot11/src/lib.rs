//! # dot11
//! `dot11` exposes the 802.11 MAC frame inside a captured record:
//! stripping the optional vendor preamble (Prism, Radiotap, PPI) and
//! classifying the frame as beacon, EAPOL-carrying data, or noise.

mod frame;
mod linklayer;

pub use frame::{
    beacon_ssid, classify, parse_mac_header, FrameControl, FrameKind, MacHeader,
    ETHERTYPE_EAPOL, LLC_LEN, MAC_HEADER_LEN, SSID_CAPACITY, SUBTYPE_BEACON, TAG_SSID,
    TYPE_DATA, TYPE_MANAGEMENT,
};
pub use linklayer::mac_frame_offset;
