use byteorder::{ByteOrder, LittleEndian};
use capfile::{LINKTYPE_IEEE802_11, LINKTYPE_PPI_HDR, LINKTYPE_PRISM_HEADER, LINKTYPE_RADIOTAP_HDR};
use log::debug;

// Prism: a sentinel in byte 7 means the fixed 144-byte layout was
// truncated to 64 bytes by the logger
const PRISM_SENTINEL_POS: usize = 7;
const PRISM_SENTINEL: u8 = 0x40;
const PRISM_FIXED_SKIP: usize = 64;
const PRISM_LEN_POS: usize = 4;
const PRISM_MIN_SKIP: usize = 8;

const RADIOTAP_LEN_POS: usize = 2;

const PPI_LEN_POS: usize = 2;
const PPI_DLT_POS: usize = 8;

/// Compute the offset at which the 802.11 MAC frame starts inside a
/// captured record, or `None` to skip the frame.
///
/// The length fields inside the preambles are little-endian on the
/// wire regardless of the capture file's byte order.
pub fn mac_frame_offset(link_type: u32, frame: &[u8]) -> Option<usize> {
    let skip = match link_type {
        LINKTYPE_IEEE802_11 => return Some(0),
        LINKTYPE_PRISM_HEADER => {
            if frame.len() < PRISM_LEN_POS + 4 {
                return None;
            }
            let skip = if frame[PRISM_SENTINEL_POS] == PRISM_SENTINEL {
                PRISM_FIXED_SKIP
            } else {
                LittleEndian::read_u32(&frame[PRISM_LEN_POS..PRISM_LEN_POS + 4]) as usize
            };
            if skip < PRISM_MIN_SKIP {
                debug!("implausible prism header length {skip}");
                return None;
            }
            skip
        }
        LINKTYPE_RADIOTAP_HDR => {
            if frame.len() < RADIOTAP_LEN_POS + 2 {
                return None;
            }
            let skip = LittleEndian::read_u16(&frame[RADIOTAP_LEN_POS..RADIOTAP_LEN_POS + 2])
                as usize;
            if skip == 0 {
                return None;
            }
            skip
        }
        LINKTYPE_PPI_HDR => {
            if frame.len() < PPI_LEN_POS + 2 {
                return None;
            }
            let mut skip =
                LittleEndian::read_u16(&frame[PPI_LEN_POS..PPI_LEN_POS + 2]) as usize;
            if skip == 0 {
                return None;
            }
            // Kismet logged broken PPI frames for a period: a 24-byte
            // header that really occupies 32 bytes
            if skip == 24
                && frame.len() >= PPI_DLT_POS + 2
                && LittleEndian::read_u16(&frame[PPI_DLT_POS..PPI_DLT_POS + 2]) == 2
            {
                skip = 32;
            }
            skip
        }
        _ => return None,
    };
    if skip >= frame.len() {
        debug!("preamble length {skip} exceeds frame length {}", frame.len());
        return None;
    }
    Some(skip)
}
