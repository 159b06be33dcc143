// EAPOL-KEY FIELD OFFSETS, relative to the start of the 802.1X
// authentication frame (right after the LLC region)
pub const AUTH_VERSION_OFFSET: usize = 0;
pub const AUTH_TYPE_OFFSET: usize = 1;
pub const AUTH_LENGTH_OFFSET: usize = 2;
pub const AUTH_DESCRIPTOR_OFFSET: usize = 4;
pub const AUTH_KEY_INFO_OFFSET: usize = 5;
pub const AUTH_KEY_LEN_OFFSET: usize = 7;
pub const AUTH_REPLAY_OFFSET: usize = 9;
pub const AUTH_NONCE_OFFSET: usize = 17;
pub const AUTH_MIC_OFFSET: usize = 81;
pub const AUTH_KEY_DATA_LEN_OFFSET: usize = 97;
// everything up to and including the key-data length field
pub const AUTH_MIN_LEN: usize = 99;

// RECORD GEOMETRY (fixed-layout handshake record)
pub const ESSID_CAPACITY: usize = 36;
pub const EAPOL_CAPACITY: usize = 256;
pub const HCCAP_LEN: usize = 392;

/// default bound on tracked networks; each entry retains frame buffers
pub const MAX_NETWORKS: usize = 1000;
