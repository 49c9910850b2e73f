// ABOUTME: Sync parameter type definitions and serialization
// ABOUTME: Describes the clock, base time and playback state clients align to

use serde::{Deserialize, Serialize};

/// Current schema version written by this crate
pub const SYNC_INFO_VERSION: u64 = 1;

/// Kind of network clock clients should slave to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockType {
    /// Local system clock, only meaningful on a single machine
    System,
    /// Network clock served by the sync server
    Net,
    /// NTP clock
    Ntp,
    /// PTP (IEEE 1588) clock
    Ptp,
}

impl ClockType {
    /// Wire name of the clock type
    pub fn as_str(&self) -> &'static str {
        match self {
            ClockType::System => "system",
            ClockType::Net => "net",
            ClockType::Ntp => "ntp",
            ClockType::Ptp => "ptp",
        }
    }
}

impl std::str::FromStr for ClockType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "system" => Ok(ClockType::System),
            "net" => Ok(ClockType::Net),
            "ntp" => Ok(ClockType::Ntp),
            "ptp" => Ok(ClockType::Ptp),
            other => Err(format!("unknown clock type '{}'", other)),
        }
    }
}

/// Synchronization parameters handed from the sync server to its clients
///
/// All times are in nanoseconds of the selected clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncParameters {
    /// Schema version
    #[serde(default = "default_version")]
    pub version: u64,
    /// Network clock flavour
    pub clock_type: ClockType,
    /// Address of the network clock provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clock_address: Option<String>,
    /// Port of the network clock provider
    #[serde(default)]
    pub clock_port: u16,
    /// Pipeline base time
    pub base_time: u64,
    /// Offset added to the base time (accumulated pause duration)
    #[serde(default)]
    pub base_time_offset: u64,
    /// Pipeline latency
    #[serde(default)]
    pub latency: u64,
    /// Playback has been stopped
    #[serde(default)]
    pub stopped: bool,
    /// Playback is paused
    #[serde(default)]
    pub paused: bool,
    /// Clock time at which playback was last paused
    #[serde(default)]
    pub last_pause_time: u64,
    /// Media to play
    #[serde(default, skip_serializing_if = "Playlist::is_empty")]
    pub playlist: Playlist,
}

fn default_version() -> u64 {
    SYNC_INFO_VERSION
}

impl SyncParameters {
    /// Create parameters for the given clock and base time
    pub fn new(clock_type: ClockType, base_time: u64) -> Self {
        Self {
            version: SYNC_INFO_VERSION,
            clock_type,
            clock_address: None,
            clock_port: 0,
            base_time,
            base_time_offset: 0,
            latency: 0,
            stopped: false,
            paused: false,
            last_pause_time: 0,
            playlist: Playlist::default(),
        }
    }

    /// Set the network clock provider
    pub fn clock(mut self, address: impl Into<String>, port: u16) -> Self {
        self.clock_address = Some(address.into());
        self.clock_port = port;
        self
    }

    /// Set the pipeline latency
    pub fn latency(mut self, latency: u64) -> Self {
        self.latency = latency;
        self
    }

    /// Set the playlist
    pub fn playlist(mut self, playlist: Playlist) -> Self {
        self.playlist = playlist;
        self
    }

    /// Base time clients should use, including the pause offset
    pub fn effective_base_time(&self) -> u64 {
        self.base_time.saturating_add(self.base_time_offset)
    }
}

/// Ordered list of media URIs and the one currently playing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    /// Index of the current track
    #[serde(default)]
    pub current: usize,
    /// Media URIs
    #[serde(default)]
    pub uris: Vec<String>,
}

impl Playlist {
    /// Create a playlist starting at the first track
    pub fn new(uris: Vec<String>) -> Self {
        Self { current: 0, uris }
    }

    /// URI of the current track
    pub fn current(&self) -> Option<&str> {
        self.uris.get(self.current).map(String::as_str)
    }

    /// Whether the playlist has no tracks
    pub fn is_empty(&self) -> bool {
        self.uris.is_empty()
    }
}
