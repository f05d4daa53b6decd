//! Platform values that recorded results are copied into.
//!
//! Layouts are field-by-field in declaration order; nothing here mirrors the
//! in-memory layout of the platform structures.

use extplay_trace::{TraceStream, Wire};
use extplay_core::PlaybackResult;
use serde::Serialize;

macro_rules! wire_struct {
    ($name:ident { $($field:ident),* $(,)? }) => {
        impl Wire for $name {
            fn decode(stream: &mut TraceStream) -> PlaybackResult<Self> {
                Ok(Self {
                    $( $field: Wire::decode(stream)?, )*
                })
            }

            fn encode(&self, out: &mut Vec<u8>) {
                $( self.$field.encode(out); )*
            }
        }
    };
}

/// Broken-down calendar time as returned by `localtime()`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tm {
    /// Seconds, 0-60
    pub sec: i32,
    /// Minutes, 0-59
    pub min: i32,
    /// Hours, 0-23
    pub hour: i32,
    /// Day of the month, 1-31
    pub mday: i32,
    /// Months since January
    pub mon: i32,
    /// Years since 1900
    pub year: i32,
    /// Days since Sunday
    pub wday: i32,
    /// Days since January 1
    pub yday: i32,
    /// Daylight saving flag
    pub isdst: i32,
}

wire_struct!(Tm { sec, min, hour, mday, mon, year, wday, yday, isdst });

/// Calendar time with millisecond resolution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SystemTime {
    /// Full year
    pub year: u16,
    /// Month, 1-12
    pub month: u16,
    /// Days since Sunday
    pub day_of_week: u16,
    /// Day of the month
    pub day: u16,
    /// Hour
    pub hour: u16,
    /// Minute
    pub minute: u16,
    /// Second
    pub second: u16,
    /// Millisecond
    pub milliseconds: u16,
}

wire_struct!(SystemTime {
    year,
    month,
    day_of_week,
    day,
    hour,
    minute,
    second,
    milliseconds,
});

/// 100-nanosecond interval count split into two words
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FileTime {
    /// Low 32 bits
    pub low: u32,
    /// High 32 bits
    pub high: u32,
}

impl FileTime {
    /// Combined 64-bit tick count
    #[must_use]
    pub fn ticks(&self) -> u64 {
        (u64::from(self.high) << 32) | u64::from(self.low)
    }
}

wire_struct!(FileTime { low, high });

/// Time zone rules; names are UTF-16 code units, NUL padded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TimeZoneInfo {
    /// Minutes west of UTC
    pub bias: i32,
    /// Standard zone name
    pub standard_name: [u16; 32],
    /// Switch to standard time
    pub standard_date: SystemTime,
    /// Extra bias in standard time
    pub standard_bias: i32,
    /// Daylight zone name
    pub daylight_name: [u16; 32],
    /// Switch to daylight time
    pub daylight_date: SystemTime,
    /// Extra bias in daylight time
    pub daylight_bias: i32,
}

impl TimeZoneInfo {
    /// Standard zone name up to its first NUL
    #[must_use]
    pub fn standard_name(&self) -> String {
        utf16_until_nul(&self.standard_name)
    }

    /// Daylight zone name up to its first NUL
    #[must_use]
    pub fn daylight_name(&self) -> String {
        utf16_until_nul(&self.daylight_name)
    }
}

wire_struct!(TimeZoneInfo {
    bias,
    standard_name,
    standard_date,
    standard_bias,
    daylight_name,
    daylight_date,
    daylight_bias,
});

fn utf16_until_nul(units: &[u16]) -> String {
    let end = units.iter().position(|&u| u == 0).unwrap_or(units.len());
    String::from_utf16_lossy(&units[..end])
}

/// Resolved host as returned by `gethostbyname()`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HostEntry {
    /// Official host name
    pub name: String,
    /// Alternate names
    pub aliases: Vec<String>,
    /// Address family
    pub addr_type: i32,
    /// Length of each address
    pub addr_len: i32,
    /// Raw addresses in network order
    pub addrs: Vec<Vec<u8>>,
}

wire_struct!(HostEntry {
    name,
    aliases,
    addr_type,
    addr_len,
    addrs,
});

/// Registration state of a live callback object.
///
/// The player never interprets these values; it only compares them against
/// the recording and writes recorded values back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct CallbackState {
    /// Registration flags
    pub flags: u8,
    /// Callback index
    pub index: i32,
}

impl CallbackState {
    /// Create a snapshot
    #[must_use]
    pub const fn new(flags: u8, index: i32) -> Self {
        Self { flags, index }
    }
}

wire_struct!(CallbackState { flags, index });

#[cfg(test)]
mod tests {
    use super::*;
    use extplay_core::PlayerConfig;
    use extplay_trace::TraceHeader;

    fn decode<T: Wire>(payload: &[u8]) -> T {
        let mut bytes = Vec::new();
        TraceHeader::default().encode(&mut bytes);
        bytes.extend_from_slice(payload);
        let mut stream = TraceStream::from_bytes(bytes, &PlayerConfig::default()).unwrap();
        let value = T::decode(&mut stream).unwrap();
        assert!(stream.is_exhausted());
        value
    }

    #[test]
    fn test_tm_is_nine_words() {
        let tm = Tm {
            sec: 20,
            min: 13,
            hour: 22,
            mday: 14,
            mon: 10,
            year: 123,
            wday: 2,
            yday: 317,
            isdst: 0,
        };
        let mut out = Vec::new();
        tm.encode(&mut out);
        assert_eq!(out.len(), 36);
        assert_eq!(decode::<Tm>(&out), tm);
    }

    #[test]
    fn test_filetime_ticks() {
        let ft = FileTime {
            low: 0x8000_0000,
            high: 0x01D9,
        };
        assert_eq!(ft.ticks(), 0x01D9_8000_0000);
    }

    #[test]
    fn test_time_zone_names() {
        let mut tz = TimeZoneInfo {
            bias: -60,
            ..TimeZoneInfo::default()
        };
        for (slot, unit) in tz.standard_name.iter_mut().zip("CET".encode_utf16()) {
            *slot = unit;
        }
        let mut out = Vec::new();
        tz.encode(&mut out);
        // 4 + 64 + 16 + 4 + 64 + 16 + 4
        assert_eq!(out.len(), 172);

        let decoded = decode::<TimeZoneInfo>(&out);
        assert_eq!(decoded.standard_name(), "CET");
        assert_eq!(decoded.daylight_name(), "");
        assert_eq!(decoded.bias, -60);
    }

    #[test]
    fn test_host_entry_layout() {
        let host = HostEntry {
            name: "master.example.net".into(),
            aliases: vec!["hl2master".into()],
            addr_type: 2,
            addr_len: 4,
            addrs: vec![vec![192, 0, 2, 10], vec![192, 0, 2, 11]],
        };
        let mut out = Vec::new();
        host.encode(&mut out);
        assert_eq!(decode::<HostEntry>(&out), host);
    }

    #[test]
    fn test_callback_state_is_five_bytes() {
        let mut out = Vec::new();
        CallbackState::new(3, 1021).encode(&mut out);
        assert_eq!(out, [3, 0xFD, 0x03, 0, 0]);
    }
}
