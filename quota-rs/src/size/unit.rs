use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary storage unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ByteUnit {
    #[serde(rename = "b")]
    Byte,
    KiB,
    MiB,
    GiB,
    TiB,
    PiB,
}

impl ByteUnit {
    /// All units, smallest first
    pub const ALL: [ByteUnit; 6] = [
        ByteUnit::Byte,
        ByteUnit::KiB,
        ByteUnit::MiB,
        ByteUnit::GiB,
        ByteUnit::TiB,
        ByteUnit::PiB,
    ];

    /// Number of bytes in one of this unit
    pub fn factor(&self) -> u64 {
        match self {
            ByteUnit::Byte => 1,
            ByteUnit::KiB => 1 << 10,
            ByteUnit::MiB => 1 << 20,
            ByteUnit::GiB => 1 << 30,
            ByteUnit::TiB => 1 << 40,
            ByteUnit::PiB => 1 << 50,
        }
    }

    /// Short symbol used when formatting
    pub fn symbol(&self) -> &'static str {
        match self {
            ByteUnit::Byte => "b",
            ByteUnit::KiB => "KiB",
            ByteUnit::MiB => "MiB",
            ByteUnit::GiB => "GiB",
            ByteUnit::TiB => "TiB",
            ByteUnit::PiB => "PiB",
        }
    }

    /// Parse a unit symbol, case-insensitive.
    ///
    /// Decimal-looking symbols (`KB`, `MB`, ...) are accepted as aliases of
    /// the binary units.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol.trim().to_ascii_lowercase().as_str() {
            "" | "b" | "byte" | "bytes" => Some(ByteUnit::Byte),
            "k" | "kb" | "kib" => Some(ByteUnit::KiB),
            "m" | "mb" | "mib" => Some(ByteUnit::MiB),
            "g" | "gb" | "gib" => Some(ByteUnit::GiB),
            "t" | "tb" | "tib" => Some(ByteUnit::TiB),
            "p" | "pb" | "pib" => Some(ByteUnit::PiB),
            _ => None,
        }
    }

    /// The finer (smaller) of two units
    pub fn finer(self, other: ByteUnit) -> ByteUnit {
        self.min(other)
    }
}

impl fmt::Display for ByteUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
