//! Calibrated lens positions
//!
//! Aperture commands only accept the stop positions the adapter was
//! calibrated for; focus accepts any step within the ring's travel.

/// Lowest accepted focus step
pub const MIN_FOCUS: u16 = 1;

/// Highest accepted focus step
pub const MAX_FOCUS: u16 = 3071;

/// Calibrated aperture stop
///
/// `V0` is the widest opening and `V11` the narrowest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Aperture {
    V0,
    V1,
    V2,
    V3,
    V4,
    V5,
    V6,
    V7,
    V8,
    V9,
    V10,
    V11,
}

impl Aperture {
    /// Widest opening
    pub const MAX: Aperture = Aperture::V0;

    /// Narrowest opening
    pub const MIN: Aperture = Aperture::V11;

    /// All stops, widest first
    pub const ALL: [Aperture; 12] = [
        Aperture::V0,
        Aperture::V1,
        Aperture::V2,
        Aperture::V3,
        Aperture::V4,
        Aperture::V5,
        Aperture::V6,
        Aperture::V7,
        Aperture::V8,
        Aperture::V9,
        Aperture::V10,
        Aperture::V11,
    ];

    /// Adapter position for this stop
    pub const fn value(self) -> u16 {
        match self {
            Aperture::V0 => 441,
            Aperture::V1 => 512,
            Aperture::V2 => 646,
            Aperture::V3 => 706,
            Aperture::V4 => 857,
            Aperture::V5 => 926,
            Aperture::V6 => 1110,
            Aperture::V7 => 1159,
            Aperture::V8 => 1271,
            Aperture::V9 => 1347,
            Aperture::V10 => 1468,
            Aperture::V11 => 2303,
        }
    }

    /// Stop name as used on the command line
    pub const fn name(self) -> &'static str {
        match self {
            Aperture::V0 => "V0",
            Aperture::V1 => "V1",
            Aperture::V2 => "V2",
            Aperture::V3 => "V3",
            Aperture::V4 => "V4",
            Aperture::V5 => "V5",
            Aperture::V6 => "V6",
            Aperture::V7 => "V7",
            Aperture::V8 => "V8",
            Aperture::V9 => "V9",
            Aperture::V10 => "V10",
            Aperture::V11 => "V11",
        }
    }

    /// Find the stop with exactly this adapter position
    pub fn from_value(value: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.value() == value)
    }

    /// Find a stop by name (`"V3"`, `"max"`, `"MIN"`, ...)
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        if name.eq_ignore_ascii_case("MAX") {
            return Some(Self::MAX);
        }
        if name.eq_ignore_ascii_case("MIN") {
            return Some(Self::MIN);
        }
        Self::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(name))
    }
}
