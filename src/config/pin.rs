//! Endstop pin descriptors.
//!
//! Pins are written as `port.pin` followed by optional modifiers, e.g.
//! `1.24^!` for port 1 pin 24 with pull-up, inverted. `nc` marks an input
//! that is not connected.

use core::fmt;
use core::str::FromStr;

/// Input bias configured for a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pull {
    /// Pull-up (`^`).
    #[default]
    Up,
    /// Pull-down (`v`).
    Down,
    /// No bias (`-`).
    None,
}

/// Parsed pin descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinDescriptor {
    /// GPIO port number.
    pub port: u8,
    /// Pin number within the port.
    pub pin: u8,
    /// Logic is inverted (`!`): a low level reads as triggered.
    pub inverted: bool,
    /// Input bias.
    pub pull: Pull,
    /// Open-drain output (`o`).
    pub open_drain: bool,
}

/// Why a descriptor could not be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinParseError {
    /// Descriptor is `nc` or empty.
    NotConnected,
    /// Descriptor is not `port.pin[modifiers]`.
    Malformed,
}

impl PinDescriptor {
    /// Parse a descriptor, treating anything unusable as not connected.
    pub fn parse_optional(s: &str) -> Option<Self> {
        s.parse().ok()
    }
}

impl FromStr for PinDescriptor {
    type Err = PinParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("nc") {
            return Err(PinParseError::NotConnected);
        }

        let (port, rest) = s.split_once('.').ok_or(PinParseError::Malformed)?;
        let digits = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        let (pin, modifiers) = rest.split_at(digits);

        let port = port.parse::<u8>().map_err(|_| PinParseError::Malformed)?;
        let pin = pin.parse::<u8>().map_err(|_| PinParseError::Malformed)?;

        let mut descriptor = PinDescriptor {
            port,
            pin,
            inverted: false,
            pull: Pull::default(),
            open_drain: false,
        };

        for m in modifiers.chars() {
            match m {
                '!' => descriptor.inverted = true,
                '^' => descriptor.pull = Pull::Up,
                'v' => descriptor.pull = Pull::Down,
                '-' => descriptor.pull = Pull::None,
                'o' => descriptor.open_drain = true,
                _ => return Err(PinParseError::Malformed),
            }
        }

        Ok(descriptor)
    }
}

impl fmt::Display for PinDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.port, self.pin)?;
        match self.pull {
            Pull::Up => {}
            Pull::Down => write!(f, "v")?,
            Pull::None => write!(f, "-")?,
        }
        if self.open_drain {
            write!(f, "o")?;
        }
        if self.inverted {
            write!(f, "!")?;
        }
        Ok(())
    }
}
