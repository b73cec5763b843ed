use std::{fmt, str::FromStr};

use tracing::error;

use crate::driver::Driver;
use crate::error::{Error, Result};

/// 64-bit globally unique hardware identifier of a camera
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Guid(pub u64);

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self.0)
    }
}

impl fmt::LowerHex for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl FromStr for Guid {
    type Err = Error;

    /// Parses a hexadecimal GUID literal, with or without a `0x` prefix
    ///
    /// Whether a camera with this GUID is attached is only known once it is opened.
    ///
    /// # Example
    ///
    /// ```
    /// use dc1394::Guid;
    /// let guid: Guid = "0x00b09d0100a01a9a".parse().unwrap();
    /// assert_eq!(guid, Guid(0x00b09d0100a01a9a));
    /// ```
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        u64::from_str_radix(digits, 16)
            .map(Guid)
            .map_err(|_| Error::InvalidGuid(s.to_string()))
    }
}

/// Identifies the camera a session should open
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Position in a fresh enumeration of the bus
    Index(usize),
    /// Hardware identifier, used as is
    Guid(Guid),
}

impl Default for Selector {
    fn default() -> Self {
        Selector::Index(0)
    }
}

impl From<usize> for Selector {
    fn from(index: usize) -> Self {
        Selector::Index(index)
    }
}

impl From<Guid> for Selector {
    fn from(guid: Guid) -> Self {
        Selector::Guid(guid)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Index(index) => write!(f, "camera #{}", index),
            Selector::Guid(guid) => write!(f, "camera {}", guid),
        }
    }
}

/// Point-in-time snapshot of the cameras attached to the bus
///
/// Each list comes from a fresh bus query and is consumed by iterating it.
#[derive(Debug, Default)]
pub struct DeviceList {
    /// Position in the list
    pos: usize,
    guids: Vec<Guid>,
}

impl DeviceList {
    /// Queries the bus for attached cameras
    pub fn new<D: Driver>(driver: &D) -> Result<Self> {
        Ok(DeviceList {
            pos: 0,
            guids: driver.enumerate()?,
        })
    }

    /// Number of cameras in the snapshot, including ones already iterated over
    pub fn len(&self) -> usize {
        self.guids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guids.is_empty()
    }

    /// Looks up the GUID at `index` in the snapshot
    pub fn get(&self, index: usize) -> Result<Guid> {
        if self.guids.is_empty() {
            error!("No cameras found.");
            return Err(Error::NoCameras);
        }

        self.guids
            .get(index)
            .copied()
            .ok_or(Error::IndexOutOfRange {
                index,
                count: self.guids.len(),
            })
    }
}

impl Iterator for DeviceList {
    type Item = Guid;

    fn next(&mut self) -> Option<Guid> {
        let guid = self.guids.get(self.pos).copied()?;
        self.pos += 1;
        Some(guid)
    }
}

/// Turns a selector into a GUID
///
/// Index selectors enumerate the bus once and drop the snapshot right after the lookup.
pub fn resolve<D: Driver>(driver: &D, selector: Selector) -> Result<Guid> {
    match selector {
        Selector::Guid(guid) => Ok(guid),
        Selector::Index(index) => DeviceList::new(driver)?.get(index),
    }
}
