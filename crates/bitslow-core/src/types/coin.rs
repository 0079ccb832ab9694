use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Exclusive upper bound for each coin component
pub const COMPONENT_RANGE: u8 = 100;

/// The three component numbers that identify a BitSlow coin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Components {
    pub bit1: u8,
    pub bit2: u8,
    pub bit3: u8,
}

impl Components {
    pub fn new(bit1: u8, bit2: u8, bit3: u8) -> Self {
        Self { bit1, bit2, bit3 }
    }

    /// Display fingerprint of the coin (MD5 of "bit1,bit2,bit3")
    pub fn hash(&self) -> String {
        compute_hash(self.bit1.into(), self.bit2.into(), self.bit3.into())
    }

    pub fn as_array(&self) -> [u8; 3] {
        [self.bit1, self.bit2, self.bit3]
    }
}

impl fmt::Display for Components {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.bit1, self.bit2, self.bit3)
    }
}

/// Hash the raw component columns as stored in the database.
///
/// Produces the lowercase hex MD5 digest of `"{bit1},{bit2},{bit3}"`.
pub fn compute_hash(bit1: i64, bit2: i64, bit3: i64) -> String {
    let digest = Md5::digest(format!("{},{},{}", bit1, bit2, bit3).as_bytes());
    hex::encode(digest)
}
