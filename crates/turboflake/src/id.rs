use core::fmt;

/// A 63-bit Sonyflake-style identifier
///
/// - 39 bits timestamp (10 ms ticks since the configured epoch)
/// - 16 bits machine ID
/// - 8 bits sequence
///
/// ```text
///  Bit Index:  62             24 23             8 7             0
///              +----------------+----------------+--------------+
///  Field:      | timestamp (39) | machine ID (16)| sequence (8) |
///              +----------------+----------------+--------------+
///              |<----- MSB --------- 63 bits -------- LSB ----->|
/// ```
///
/// The value always fits in 63 bits, so it round-trips losslessly through an
/// `i64` and sorts identically under signed and unsigned comparison.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TurboflakeId {
    id: u64,
}

impl TurboflakeId {
    /// Width of the timestamp field in bits. Sized so the field does not
    /// overflow for roughly 174 years past the epoch.
    pub const TIMESTAMP_BITS: u32 = 39;

    /// Width of the machine-id field in bits.
    pub const MACHINE_ID_BITS: u32 = 16;

    /// Width of the sequence field in bits.
    pub const SEQUENCE_BITS: u32 = 8;

    /// Bitmask for extracting the 39-bit timestamp field. Occupies bits 24
    /// through 62.
    pub const TIMESTAMP_MASK: u64 = (1 << Self::TIMESTAMP_BITS) - 1;

    /// Bitmask for extracting the 16-bit machine-id field. Occupies bits 8
    /// through 23.
    pub const MACHINE_ID_MASK: u64 = (1 << Self::MACHINE_ID_BITS) - 1;

    /// Bitmask for extracting the 8-bit sequence field. Occupies bits 0
    /// through 7.
    pub const SEQUENCE_MASK: u64 = (1 << Self::SEQUENCE_BITS) - 1;

    /// Number of bits to shift the timestamp to its correct position (bit 24).
    pub const TIMESTAMP_SHIFT: u32 = Self::MACHINE_ID_BITS + Self::SEQUENCE_BITS;

    /// Number of bits to shift the machine ID to its correct position (bit 8).
    pub const MACHINE_ID_SHIFT: u32 = Self::SEQUENCE_BITS;

    /// Number of bits to shift the sequence field (bit 0).
    pub const SEQUENCE_SHIFT: u32 = 0;

    /// Constructs an ID from its components.
    ///
    /// Each component is masked to its field width before packing.
    ///
    /// # Example
    /// ```
    /// use turboflake::TurboflakeId;
    ///
    /// let id = TurboflakeId::from(1000, 2, 1);
    /// assert_eq!(id.timestamp(), 1000);
    /// assert_eq!(id.machine_id(), 2);
    /// assert_eq!(id.sequence(), 1);
    /// ```
    pub const fn from(timestamp: u64, machine_id: u64, sequence: u64) -> Self {
        let timestamp = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let machine_id = (machine_id & Self::MACHINE_ID_MASK) << Self::MACHINE_ID_SHIFT;
        let sequence = (sequence & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
        Self {
            id: timestamp | machine_id | sequence,
        }
    }

    /// Extracts the timestamp (elapsed ticks) from the packed ID.
    pub const fn timestamp(&self) -> u64 {
        (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
    }

    /// Extracts the machine ID from the packed ID.
    pub const fn machine_id(&self) -> u64 {
        (self.id >> Self::MACHINE_ID_SHIFT) & Self::MACHINE_ID_MASK
    }

    /// Extracts the sequence number from the packed ID.
    pub const fn sequence(&self) -> u64 {
        (self.id >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK
    }

    /// Converts this ID into its raw `u64` representation.
    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Converts a raw `u64` into an ID.
    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }

    /// Returns the ID as a zero-padded 19-digit string, which sorts
    /// lexicographically in the same order as the numeric value.
    pub fn to_padded_string(&self) -> String {
        format!("{:019}", self.id)
    }
}

impl fmt::Display for TurboflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for TurboflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TurboflakeId")
            .field("timestamp", &self.timestamp())
            .field("machine_id", &self.machine_id())
            .field("sequence", &self.sequence())
            .finish()
    }
}

impl From<TurboflakeId> for u64 {
    fn from(id: TurboflakeId) -> Self {
        id.to_raw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_and_extracts_components() {
        let id = TurboflakeId::from(0x7F_FFFF_FFFF, 0xFFFF, 0xFF);
        assert_eq!(id.timestamp(), 0x7F_FFFF_FFFF);
        assert_eq!(id.machine_id(), 0xFFFF);
        assert_eq!(id.sequence(), 0xFF);
        // All fields saturated still fit in 63 bits.
        assert_eq!(id.to_raw() >> 63, 0);
    }

    #[test]
    fn raw_round_trip() {
        let id = TurboflakeId::from(42, 7, 3);
        assert_eq!(TurboflakeId::from_raw(id.to_raw()), id);
        assert_eq!(u64::from(id), id.to_raw());
    }

    #[test]
    fn shift_and_mask_recover_components() {
        let id = TurboflakeId::from(123_456, 0x7F7F, 200);
        let raw = id.to_raw();
        assert_eq!(raw >> TurboflakeId::TIMESTAMP_SHIFT, 123_456);
        assert_eq!(
            (raw >> TurboflakeId::MACHINE_ID_SHIFT) & TurboflakeId::MACHINE_ID_MASK,
            0x7F7F
        );
        assert_eq!(raw & TurboflakeId::SEQUENCE_MASK, 200);
    }

    #[test]
    fn orders_by_timestamp_then_machine_then_sequence() {
        let a = TurboflakeId::from(1, 65535, 255);
        let b = TurboflakeId::from(2, 0, 0);
        assert!(a < b);

        let c = TurboflakeId::from(2, 1, 255);
        let d = TurboflakeId::from(2, 2, 0);
        assert!(c < d);
    }

    #[test]
    fn padded_string_sorts_like_the_value() {
        let a = TurboflakeId::from(1, 2, 3);
        let b = TurboflakeId::from(100_000, 0, 0);
        assert_eq!(a.to_padded_string().len(), 19);
        assert!(a.to_padded_string() < b.to_padded_string());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_round_trip() {
        let id = TurboflakeId::from(99, 1, 5);
        let json = serde_json::to_string(&id).unwrap();
        let back: TurboflakeId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
