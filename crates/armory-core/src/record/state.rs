use serde::{Deserialize, Serialize};

/// Record state bit flags.
pub mod bits {
    pub const REDEEMED: u32 = 1 << 0;
    pub const REWARD_UNAVAILABLE: u32 = 1 << 1;
    pub const OBJECTIVE_NOT_COMPLETED: u32 = 1 << 2;
    pub const OBSCURED: u32 = 1 << 3;
    pub const INVISIBLE: u32 = 1 << 4;
    pub const ENTITLEMENT_UNOWNED: u32 = 1 << 5;
    pub const CAN_EQUIP_TITLE: u32 = 1 << 6;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RecordState {
    pub complete: bool,
    pub unlocked: bool,
    pub visible: bool,
}

impl RecordState {
    /// Decode a record state bitmask.
    ///
    /// A redeemed record is complete even when its not-completed bit is
    /// still set. Bits other than redeemed, not-completed, obscured and
    /// invisible do not affect the result.
    pub fn decode(bitmask: u32) -> Self {
        let redeemed = bitmask & bits::REDEEMED != 0;
        let not_completed = bitmask & bits::OBJECTIVE_NOT_COMPLETED != 0;
        Self {
            complete: !not_completed || redeemed,
            unlocked: bitmask & bits::OBSCURED == 0,
            visible: bitmask & bits::INVISIBLE == 0,
        }
    }
}
