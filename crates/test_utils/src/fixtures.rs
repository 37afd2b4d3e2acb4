//! Common fixture values

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal_macros::dec;

use core_kernel::{Amount, UserId};

/// Fixed amounts used across the suite
pub struct AmountFixtures;

impl AmountFixtures {
    pub fn expense() -> Amount {
        Amount::new(dec!(150.00))
    }

    pub fn income() -> Amount {
        Amount::new(dec!(3200.00))
    }

    pub fn small() -> Amount {
        Amount::new(dec!(9.90))
    }
}

/// Fixed dates used across the suite
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// An accrual date safely in the past
    pub fn competence_date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()
    }

    /// A cash date after the accrual date
    pub fn settlement_date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()
    }
}

/// A stable actor for operations that need one
pub fn actor() -> UserId {
    UserId::new()
}
