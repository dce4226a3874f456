// SPDX-FileCopyrightText: 2021 Chorus One AG
// SPDX-License-Identifier: GPL-3.0

//! A wrapper type to make working with SOL balances safer.
//!
//! Subtracting `Lamports` is checked, so code that computes what a payer has
//! left can not forget about underflow. Balances print in SOL so log messages
//! are readable.

use std::{fmt, ops::Sub};

/// Error returned when a calculation on a balance overflows or underflows.
#[derive(Debug, Eq, PartialEq)]
pub struct ArithmeticError;

pub type Result<T> = std::result::Result<T, ArithmeticError>;

/// An amount of SOL, measured in its minimal unit.
#[derive(Copy, Clone, Default, Eq, Ord, PartialEq, PartialOrd)]
pub struct Lamports(pub u64);

impl Lamports {
    /// Subtract, but clamp at zero instead of failing.
    pub fn saturating_sub(self, other: Lamports) -> Lamports {
        Lamports(self.0.saturating_sub(other.0))
    }
}

impl fmt::Display for Lamports {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}.{:0>9} SOL",
            self.0 / 1_000_000_000,
            self.0 % 1_000_000_000,
        )
    }
}

impl fmt::Debug for Lamports {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl Sub<Lamports> for Lamports {
    type Output = Result<Lamports>;
    fn sub(self, other: Lamports) -> Result<Lamports> {
        self.0
            .checked_sub(other.0)
            .map(Lamports)
            .ok_or(ArithmeticError)
    }
}
