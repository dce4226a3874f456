// SPDX-FileCopyrightText: 2021 Chorus One AG
// SPDX-License-Identifier: GPL-3.0

//! Error types

use num_derive::FromPrimitive;
use solana_program::{decode_error::DecodeError, program_error::ProgramError};
use thiserror::Error;

/// Errors that may be returned by the program.
///
/// Every variant is detected before the program writes to any account, so a
/// transaction that fails with one of these leaves all accounts unchanged.
#[derive(Clone, Copy, Debug, Eq, Error, FromPrimitive, PartialEq)]
pub enum StateError {
    /// An account that must authorize the instruction did not sign it, or
    /// the signer is not the owner stored in the state.
    #[error("Unauthorized")]
    Unauthorized = 0,

    /// The provided state account is not at the expected derived address.
    #[error("AddressMismatch")]
    AddressMismatch = 1,

    /// The state account was initialized before; initialization happens once.
    #[error("AlreadyInitialized")]
    AlreadyInitialized = 2,

    /// The payer cannot fund the storage of the new account.
    #[error("InsufficientFunds")]
    InsufficientFunds = 3,

    /// One of the provided accounts had a mismatch in is_writable or is_signer,
    /// or a fixed account was not at its fixed address.
    #[error("InvalidAccountInfo")]
    InvalidAccountInfo = 4,

    /// More accounts were provided than the program expects.
    #[error("TooManyAccountKeys")]
    TooManyAccountKeys = 5,

    /// The state account is not owned by this program.
    #[error("InvalidOwner")]
    InvalidOwner = 6,

    /// The instruction needs an initialized state, but it is not.
    #[error("Uninitialized")]
    Uninitialized = 7,

    /// The instruction parameters are out of range.
    #[error("InvalidParameters")]
    InvalidParameters = 8,

    #[error("AlreadyPaused")]
    AlreadyPaused = 9,

    #[error("NotPaused")]
    NotPaused = 10,
}

impl From<StateError> for ProgramError {
    fn from(e: StateError) -> Self {
        ProgramError::Custom(e as u32)
    }
}

impl<T> DecodeError<T> for StateError {
    fn type_of() -> &'static str {
        "Siglab State Error"
    }
}
