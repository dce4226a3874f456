// SPDX-FileCopyrightText: 2021 Chorus One AG
// SPDX-License-Identifier: GPL-3.0

use solana_program::pubkey::Pubkey;

#[macro_use]
pub mod accounts;
pub mod error;
pub mod instruction;
pub mod logic;
pub mod processor;
pub mod state;
pub mod token;

#[cfg(not(feature = "no-entrypoint"))]
pub mod entrypoint;

/// Seed for the singleton program state account.
pub const STATE_SEED: &[u8] = b"state";

solana_program::declare_id!("8epbA4eCd1ieFndY5y8gZzNqmu91rMUdaY3rDVX5tZKj");

/// Return the program-derived address for the given seeds, and its bump seed.
///
/// This is a pure function of its inputs, so clients can compute the address
/// before sending a transaction, and the program can recompute it to check
/// that the caller passed the right account.
pub fn derive_address(program_id: &Pubkey, seeds: &[&[u8]]) -> (Pubkey, u8) {
    Pubkey::find_program_address(seeds, program_id)
}

/// Return the address at which the program state lives, and its bump seed.
pub fn find_state_address(program_id: &Pubkey) -> (Pubkey, u8) {
    derive_address(program_id, &[STATE_SEED])
}
