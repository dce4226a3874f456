// SPDX-FileCopyrightText: 2021 Chorus One AG
// SPDX-License-Identifier: GPL-3.0

//! State transition types

use borsh::{BorshDeserialize, BorshSchema, BorshSerialize};
use solana_program::{
    account_info::AccountInfo, borsh0_10::try_from_slice_unchecked, clock::UnixTimestamp,
    entrypoint::ProgramResult, msg, program_error::ProgramError, pubkey::Pubkey,
};

use crate::{error::StateError, STATE_SEED};

/// Size of the serialized [`ProgramState`] struct, in bytes.
///
/// The layout has no variable-length fields, so the allocation size is known
/// before the account exists.
pub const PROGRAM_STATE_LEN: usize = 53;

/// Layout version written by `Initialize`.
pub const STATE_VERSION: u8 = 1;

/// Lowest reserve ratio, in percent, that `Initialize` accepts.
pub const MIN_RESERVE_RATIO: u8 = 20;

/// Reserve ratio, in percent, used when the caller does not pick one.
pub const DEFAULT_RESERVE_RATIO: u8 = MIN_RESERVE_RATIO;

#[derive(Clone, Copy, Debug, Eq, PartialEq, BorshDeserialize, BorshSerialize, BorshSchema)]
pub enum AccountType {
    /// Freshly allocated storage is all zeros, which decodes as this variant.
    Uninitialized,
    Initialized,
}

impl Default for AccountType {
    fn default() -> Self {
        AccountType::Uninitialized
    }
}

#[repr(C)]
#[derive(Clone, Debug, Default, Eq, PartialEq, BorshDeserialize, BorshSerialize, BorshSchema)]
pub struct ProgramState {
    /// Whether `Initialize` has run for this account.
    ///
    /// Invariant: once `Initialized`, no instruction sets it back.
    pub account_type: AccountType,

    /// Version number for the state layout.
    pub version: u8,

    /// The account that paid for and initialized the state. Only the owner
    /// can pause and resume.
    pub owner: Pubkey,

    /// Share of funds to keep in reserve, in percent.
    pub reserve_ratio: u8,

    pub is_paused: bool,

    /// Unix timestamp of the slot in which the state was initialized.
    pub created_at: UnixTimestamp,

    /// Unix timestamp of the last change to the state.
    pub updated_at: UnixTimestamp,

    /// Bump seed for the derived address that the state should live at.
    pub self_bump_seed: u8,
}

impl ProgramState {
    pub const LEN: usize = PROGRAM_STATE_LEN;

    /// Build the state that `Initialize` writes.
    pub fn new_initialized(
        owner: Pubkey,
        reserve_ratio: u8,
        now: UnixTimestamp,
        self_bump_seed: u8,
    ) -> ProgramState {
        ProgramState {
            account_type: AccountType::Initialized,
            version: STATE_VERSION,
            owner,
            reserve_ratio,
            is_paused: false,
            created_at: now,
            updated_at: now,
            self_bump_seed,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.account_type != AccountType::Uninitialized
    }

    /// Decode the state stored in `account`, which must be owned by the program.
    pub fn deserialize_state(
        program_id: &Pubkey,
        account: &AccountInfo,
    ) -> Result<ProgramState, ProgramError> {
        if account.owner != program_id {
            msg!(
                "State account {} is owned by {}, but should be owned by the program ({}).",
                account.key,
                account.owner,
                program_id
            );
            return Err(StateError::InvalidOwner.into());
        }
        if account.data_len() != PROGRAM_STATE_LEN {
            msg!(
                "State account {} holds {} bytes, expected {}.",
                account.key,
                account.data_len(),
                PROGRAM_STATE_LEN,
            );
            return Err(ProgramError::InvalidAccountData);
        }
        let state = try_from_slice_unchecked::<ProgramState>(&account.data.borrow())?;
        Ok(state)
    }

    /// Like [`ProgramState::deserialize_state`], but also require `Initialize` to have run.
    pub fn deserialize_initialized(
        program_id: &Pubkey,
        account: &AccountInfo,
    ) -> Result<ProgramState, ProgramError> {
        let state = ProgramState::deserialize_state(program_id, account)?;
        if !state.is_initialized() {
            msg!("State account {} is not initialized.", account.key);
            return Err(StateError::Uninitialized.into());
        }
        state.check_self_address(program_id, account)?;
        Ok(state)
    }

    pub fn save(&self, account: &AccountInfo) -> ProgramResult {
        // NOTE: If you ended up here because the tests are failing because the
        // runtime complained that an account's size was modified by a program
        // that wasn't its owner, double check that the name passed to
        // ProgramTest matches the name of the crate.
        BorshSerialize::serialize(self, &mut *account.data.borrow_mut())?;
        Ok(())
    }

    /// Confirm that the account address is the derived address where the state should live.
    pub fn check_self_address(&self, program_id: &Pubkey, account: &AccountInfo) -> ProgramResult {
        let address =
            Pubkey::create_program_address(&[STATE_SEED, &[self.self_bump_seed]], program_id);

        match address {
            Ok(address) if address == *account.key => Ok(()),
            Ok(address) => {
                msg!(
                    "Expected the state to live at {}, but found {} instead.",
                    address,
                    account.key,
                );
                Err(StateError::AddressMismatch.into())
            }
            Err(..) => {
                msg!(
                    "Stored bump seed {} does not produce a valid state address.",
                    self.self_bump_seed,
                );
                Err(StateError::AddressMismatch.into())
            }
        }
    }

    /// Confirm that `signer` signed the transaction and is the stored owner.
    pub fn check_owner(&self, signer: &AccountInfo) -> ProgramResult {
        if !signer.is_signer {
            msg!("Owner {} did not sign the transaction.", signer.key);
            return Err(StateError::Unauthorized.into());
        }
        if *signer.key != self.owner {
            msg!(
                "Expected the owner {}, but {} signed instead.",
                self.owner,
                signer.key,
            );
            return Err(StateError::Unauthorized.into());
        }
        Ok(())
    }
}
