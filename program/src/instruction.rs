// SPDX-FileCopyrightText: 2021 Chorus One AG
// SPDX-License-Identifier: GPL-3.0

use borsh::{BorshDeserialize, BorshSchema, BorshSerialize};
use solana_program::{
    account_info::AccountInfo,
    instruction::{AccountMeta, Instruction},
    program_error::ProgramError,
    pubkey::Pubkey,
    system_program, sysvar,
};

use crate::state::DEFAULT_RESERVE_RATIO;

/// Caller-chosen values for the new state.
///
/// New fields go at the end, together with a bump of `STATE_VERSION`.
#[repr(C)]
#[derive(Clone, Debug, Eq, PartialEq, BorshSerialize, BorshDeserialize, BorshSchema)]
pub struct InitializeParams {
    /// Share of funds to keep in reserve, in percent.
    pub reserve_ratio: u8,
}

impl Default for InitializeParams {
    fn default() -> Self {
        InitializeParams {
            reserve_ratio: DEFAULT_RESERVE_RATIO,
        }
    }
}

#[repr(C)]
#[derive(Clone, Debug, Eq, PartialEq, BorshSerialize, BorshDeserialize, BorshSchema)]
pub enum StateInstruction {
    /// Create the program state at its derived address, once.
    ///
    /// The payer signs, funds the storage, and becomes the owner.
    Initialize(InitializeParams),

    /// Set the pause flag. Only the owner can call this.
    Pause,

    /// Clear the pause flag. Only the owner can call this.
    Resume,
}

impl StateInstruction {
    pub fn to_vec(&self) -> Vec<u8> {
        // `BorshSerialize::try_to_vec` returns a Result, because it uses
        // `Borsh::serialize`, which takes an arbitrary writer, and which can
        // therefore return an IoError. But when serializing to a vec, there
        // is no IO, so for this particular writer, it should never fail.
        self.try_to_vec()
            .expect("Serializing an Instruction to Vec<u8> does not fail.")
    }
}

accounts_struct! {
    InitializeAccountsMeta, InitializeAccountsInfo {
        pub payer {
            is_signer: true,
            is_writable: true, // It pays for the storage of the state account.
        },
        pub state {
            is_signer: false,
            is_writable: true, // Writable because we need to initialize it.
        },
        const system_program = system_program::id(),
        const sysvar_rent = sysvar::rent::id(),
        const sysvar_clock = sysvar::clock::id(),
    }
}

pub fn initialize(
    program_id: &Pubkey,
    accounts: &InitializeAccountsMeta,
    params: InitializeParams,
) -> Instruction {
    let data = StateInstruction::Initialize(params);
    Instruction {
        program_id: *program_id,
        accounts: accounts.to_vec(),
        data: data.to_vec(),
    }
}

accounts_struct! {
    ChangePauseAccountsMeta, ChangePauseAccountsInfo {
        pub owner {
            is_signer: true,
            is_writable: false,
        },
        pub state {
            is_signer: false,
            is_writable: true,
        },
        const sysvar_clock = sysvar::clock::id(),
    }
}

pub fn pause(program_id: &Pubkey, accounts: &ChangePauseAccountsMeta) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: accounts.to_vec(),
        data: StateInstruction::Pause.to_vec(),
    }
}

pub fn resume(program_id: &Pubkey, accounts: &ChangePauseAccountsMeta) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: accounts.to_vec(),
        data: StateInstruction::Resume.to_vec(),
    }
}
