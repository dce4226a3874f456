// SPDX-FileCopyrightText: 2021 Chorus One AG
// SPDX-License-Identifier: GPL-3.0

//! Program state processor

use borsh::BorshDeserialize;
use solana_program::{
    account_info::AccountInfo, clock::Clock, entrypoint::ProgramResult, msg,
    program_error::ProgramError, pubkey::Pubkey, rent::Rent, sysvar::Sysvar,
};

use crate::{
    error::StateError,
    find_state_address,
    instruction::{
        ChangePauseAccountsInfo, InitializeAccountsInfo, InitializeParams, StateInstruction,
    },
    logic::{check_payer_funds, plan_allocation, provision_state_account},
    state::{ProgramState, MIN_RESERVE_RATIO},
    STATE_SEED,
};

fn check_params(params: &InitializeParams) -> ProgramResult {
    if params.reserve_ratio < MIN_RESERVE_RATIO || params.reserve_ratio > 100 {
        msg!(
            "Reserve ratio must be between {}% and 100%, but got {}%.",
            MIN_RESERVE_RATIO,
            params.reserve_ratio,
        );
        return Err(StateError::InvalidParameters.into());
    }
    Ok(())
}

/// Create the program state at its derived address.
///
/// Checks, in this order: the payer signed, the state account is at the
/// derived address, it is not initialized yet, and the payer can fund it.
/// Nothing is written before all checks pass.
fn process_initialize(
    program_id: &Pubkey,
    accounts_raw: &[AccountInfo],
    params: InitializeParams,
) -> ProgramResult {
    // Parsing the accounts checks the payer signature first.
    let accounts = InitializeAccountsInfo::try_from_slice(accounts_raw)?;
    let rent = Rent::from_account_info(accounts.sysvar_rent)?;
    let clock = Clock::from_account_info(accounts.sysvar_clock)?;

    let (state_address, state_bump_seed) = find_state_address(program_id);
    if state_address != *accounts.state.key {
        msg!(
            "Expected to initialize state at {}, but {} was provided.",
            state_address,
            accounts.state.key,
        );
        return Err(StateError::AddressMismatch.into());
    }

    let allocation = plan_allocation(program_id, &rent, accounts.state)?;
    check_payer_funds(&rent, accounts.payer, &allocation)?;
    check_params(&params)?;

    let state_seeds = [STATE_SEED, &[state_bump_seed]];
    provision_state_account(program_id, &accounts, allocation, &state_seeds)?;

    let state = ProgramState::new_initialized(
        *accounts.payer.key,
        params.reserve_ratio,
        clock.unix_timestamp,
        state_bump_seed,
    );
    state.save(accounts.state)?;

    msg!(
        "Initialized state at {}, owned by {}, reserve ratio {}%.",
        accounts.state.key,
        state.owner,
        state.reserve_ratio,
    );
    Ok(())
}

/// Set or clear the pause flag of an initialized state.
fn process_change_pause(
    program_id: &Pubkey,
    accounts_raw: &[AccountInfo],
    pause: bool,
) -> ProgramResult {
    let accounts = ChangePauseAccountsInfo::try_from_slice(accounts_raw)?;
    let clock = Clock::from_account_info(accounts.sysvar_clock)?;

    let mut state = ProgramState::deserialize_initialized(program_id, accounts.state)?;
    state.check_owner(accounts.owner)?;

    match (state.is_paused, pause) {
        (true, true) => {
            msg!("State is already paused.");
            return Err(StateError::AlreadyPaused.into());
        }
        (false, false) => {
            msg!("State is not paused, there is nothing to resume.");
            return Err(StateError::NotPaused.into());
        }
        _ => {}
    }

    state.is_paused = pause;
    state.updated_at = clock.unix_timestamp;
    state.save(accounts.state)?;

    msg!(
        "State {} by {}.",
        if pause { "paused" } else { "resumed" },
        accounts.owner.key,
    );
    Ok(())
}

/// Decode a [`StateInstruction`] and run its handler.
pub fn process(program_id: &Pubkey, accounts: &[AccountInfo], input: &[u8]) -> ProgramResult {
    let instruction = match StateInstruction::try_from_slice(input) {
        Ok(instruction) => instruction,
        Err(err) => {
            msg!("Failed to decode instruction: {}", err);
            return Err(ProgramError::InvalidInstructionData);
        }
    };
    match instruction {
        StateInstruction::Initialize(params) => process_initialize(program_id, accounts, params),
        StateInstruction::Pause => process_change_pause(program_id, accounts, true),
        StateInstruction::Resume => process_change_pause(program_id, accounts, false),
    }
}
