// SPDX-FileCopyrightText: 2021 Chorus One AG
// SPDX-License-Identifier: GPL-3.0

//! Provisioning of the state account.
//!
//! Deciding what to do with the account at the derived address is a pure
//! function of the accounts the runtime handed us ([`plan_allocation`]), and
//! only [`provision_state_account`] performs the resulting changes. This way
//! every check happens before the first mutation.

use solana_program::{
    account_info::AccountInfo,
    entrypoint::ProgramResult,
    msg,
    program::{invoke, invoke_signed},
    program_error::ProgramError,
    pubkey::Pubkey,
    rent::Rent,
    system_instruction, system_program,
};

use crate::{
    error::StateError,
    instruction::InitializeAccountsInfo,
    state::{ProgramState, PROGRAM_STATE_LEN},
    token::{ArithmeticError, Lamports},
};

/// What needs to happen to the account at the state address before we can write to it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Allocation {
    /// Nothing lives at the address yet; create the account from scratch.
    Create { lamports: Lamports },

    /// Somebody sent lamports to the address, so it exists as an empty system
    /// account. `create_account` refuses accounts with a balance, so instead
    /// top up, allocate and assign separately.
    Reuse { top_up: Lamports },
}

impl Allocation {
    /// The amount the payer has to transfer for this allocation.
    pub fn funding(&self) -> Lamports {
        match *self {
            Allocation::Create { lamports } => lamports,
            Allocation::Reuse { top_up } => top_up,
        }
    }
}

/// Inspect the account at the state address and decide how to provision it.
///
/// Fails with `AlreadyInitialized` if the account is owned by the program,
/// or if its storage is otherwise already in use.
pub fn plan_allocation(
    program_id: &Pubkey,
    rent: &Rent,
    state_account: &AccountInfo,
) -> Result<Allocation, ProgramError> {
    let rent_exempt = Lamports(rent.minimum_balance(PROGRAM_STATE_LEN));
    let balance = Lamports(state_account.lamports());

    // Only `Initialize` assigns an account to the program, and it writes the
    // initialized state in the same instruction.
    if state_account.owner == program_id {
        match ProgramState::deserialize_state(program_id, state_account) {
            Ok(state) if state.is_initialized() => msg!(
                "State at {} is already initialized, owned by {}.",
                state_account.key,
                state.owner,
            ),
            _ => msg!(
                "State at {} is already owned by the program.",
                state_account.key,
            ),
        }
        return Err(StateError::AlreadyInitialized.into());
    }

    if *state_account.owner != system_program::id() || state_account.data_len() > 0 {
        msg!(
            "Storage at {} is already in use: owned by {}, holding {} bytes.",
            state_account.key,
            state_account.owner,
            state_account.data_len(),
        );
        return Err(StateError::AlreadyInitialized.into());
    }

    if balance == Lamports(0) {
        Ok(Allocation::Create {
            lamports: rent_exempt,
        })
    } else {
        Ok(Allocation::Reuse {
            top_up: rent_exempt.saturating_sub(balance),
        })
    }
}

/// Confirm that the payer can fund the allocation.
///
/// The runtime rejects a transaction that leaves a rent-exempt account
/// rent-paying, so the payer must either spend everything or keep at least
/// the rent-exempt minimum for its own size.
pub fn check_payer_funds(
    rent: &Rent,
    payer: &AccountInfo,
    allocation: &Allocation,
) -> ProgramResult {
    let available = Lamports(payer.lamports());
    let required = allocation.funding();
    let payer_rent_exempt = Lamports(rent.minimum_balance(payer.data_len()));

    let remaining = match available - required {
        Ok(remaining) => remaining,
        Err(ArithmeticError) => {
            msg!(
                "Payer {} holds {}, but {} is needed to fund the state account.",
                payer.key,
                available,
                required,
            );
            return Err(StateError::InsufficientFunds.into());
        }
    };

    if remaining > Lamports(0) && remaining < payer_rent_exempt {
        msg!(
            "Payer {} would be left with {} after funding {}, below its rent-exempt minimum of {}.",
            payer.key,
            remaining,
            required,
            payer_rent_exempt,
        );
        return Err(StateError::InsufficientFunds.into());
    }
    Ok(())
}

/// Carry out `allocation`, so that afterwards the state account is owned by
/// the program, holds `PROGRAM_STATE_LEN` bytes, and is rent-exempt.
///
/// `seeds` must include the bump seed; they sign on behalf of the state address.
pub fn provision_state_account(
    program_id: &Pubkey,
    accounts: &InitializeAccountsInfo,
    allocation: Allocation,
    seeds: &[&[u8]],
) -> ProgramResult {
    match allocation {
        Allocation::Create { lamports } => {
            msg!(
                "Creating account at {}, funded with {} from {}.",
                accounts.state.key,
                lamports,
                accounts.payer.key,
            );
            invoke_signed(
                &system_instruction::create_account(
                    accounts.payer.key,
                    accounts.state.key,
                    lamports.0,
                    PROGRAM_STATE_LEN as u64,
                    program_id,
                ),
                &[
                    accounts.payer.clone(),
                    accounts.state.clone(),
                    accounts.system_program.clone(),
                ],
                &[seeds],
            )
        }
        Allocation::Reuse { top_up } => {
            msg!(
                "Reusing pre-funded account at {}, topping up with {} from {}.",
                accounts.state.key,
                top_up,
                accounts.payer.key,
            );
            transfer_top_up(accounts, top_up)?;
            invoke_signed(
                &system_instruction::allocate(accounts.state.key, PROGRAM_STATE_LEN as u64),
                &[accounts.state.clone(), accounts.system_program.clone()],
                &[seeds],
            )?;
            invoke_signed(
                &system_instruction::assign(accounts.state.key, program_id),
                &[accounts.state.clone(), accounts.system_program.clone()],
                &[seeds],
            )
        }
    }
}

fn transfer_top_up(accounts: &InitializeAccountsInfo, amount: Lamports) -> ProgramResult {
    if amount == Lamports(0) {
        return Ok(());
    }
    invoke(
        &system_instruction::transfer(accounts.payer.key, accounts.state.key, amount.0),
        &[
            accounts.payer.clone(),
            accounts.state.clone(),
            accounts.system_program.clone(),
        ],
    )
}
