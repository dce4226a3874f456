// SPDX-FileCopyrightText: 2021 Chorus One AG
// SPDX-License-Identifier: GPL-3.0

use solana_program::instruction::Instruction;
use solana_program_test::tokio;
use solana_sdk::signature::{Keypair, Signer};

use siglab::derive_address;
use siglab::error::StateError;
use siglab::instruction::{self, InitializeAccountsMeta, InitializeParams};
use siglab::state::{AccountType, ProgramState, STATE_VERSION};

use crate::assert_state_error;
use crate::context::{send_transaction, Context};

const PAYER_FUNDS: u64 = 10_000_000_000;

#[tokio::test]
async fn test_initialize_creates_state() {
    let mut context = Context::new().await;
    let rent = context.get_rent().await;
    let payer = context.new_funded_keypair(PAYER_FUNDS).await;

    assert!(context.try_get_account(context.state).await.is_none());

    context
        .try_initialize(&payer)
        .await
        .expect("Failed to initialize.");

    let state = context.get_state().await;
    assert_eq!(state.account_type, AccountType::Initialized);
    assert_eq!(state.version, STATE_VERSION);
    assert_eq!(state.owner, payer.pubkey());
    assert!(!state.is_paused);
    assert_eq!(state.created_at, state.updated_at);

    let account = context.get_account(context.state).await;
    let rent_exempt = rent.minimum_balance(ProgramState::LEN);
    assert_eq!(account.owner, siglab::id());
    assert_eq!(account.data.len(), ProgramState::LEN);
    assert_eq!(account.lamports, rent_exempt);

    // The payer funded exactly the storage, the fee payer paid the fee.
    let payer_account = context.get_account(payer.pubkey()).await;
    assert_eq!(payer_account.lamports, PAYER_FUNDS - rent_exempt);
}

#[tokio::test]
async fn test_initialize_stores_custom_params() {
    let mut context = Context::new().await;
    let payer = context.new_funded_keypair(PAYER_FUNDS).await;

    let accounts = InitializeAccountsMeta {
        payer: payer.pubkey(),
        state: context.state,
    };
    context
        .try_initialize_with(accounts, InitializeParams { reserve_ratio: 55 }, vec![&payer])
        .await
        .expect("Failed to initialize.");

    assert_eq!(context.get_state().await.reserve_ratio, 55);
}

#[tokio::test]
async fn test_initialize_twice_fails() {
    let (mut context, owner) = Context::new_initialized().await;
    let before = context.get_account(context.state).await;

    let result = context.try_initialize(&owner).await;
    assert_state_error!(result, StateError::AlreadyInitialized);

    let after = context.get_account(context.state).await;
    assert_eq!(after, before);
}

#[tokio::test]
async fn test_repeated_initialize_succeeds_exactly_once() {
    let mut context = Context::new().await;
    let mut payers: Vec<Keypair> = Vec::new();
    for _ in 0..5 {
        payers.push(context.new_funded_keypair(PAYER_FUNDS).await);
    }

    let mut winner = None;
    let mut snapshot = None;
    for payer in payers.iter() {
        match context.try_initialize(payer).await {
            Ok(()) => {
                assert!(winner.is_none(), "Initialize succeeded more than once.");
                winner = Some(payer.pubkey());
                snapshot = Some(context.get_account(context.state).await);
            }
            result => {
                assert_state_error!(result, StateError::AlreadyInitialized);
                // A rejected attempt costs the would-be payer nothing.
                let account = context.get_account(payer.pubkey()).await;
                assert_eq!(account.lamports, PAYER_FUNDS);
            }
        }
    }

    let winner = winner.expect("Initialize never succeeded.");
    assert_eq!(context.get_state().await.owner, winner);
    assert_eq!(
        Some(context.get_account(context.state).await),
        snapshot,
        "Later attempts must not modify the state."
    );
}

#[tokio::test]
async fn test_initialize_at_wrong_address_fails() {
    let mut context = Context::new().await;
    let payer = context.new_funded_keypair(PAYER_FUNDS).await;
    let (other_address, _) = derive_address(&siglab::id(), &[b"not-the-state"]);

    let accounts = InitializeAccountsMeta {
        payer: payer.pubkey(),
        state: other_address,
    };
    let result = context
        .try_initialize_with(accounts, InitializeParams::default(), vec![&payer])
        .await;
    assert_state_error!(result, StateError::AddressMismatch);

    assert!(context.try_get_account(other_address).await.is_none());
    assert!(context.try_get_account(context.state).await.is_none());
}

#[tokio::test]
async fn test_initialize_without_payer_signature_fails() {
    let mut context = Context::new().await;
    let payer = context.new_funded_keypair(PAYER_FUNDS).await;

    let mut initialize: Instruction = instruction::initialize(
        &siglab::id(),
        &InitializeAccountsMeta {
            payer: payer.pubkey(),
            state: context.state,
        },
        InitializeParams::default(),
    );
    initialize.accounts[0].is_signer = false;

    let result = send_transaction(
        &mut context.context,
        &mut context.nonce,
        &[initialize],
        vec![],
    )
    .await;
    assert_state_error!(result, StateError::Unauthorized);

    assert!(context.try_get_account(context.state).await.is_none());
    let payer_account = context.get_account(payer.pubkey()).await;
    assert_eq!(payer_account.lamports, PAYER_FUNDS);
}

#[tokio::test]
async fn test_initialize_with_poor_payer_fails() {
    let mut context = Context::new().await;
    let rent = context.get_rent().await;

    // Enough to exist as a system account, not enough to fund the state.
    let poor_funds = rent.minimum_balance(0);
    assert!(poor_funds < rent.minimum_balance(ProgramState::LEN));
    let payer = context.new_funded_keypair(poor_funds).await;

    let result = context.try_initialize(&payer).await;
    assert_state_error!(result, StateError::InsufficientFunds);

    assert!(context.try_get_account(context.state).await.is_none());
    let payer_account = context.get_account(payer.pubkey()).await;
    assert_eq!(payer_account.lamports, poor_funds);
}

#[tokio::test]
async fn test_initialize_would_leave_payer_rent_paying() {
    let mut context = Context::new().await;
    let rent = context.get_rent().await;

    // One lamport more than the state needs: after funding, the payer would
    // hold a single lamport, which the runtime does not allow to persist.
    let required = rent.minimum_balance(ProgramState::LEN);
    let payer = context.new_funded_keypair(required + 1).await;

    let result = context.try_initialize(&payer).await;
    assert_state_error!(result, StateError::InsufficientFunds);

    assert!(context.try_get_account(context.state).await.is_none());
    let payer_account = context.get_account(payer.pubkey()).await;
    assert_eq!(payer_account.lamports, required + 1);
}

#[tokio::test]
async fn test_initialize_with_exact_funds_drains_payer() {
    let mut context = Context::new().await;
    let rent = context.get_rent().await;

    let required = rent.minimum_balance(ProgramState::LEN);
    let payer = context.new_funded_keypair(required).await;

    context
        .try_initialize(&payer)
        .await
        .expect("Failed to initialize with exactly the required funds.");

    assert_eq!(context.get_state().await.owner, payer.pubkey());

    // An account with zero lamports is gone from the ledger.
    let payer_lamports = context
        .try_get_account(payer.pubkey())
        .await
        .map_or(0, |account| account.lamports);
    assert_eq!(payer_lamports, 0);
}

#[tokio::test]
async fn test_initialize_prefunded_state_address() {
    let mut context = Context::new().await;
    let rent = context.get_rent().await;

    // Anybody can send lamports to the derived address before it is
    // initialized. That must not block initialization.
    let prefund = rent.minimum_balance(0);
    context.fund(context.state, prefund).await;

    let payer = context.new_funded_keypair(PAYER_FUNDS).await;
    context
        .try_initialize(&payer)
        .await
        .expect("Failed to initialize a pre-funded state address.");

    let state = context.get_state().await;
    assert_eq!(state.owner, payer.pubkey());

    let rent_exempt = rent.minimum_balance(ProgramState::LEN);
    let account = context.get_account(context.state).await;
    assert_eq!(account.owner, siglab::id());
    assert_eq!(account.lamports, rent_exempt);

    // The payer only covered the difference.
    let payer_account = context.get_account(payer.pubkey()).await;
    assert_eq!(payer_account.lamports, PAYER_FUNDS - (rent_exempt - prefund));
}

#[tokio::test]
async fn test_initialize_with_invalid_params_fails() {
    let mut context = Context::new().await;
    let payer = context.new_funded_keypair(PAYER_FUNDS).await;

    for reserve_ratio in [0, 19, 101, 255] {
        let accounts = InitializeAccountsMeta {
            payer: payer.pubkey(),
            state: context.state,
        };
        let result = context
            .try_initialize_with(accounts, InitializeParams { reserve_ratio }, vec![&payer])
            .await;
        assert_state_error!(result, StateError::InvalidParameters);
    }

    assert!(context.try_get_account(context.state).await.is_none());
}
