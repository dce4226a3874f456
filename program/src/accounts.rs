// SPDX-FileCopyrightText: 2021 Chorus One AG
// SPDX-License-Identifier: GPL-3.0

//! Named account lists for instructions.
//!
//! The runtime hands a program its accounts as a flat slice. The client has
//! to put them in exactly the order the program reads them, and the program
//! has to check every signer and writable bit it relies on. The
//! [`accounts_struct`] macro generates both sides from a single definition,
//! so the two can not drift apart.

/// Implementation detail of [`accounts_struct`].
#[macro_export]
macro_rules! accounts_struct_meta {
    ($pubkey:expr, is_signer: $is_signer:expr, is_writable: true, ) => {
        AccountMeta::new($pubkey, $is_signer)
    };
    ($pubkey:expr, is_signer: $is_signer:expr, is_writable: false, ) => {
        AccountMeta::new_readonly($pubkey, $is_signer)
    };
}

/// Generates a `Meta` struct for the client and an `Info` struct for the program.
///
/// Two kinds of field are accepted:
///
///  * Caller-provided accounts, prefixed with `pub`. Each declares whether it
///    must sign and whether it must be writable.
///
///  * Optionally, accounts at a statically known address, prefixed with
///    `const`, such as the system program or a sysvar. The caller does not
///    provide these in the `Meta` struct; `to_vec` fills them in, and
///    `try_from_slice` confirms the address.
///
/// ```
/// # use siglab::{accounts_struct, accounts_struct_meta};
/// # use solana_program::{pubkey::Pubkey, account_info::AccountInfo, instruction::AccountMeta, program_error::ProgramError, sysvar};
/// accounts_struct! {
///     ExampleAccountsMeta, ExampleAccountsInfo {
///         pub payer { is_signer: true, is_writable: true, },
///         const sysvar_rent = sysvar::rent::id(),
///     }
/// }
/// ```
///
/// `ExampleAccountsMeta::to_vec` returns the `AccountMeta`s in declaration
/// order, and `ExampleAccountsInfo::try_from_slice` reads them back in that
/// order.
///
/// Parsing fails with:
///
///  * `ProgramError::NotEnoughAccountKeys` when the slice is too short.
///  * `StateError::Unauthorized` when an account that must sign did not.
///    Because accounts are checked in declaration order, a missing signature
///    on an earlier account is reported before any problem with a later one.
///  * `StateError::InvalidAccountInfo` when a writable account is read-only,
///    or a const account has the wrong address or flags.
///  * `StateError::TooManyAccountKeys` when accounts are left over.
#[macro_export]
macro_rules! accounts_struct {
    {
        $NameAccountMeta:ident, $NameAccountInfo:ident {
            // The "pub" and "const" prefixes keep the grammar unambiguous:
            // after the identifier alone, Rust could not tell the two apart.
            $(
                pub $var_account:ident {
                    is_signer: $is_signer:expr,
                    is_writable: $is_writable:tt,
                }
            ),*
            $(
                ,
                $(
                    const $const_account:ident = $const_value:expr
                ),*
            )?
            // Require a trailing comma.
            ,
        }
    } => {
        #[derive(Debug)]
        pub struct $NameAccountMeta {
            $(
                pub $var_account: Pubkey
            ),*
        }

        #[derive(Debug)]
        pub struct $NameAccountInfo<'a, 'b> {
            $(
                pub $var_account: &'a AccountInfo<'b>
            ),*
            $(
                ,
                $(
                    pub $const_account: &'a AccountInfo<'b>
                ),*
            )?
        }

        impl $NameAccountMeta {
            #[must_use]
            pub fn to_vec(&self) -> Vec<AccountMeta> {
                vec![
                    $(
                        accounts_struct_meta!(
                            self.$var_account,
                            is_signer: $is_signer,
                            is_writable: $is_writable,
                        )
                    ),*
                    $(
                        ,
                        $(
                            AccountMeta::new_readonly(
                                $const_value,
                                false /* is_signer */
                            )
                        ),*
                    )?
                ]
            }
        }

        impl<'a, 'b> $NameAccountInfo<'a, 'b> {
            pub fn try_from_slice(accounts: &'a [AccountInfo<'b>]) -> Result<$NameAccountInfo<'a, 'b>, ProgramError> {
                use solana_program::msg;
                use $crate::error::StateError;
                let mut accounts_iter = accounts.iter();

                $(
                    let $var_account = match accounts_iter.next() {
                        Some(account) => account,
                        None => {
                            msg!(
                                "Not enough accounts provided. Expected {}.",
                                stringify!($var_account),
                            );
                            return Err(ProgramError::NotEnoughAccountKeys);
                        }
                    };
                    if $is_signer && !$var_account.is_signer {
                        msg!(
                            "Expected {} ({}) to sign the transaction, but it did not.",
                            stringify!($var_account),
                            $var_account.key,
                        );
                        return Err(StateError::Unauthorized.into());
                    }
                    if $is_writable && !$var_account.is_writable {
                        msg!(
                            "Expected {} ({}) to be writable, but it is not.",
                            stringify!($var_account),
                            $var_account.key,
                        );
                        return Err(StateError::InvalidAccountInfo.into());
                    }
                )*

                $(
                    $(
                        let $const_account = match accounts_iter.next() {
                            Some(account) => account,
                            None => {
                                msg!(
                                    "Not enough accounts provided. Expected {}.",
                                    stringify!($const_account),
                                );
                                return Err(ProgramError::NotEnoughAccountKeys);
                            }
                        };
                        // Programs and sysvars are never signers or writable.
                        if $const_account.is_signer || $const_account.is_writable {
                            msg!(
                                "Account {} ({}) is unexpectedly writable or signer.",
                                stringify!($const_account),
                                $const_account.key,
                            );
                            return Err(StateError::InvalidAccountInfo.into());
                        }
                        if *$const_account.key != $const_value {
                            msg!(
                                "Account {} was expected to be set to {}, but found {} instead.",
                                stringify!($const_account),
                                $const_value,
                                $const_account.key,
                            );
                            return Err(StateError::InvalidAccountInfo.into());
                        }
                    )*
                )?

                if let Some(account) = accounts_iter.next() {
                    msg!(
                        "Instruction was passed more accounts than needed, did not expect {}.",
                        account.key,
                    );
                    return Err(StateError::TooManyAccountKeys.into());
                }

                let result = $NameAccountInfo {
                    $( $var_account ),*
                    $(
                        ,
                        $( $const_account ),*
                    )?
                };

                Ok(result)
            }
        }
    }
}
