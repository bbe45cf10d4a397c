//! A non-fungible token registry smart contract.
//!
//! # Description
//! An instance of this contract keeps a registry of unique tokens, each
//! identified by a `u64` token ID, and the address owning each of them.
//! Tokens are created through the `create` and `createFor` functions and are
//! never burned, so a token ID is used at most once.
//!
//! Ownership changes in two ways:
//! - the owner calls `transfer` to hand the token to another address;
//! - the owner calls `approve` to name one address which may later claim the
//!   token with `takeOwnership` (or move it on with `transfer`). An approval
//!   is single use and is cleared on every change of ownership.
//!
//! Every owner has an ordered list of the tokens it holds, in the order they
//! were acquired, which backs the `balanceOf` and `tokensOf` queries.
//!
//! Minting is open to any address by default. An instance can instead be
//! initialized with, or later switched to, a restricted policy in which only
//! the minters and admins of the contract authority may create tokens.
//!
//! Note: The word 'address' refers to either an account address or a
//! contract address.

#![cfg_attr(not(feature = "std"), no_std)]

mod contract;
mod events;
mod external;
mod state;
