//! Types shared by the Bictory registry contracts: the error type, custom
//! event tags, token id aliases and the admin/minter authority lists.

#![cfg_attr(not(feature = "std"), no_std)]
use concordium_cis2::*;
use concordium_std::*;

mod authority;
mod constants;
mod errors;
mod types;

pub use self::{authority::*, constants::*, errors::*, types::*};
