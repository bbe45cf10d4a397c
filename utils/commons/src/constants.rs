// Tags 255 down to 251 are reserved by CIS-2 for its standard events.

/// Tag for the Custom Approval event.
pub const APPROVAL_TAG: u8 = u8::MAX - 5;

/// Tag for the Custom Update Mint Policy event.
pub const UPDATE_MINT_POLICY_TAG: u8 = u8::MAX - 6;

/// Amount carried by every CIS-2 event of a non-fungible token.
pub const SINGLE_TOKEN: u64 = 1;
