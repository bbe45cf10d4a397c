use super::*;

pub type ContractResult<A> = Result<A, CustomContractError>;

/// Contract token ID type.
/// Registry tokens are plain non-negative integers.
pub type ContractTokenId = TokenIdU64;

/// Contract token amount type.
/// Only ever `0` or `1` since every token is unique.
pub type ContractTokenAmount = TokenAmountU64;

/// CIS-2 event specialised to the token types of the registry.
pub type ContractEvent = Cis2Event<ContractTokenId, ContractTokenAmount>;
