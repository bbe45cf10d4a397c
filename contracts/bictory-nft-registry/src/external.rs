use commons::ContractTokenId;
use concordium_std::*;

/// Who may create new tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, SchemaType)]
pub enum MintPolicy {
    /// Any address may create a token and assign it to any owner.
    Open,
    /// Only minters and admins of the contract authority may create tokens.
    Restricted,
}

#[derive(Debug, Serialize, SchemaType)]
pub struct InitParams {
    /// Registry name, fixed for the lifetime of the instance.
    pub name: String,
    /// Registry symbol, fixed for the lifetime of the instance.
    pub symbol: String,
    /// Initial mint policy.
    pub mint_policy: MintPolicy,
}

/// The parameter type for the contract function `createFor`.
#[derive(Debug, Serialize, SchemaType)]
pub struct CreateForParams {
    /// Initial owner of the new token.
    pub owner: Address,
    /// ID of the new token.
    pub token_id: ContractTokenId,
}

/// The parameter type for the contract function `approve`.
#[derive(Debug, Serialize, SchemaType)]
pub struct ApproveParams {
    /// Address allowed to claim the token.
    pub approved: Address,
    pub token_id: ContractTokenId,
}

/// The parameter type for the contract function `isApproved`.
#[derive(Debug, Serialize, SchemaType)]
pub struct IsApprovedParams {
    pub address: Address,
    pub token_id: ContractTokenId,
}

/// The parameter type for the contract function `transfer`.
#[derive(Debug, Serialize, SchemaType)]
pub struct TransferParams {
    /// Receiver of the token.
    pub to: Address,
    pub token_id: ContractTokenId,
}
