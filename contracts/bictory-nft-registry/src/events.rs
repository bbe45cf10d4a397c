use commons::{ContractTokenId, APPROVAL_TAG, UPDATE_MINT_POLICY_TAG};
use concordium_std::*;

use crate::external::MintPolicy;

/// An untagged event of an owner approving an address to claim a token.
#[derive(Debug, Serialize, SchemaType, PartialEq, Eq)]
pub struct ApprovalEvent {
    /// Current owner of the token.
    pub owner: Address,
    /// Address allowed to claim the token.
    pub approved: Address,
    pub token_id: ContractTokenId,
}

/// Tagged Custom event to be serialized for the event log.
#[derive(Debug, PartialEq, Eq)]
pub enum CustomEvent {
    /// Approving an address to claim a token
    Approval(ApprovalEvent),
    /// Switching the mint policy
    UpdateMintPolicy(MintPolicy),
}

impl Serial for CustomEvent {
    fn serial<W: Write>(&self, out: &mut W) -> Result<(), W::Err> {
        match self {
            CustomEvent::Approval(event) => {
                out.write_u8(APPROVAL_TAG)?;
                event.serial(out)
            }
            CustomEvent::UpdateMintPolicy(policy) => {
                out.write_u8(UPDATE_MINT_POLICY_TAG)?;
                policy.serial(out)
            }
        }
    }
}

impl Deserial for CustomEvent {
    fn deserial<R: Read>(source: &mut R) -> ParseResult<Self> {
        let tag = source.read_u8()?;
        match tag {
            APPROVAL_TAG => ApprovalEvent::deserial(source).map(CustomEvent::Approval),
            UPDATE_MINT_POLICY_TAG => {
                MintPolicy::deserial(source).map(CustomEvent::UpdateMintPolicy)
            }
            _ => Err(ParseError::default()),
        }
    }
}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use concordium_cis2::TokenIdU64;

    #[concordium_test]
    fn test_approval_event_is_tagged() {
        let event = CustomEvent::Approval(ApprovalEvent {
            owner: Address::Account(AccountAddress([0; 32])),
            approved: Address::Account(AccountAddress([1; 32])),
            token_id: TokenIdU64(7),
        });

        let bytes = to_bytes(&event);
        claim_eq!(bytes[0], APPROVAL_TAG);
        claim_eq!(from_bytes::<CustomEvent>(&bytes), Ok(event));
    }

    #[concordium_test]
    fn test_unknown_tag_is_rejected() {
        claim!(from_bytes::<CustomEvent>(&[0u8]).is_err());
    }
}
