use commons::*;
use concordium_cis2::{Cis2Event, MintEvent, TransferEvent};
use concordium_std::*;

use crate::events::{ApprovalEvent, CustomEvent};
use crate::external::{InitParams, MintPolicy};

/// The contract state.
#[derive(Serial, DeserialWithState)]
#[concordium(state_parameter = "S")]
pub struct State<S: HasStateApi> {
    /// Addresses authorized to update the contract and to mint under
    /// restricted policy.
    pub authority: Authority<S>,
    /// Who may create new tokens.
    pub mint_policy: MintPolicy,
    /// Registry name.
    pub name: String,
    /// Registry symbol.
    pub symbol: String,
    /// Owner of every existing token.
    pub owners: StateMap<ContractTokenId, Address, S>,
    /// Tokens held by each address, in the order they were acquired.
    pub owned_tokens: StateMap<Address, Vec<ContractTokenId>, S>,
    /// The single address allowed to claim a token, if any.
    pub approvals: StateMap<ContractTokenId, Address, S>,
    /// Number of tokens ever created.
    pub total_supply: u64,
}

// Functions for creating, updating and querying the contract state.
//
// Every update checks all of its preconditions before the first write, so a
// rejected call leaves the state as it was.
impl<S: HasStateApi> State<S> {
    /// Creates a new state with no tokens.
    pub fn new(
        state_builder: &mut StateBuilder<S>,
        params: InitParams,
        origin: AccountAddress,
    ) -> Self {
        State {
            authority: Authority::new(state_builder, Address::Account(origin)),
            mint_policy: params.mint_policy,
            name: params.name,
            symbol: params.symbol,
            owners: state_builder.new_map(),
            owned_tokens: state_builder.new_map(),
            approvals: state_builder.new_map(),
            total_supply: 0,
        }
    }

    /// Check if `sender` is allowed to create tokens under the current policy.
    pub fn may_create(&self, sender: &Address) -> bool {
        match self.mint_policy {
            MintPolicy::Open => true,
            MintPolicy::Restricted => self.authority.has_minter_rights(sender),
        }
    }

    /// Register a new token owned by `owner`.
    /// Results in an error if the
    /// - mint policy does not allow `sender` to create tokens
    /// - token ID is already registered
    pub fn create(
        &mut self,
        sender: &Address,
        token_id: ContractTokenId,
        owner: Address,
    ) -> ContractResult<ContractEvent> {
        ensure!(self.may_create(sender), CustomContractError::Unauthorized);
        ensure!(
            self.owners.get(&token_id).is_none(),
            CustomContractError::AlreadyExists
        );

        self.owners.insert(token_id, owner);
        self.push_token(owner, token_id);
        self.total_supply += 1;

        Ok(Cis2Event::Mint(MintEvent {
            token_id,
            amount: ContractTokenAmount::from(SINGLE_TOKEN),
            owner,
        }))
    }

    /// Number of tokens held by `owner`.
    pub fn balance_of(&self, owner: &Address) -> u64 {
        self.owned_tokens
            .get(owner)
            .map_or(0, |tokens| tokens.len() as u64)
    }

    pub fn total_supply(&self) -> u64 {
        self.total_supply
    }

    /// Tokens held by `owner` in acquisition order.
    pub fn tokens_of(&self, owner: &Address) -> Vec<ContractTokenId> {
        self.owned_tokens
            .get(owner)
            .map_or_else(Vec::new, |tokens| tokens.to_vec())
    }

    pub fn owner_of(&self, token_id: &ContractTokenId) -> ContractResult<Address> {
        self.owners
            .get(token_id)
            .map(|owner| *owner)
            .ok_or(CustomContractError::TokenNotFound)
    }

    /// The address approved to claim the token, if any.
    pub fn approved_of(&self, token_id: &ContractTokenId) -> ContractResult<Option<Address>> {
        ensure!(
            self.owners.get(token_id).is_some(),
            CustomContractError::TokenNotFound
        );

        Ok(self.approvals.get(token_id).map(|approved| *approved))
    }

    /// False for unknown tokens and tokens without approval.
    pub fn is_approved(&self, address: &Address, token_id: &ContractTokenId) -> bool {
        self.approvals
            .get(token_id)
            .map_or(false, |approved| *approved == *address)
    }

    /// Allow `approved` to claim the token, replacing any earlier approval.
    /// Results in an error if the
    /// - token ID does not exist
    /// - sender is not the owner of the token
    /// - approved address is the owner itself
    pub fn approve(
        &mut self,
        sender: &Address,
        approved: Address,
        token_id: ContractTokenId,
    ) -> ContractResult<CustomEvent> {
        let owner = self.owner_of(&token_id)?;
        ensure_eq!(owner, *sender, CustomContractError::NotOwner);
        ensure!(approved != owner, CustomContractError::SelfApproval);

        self.approvals.insert(token_id, approved);

        Ok(CustomEvent::Approval(ApprovalEvent {
            owner,
            approved,
            token_id,
        }))
    }

    /// Move the token to the approved `sender`.
    /// Results in an error if the
    /// - token ID does not exist
    /// - sender is not the approved address of the token
    pub fn take_ownership(
        &mut self,
        sender: &Address,
        token_id: ContractTokenId,
    ) -> ContractResult<ContractEvent> {
        let owner = self.owner_of(&token_id)?;
        ensure!(
            self.is_approved(sender, &token_id),
            CustomContractError::NotApproved
        );

        Ok(self.move_token(token_id, owner, *sender))
    }

    /// Move the token to `to` on behalf of its owner.
    /// Results in an error if the
    /// - token ID does not exist
    /// - sender is neither the owner nor the approved address of the token
    /// - `to` already owns the token
    pub fn transfer(
        &mut self,
        sender: &Address,
        to: Address,
        token_id: ContractTokenId,
    ) -> ContractResult<ContractEvent> {
        let owner = self.owner_of(&token_id)?;
        ensure!(
            owner == *sender || self.is_approved(sender, &token_id),
            CustomContractError::NotOwner
        );
        ensure!(to != owner, CustomContractError::SelfTransfer);

        Ok(self.move_token(token_id, owner, to))
    }

    /// Switch the mint policy. Only admins can do this.
    pub fn update_mint_policy(
        &mut self,
        sender: &Address,
        mint_policy: MintPolicy,
    ) -> ContractResult<CustomEvent> {
        ensure!(
            self.authority.has_admin_rights(sender),
            CustomContractError::Unauthorized
        );

        self.mint_policy = mint_policy;

        Ok(CustomEvent::UpdateMintPolicy(mint_policy))
    }

    /// Preconditions are checked by the callers.
    fn move_token(
        &mut self,
        token_id: ContractTokenId,
        from: Address,
        to: Address,
    ) -> ContractEvent {
        self.approvals.remove(&token_id);

        if let Some(mut from_tokens) = self.owned_tokens.get_mut(&from) {
            from_tokens.retain(|owned| *owned != token_id);
        }
        self.push_token(to, token_id);
        self.owners.insert(token_id, to);

        Cis2Event::Transfer(TransferEvent {
            token_id,
            amount: ContractTokenAmount::from(SINGLE_TOKEN),
            from,
            to,
        })
    }

    #[inline(always)]
    fn push_token(&mut self, owner: Address, token_id: ContractTokenId) {
        let mut tokens = self.owned_tokens.entry(owner).or_insert_with(Vec::new);
        tokens.push(token_id);
    }
}

#[concordium_cfg_test]
impl<S: HasStateApi> State<S> {
    /// Claim that ownership, enumeration lists, supply and approvals agree.
    pub fn claim_consistent(&self) {
        let mut listed = 0u64;
        let mut holders = Vec::new();
        for (owner, tokens) in self.owned_tokens.iter() {
            for token_id in tokens.iter() {
                claim_eq!(
                    self.owner_of(token_id),
                    Ok(*owner),
                    "Listed token must be owned by the list holder"
                );
                claim_eq!(
                    tokens.iter().filter(|t| *t == token_id).count(),
                    1,
                    "Token must be listed once"
                );
            }
            holders.push((*owner, tokens.len() as u64));
            listed += tokens.len() as u64;
        }
        for (owner, count) in holders {
            claim_eq!(self.balance_of(&owner), count);
        }

        let mut minted = 0u64;
        for (token_id, owner) in self.owners.iter() {
            minted += 1;
            claim!(
                self.tokens_of(&*owner).contains(&*token_id),
                "Owned token must be listed"
            );
            claim!(
                !self.is_approved(&*owner, &*token_id),
                "Owner must never be the approved address"
            );
        }

        for (token_id, _) in self.approvals.iter() {
            claim!(
                self.owners.get(&*token_id).is_some(),
                "Approval for unknown token"
            );
        }

        claim_eq!(listed, self.total_supply, "Supply must match the lists");
        claim_eq!(minted, self.total_supply, "Supply must match ownership");
    }
}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use concordium_cis2::TokenIdU64;
    use test_infrastructure::*;

    const ADMIN: AccountAddress = AccountAddress([0u8; 32]);
    const ADDRESS_ADMIN: Address = Address::Account(ADMIN);
    const ADDRESS_A: Address = Address::Account(AccountAddress([1u8; 32]));
    const ADDRESS_B: Address = Address::Account(AccountAddress([2u8; 32]));
    const ADDRESS_C: Address = Address::Account(AccountAddress([3u8; 32]));
    const CONTRACT_D: Address = Address::Contract(ContractAddress {
        index: 4,
        subindex: 0,
    });

    fn token(id: u64) -> ContractTokenId {
        TokenIdU64(id)
    }

    fn new_state<S: HasStateApi>(
        state_builder: &mut StateBuilder<S>,
        mint_policy: MintPolicy,
    ) -> State<S> {
        State::new(
            state_builder,
            InitParams {
                name: String::from("FooBarCoin"),
                symbol: String::from("FBC"),
                mint_policy,
            },
            ADMIN,
        )
    }

    /// Tokens 0..=4 owned by `ADDRESS_A` and 5..=9 owned by `ADDRESS_B`.
    fn minted_state<S: HasStateApi>(state_builder: &mut StateBuilder<S>) -> State<S> {
        let mut state = new_state(state_builder, MintPolicy::Open);
        for id in 0..5 {
            state
                .create(&ADDRESS_A, token(id), ADDRESS_A)
                .expect_report("Failed to create token for A");
        }
        for id in 5..10 {
            state
                .create(&ADDRESS_A, token(id), ADDRESS_B)
                .expect_report("Failed to create token for B");
        }
        state
    }

    #[concordium_test]
    fn test_new_state_is_empty() {
        let mut state_builder = TestStateBuilder::new();
        let state = new_state(&mut state_builder, MintPolicy::Open);

        claim_eq!(state.total_supply(), 0);
        claim_eq!(state.balance_of(&ADDRESS_A), 0);
        claim_eq!(state.tokens_of(&ADDRESS_A), Vec::<ContractTokenId>::new());
        claim_eq!(state.name, "FooBarCoin");
        claim_eq!(state.symbol, "FBC");
        state.claim_consistent();
    }

    #[concordium_test]
    fn test_create() {
        let mut state_builder = TestStateBuilder::new();
        let mut state = new_state(&mut state_builder, MintPolicy::Open);

        for id in 0..5 {
            let event = state
                .create(&ADDRESS_A, token(id), ADDRESS_A)
                .expect_report("Failed to create token");
            claim_eq!(
                to_bytes(&event),
                to_bytes(&ContractEvent::Mint(MintEvent {
                    token_id: token(id),
                    amount: ContractTokenAmount::from(1),
                    owner: ADDRESS_A,
                }))
            );
            claim_eq!(state.total_supply(), id + 1);
        }

        claim_eq!(state.balance_of(&ADDRESS_A), 5);
        claim_eq!(state.tokens_of(&ADDRESS_A), (0..5).map(token).collect::<Vec<_>>());
        claim_eq!(state.approved_of(&token(0)), Ok(None));
        state.claim_consistent();
    }

    #[concordium_test]
    fn test_create_existing_token_is_rejected() {
        let mut state_builder = TestStateBuilder::new();
        let mut state = minted_state(&mut state_builder);

        let result = state.create(&ADDRESS_C, token(3), ADDRESS_C);

        claim_eq!(
            result.map(|_| ()),
            Err(CustomContractError::AlreadyExists)
        );
        claim_eq!(state.owner_of(&token(3)), Ok(ADDRESS_A));
        claim_eq!(state.balance_of(&ADDRESS_C), 0);
        claim_eq!(state.total_supply(), 10);
        state.claim_consistent();
    }

    #[concordium_test]
    fn test_owner_of() {
        let mut state_builder = TestStateBuilder::new();
        let state = minted_state(&mut state_builder);

        claim_eq!(state.owner_of(&token(0)), Ok(ADDRESS_A));
        claim_eq!(state.owner_of(&token(5)), Ok(ADDRESS_B));
        claim_eq!(
            state.owner_of(&token(999)),
            Err(CustomContractError::TokenNotFound)
        );
    }

    #[concordium_test]
    fn test_approve_and_take_ownership() {
        let mut state_builder = TestStateBuilder::new();
        let mut state = new_state(&mut state_builder, MintPolicy::Open);
        state
            .create(&ADDRESS_A, token(0), ADDRESS_A)
            .expect_report("Failed to create token");

        let event = state
            .approve(&ADDRESS_A, ADDRESS_B, token(0))
            .expect_report("Failed to approve");
        claim_eq!(
            event,
            CustomEvent::Approval(ApprovalEvent {
                owner: ADDRESS_A,
                approved: ADDRESS_B,
                token_id: token(0),
            })
        );
        claim!(state.is_approved(&ADDRESS_B, &token(0)));
        claim_eq!(state.approved_of(&token(0)), Ok(Some(ADDRESS_B)));

        let event = state
            .take_ownership(&ADDRESS_B, token(0))
            .expect_report("Failed to take ownership");
        claim_eq!(
            to_bytes(&event),
            to_bytes(&ContractEvent::Transfer(TransferEvent {
                token_id: token(0),
                amount: ContractTokenAmount::from(1),
                from: ADDRESS_A,
                to: ADDRESS_B,
            }))
        );

        claim_eq!(state.owner_of(&token(0)), Ok(ADDRESS_B));
        claim_eq!(state.balance_of(&ADDRESS_A), 0);
        claim_eq!(state.balance_of(&ADDRESS_B), 1);
        claim!(!state.is_approved(&ADDRESS_B, &token(0)));
        state.claim_consistent();

        // The approval was used up
        claim_eq!(
            state.take_ownership(&ADDRESS_B, token(0)).map(|_| ()),
            Err(CustomContractError::NotApproved)
        );
        // and the previous owner has no claim left
        claim_eq!(
            state.take_ownership(&ADDRESS_A, token(0)).map(|_| ()),
            Err(CustomContractError::NotApproved)
        );
        claim_eq!(state.owner_of(&token(0)), Ok(ADDRESS_B));
    }

    #[concordium_test]
    fn test_take_ownership_without_approval() {
        let mut state_builder = TestStateBuilder::new();
        let mut state = minted_state(&mut state_builder);

        claim_eq!(
            state.take_ownership(&ADDRESS_B, token(0)).map(|_| ()),
            Err(CustomContractError::NotApproved)
        );
        claim_eq!(
            state.take_ownership(&ADDRESS_B, token(999)).map(|_| ()),
            Err(CustomContractError::TokenNotFound)
        );
        state.claim_consistent();
    }

    #[concordium_test]
    fn test_approve_rejections() {
        let mut state_builder = TestStateBuilder::new();
        let mut state = minted_state(&mut state_builder);

        claim_eq!(
            state.approve(&ADDRESS_A, ADDRESS_B, token(999)),
            Err(CustomContractError::TokenNotFound)
        );
        claim_eq!(
            state.approve(&ADDRESS_C, ADDRESS_B, token(0)),
            Err(CustomContractError::NotOwner)
        );
        claim_eq!(
            state.approve(&ADDRESS_A, ADDRESS_A, token(0)),
            Err(CustomContractError::SelfApproval)
        );
        claim_eq!(state.approved_of(&token(0)), Ok(None));
        claim_eq!(
            state.approved_of(&token(999)),
            Err(CustomContractError::TokenNotFound)
        );
        claim!(!state.is_approved(&ADDRESS_B, &token(999)));
    }

    #[concordium_test]
    fn test_new_approval_replaces_previous() {
        let mut state_builder = TestStateBuilder::new();
        let mut state = minted_state(&mut state_builder);

        state
            .approve(&ADDRESS_A, ADDRESS_B, token(1))
            .expect_report("Failed to approve B");
        state
            .approve(&ADDRESS_A, CONTRACT_D, token(1))
            .expect_report("Failed to approve D");

        claim!(!state.is_approved(&ADDRESS_B, &token(1)));
        claim!(state.is_approved(&CONTRACT_D, &token(1)));
        claim_eq!(
            state.take_ownership(&ADDRESS_B, token(1)).map(|_| ()),
            Err(CustomContractError::NotApproved)
        );

        state
            .take_ownership(&CONTRACT_D, token(1))
            .expect_report("Contract failed to claim token");
        claim_eq!(state.owner_of(&token(1)), Ok(CONTRACT_D));
        state.claim_consistent();
    }

    #[concordium_test]
    fn test_transfer() {
        let mut state_builder = TestStateBuilder::new();
        let mut state = minted_state(&mut state_builder);

        let event = state
            .transfer(&ADDRESS_A, ADDRESS_C, token(2))
            .expect_report("Failed to transfer");
        claim_eq!(
            to_bytes(&event),
            to_bytes(&ContractEvent::Transfer(TransferEvent {
                token_id: token(2),
                amount: ContractTokenAmount::from(1),
                from: ADDRESS_A,
                to: ADDRESS_C,
            }))
        );

        claim_eq!(state.owner_of(&token(2)), Ok(ADDRESS_C));
        claim_eq!(state.balance_of(&ADDRESS_A), 4);
        claim_eq!(state.balance_of(&ADDRESS_C), 1);
        // Remaining tokens keep their order
        claim_eq!(
            state.tokens_of(&ADDRESS_A),
            vec![token(0), token(1), token(3), token(4)]
        );
        claim_eq!(state.total_supply(), 10);
        state.claim_consistent();

        // Previous owner can't move it any more
        claim_eq!(
            state.transfer(&ADDRESS_A, ADDRESS_B, token(2)).map(|_| ()),
            Err(CustomContractError::NotOwner)
        );
    }

    #[concordium_test]
    fn test_transfer_appends_to_receiver_list() {
        let mut state_builder = TestStateBuilder::new();
        let mut state = minted_state(&mut state_builder);

        state
            .transfer(&ADDRESS_A, ADDRESS_B, token(0))
            .expect_report("Failed to transfer");

        claim_eq!(
            state.tokens_of(&ADDRESS_B),
            vec![token(5), token(6), token(7), token(8), token(9), token(0)]
        );
        state.claim_consistent();
    }

    #[concordium_test]
    fn test_transfer_rejections() {
        let mut state_builder = TestStateBuilder::new();
        let mut state = minted_state(&mut state_builder);

        claim_eq!(
            state.transfer(&ADDRESS_A, ADDRESS_C, token(999)).map(|_| ()),
            Err(CustomContractError::TokenNotFound)
        );
        claim_eq!(
            state.transfer(&ADDRESS_C, ADDRESS_B, token(0)).map(|_| ()),
            Err(CustomContractError::NotOwner)
        );
        claim_eq!(
            state.transfer(&ADDRESS_A, ADDRESS_A, token(0)).map(|_| ()),
            Err(CustomContractError::SelfTransfer)
        );

        claim_eq!(state.owner_of(&token(0)), Ok(ADDRESS_A));
        claim_eq!(state.balance_of(&ADDRESS_A), 5);
        claim_eq!(state.balance_of(&ADDRESS_B), 5);
        claim_eq!(state.balance_of(&ADDRESS_C), 0);
        state.claim_consistent();
    }

    #[concordium_test]
    fn test_approved_address_can_transfer() {
        let mut state_builder = TestStateBuilder::new();
        let mut state = minted_state(&mut state_builder);

        state
            .approve(&ADDRESS_B, ADDRESS_A, token(5))
            .expect_report("Failed to approve");

        // Approved party can not send the token back to the owner
        claim_eq!(
            state.transfer(&ADDRESS_A, ADDRESS_B, token(5)).map(|_| ()),
            Err(CustomContractError::SelfTransfer)
        );
        claim!(state.is_approved(&ADDRESS_A, &token(5)));

        let event = state
            .transfer(&ADDRESS_A, ADDRESS_C, token(5))
            .expect_report("Approved address failed to transfer");
        claim_eq!(
            to_bytes(&event),
            to_bytes(&ContractEvent::Transfer(TransferEvent {
                token_id: token(5),
                amount: ContractTokenAmount::from(1),
                from: ADDRESS_B,
                to: ADDRESS_C,
            }))
        );

        claim_eq!(state.owner_of(&token(5)), Ok(ADDRESS_C));
        claim!(!state.is_approved(&ADDRESS_A, &token(5)));
        claim_eq!(
            state.transfer(&ADDRESS_A, ADDRESS_B, token(5)).map(|_| ()),
            Err(CustomContractError::NotOwner)
        );
        state.claim_consistent();
    }

    #[concordium_test]
    fn test_transfer_clears_approval() {
        let mut state_builder = TestStateBuilder::new();
        let mut state = minted_state(&mut state_builder);

        state
            .approve(&ADDRESS_A, ADDRESS_B, token(0))
            .expect_report("Failed to approve");
        state
            .transfer(&ADDRESS_A, ADDRESS_C, token(0))
            .expect_report("Failed to transfer");

        claim_eq!(state.approved_of(&token(0)), Ok(None));
        claim_eq!(
            state.take_ownership(&ADDRESS_B, token(0)).map(|_| ()),
            Err(CustomContractError::NotApproved)
        );
        claim_eq!(state.owner_of(&token(0)), Ok(ADDRESS_C));
        state.claim_consistent();
    }

    #[concordium_test]
    fn test_restricted_mint_policy() {
        let mut state_builder = TestStateBuilder::new();
        let mut state = new_state(&mut state_builder, MintPolicy::Restricted);

        claim!(!state.may_create(&ADDRESS_A));
        claim_eq!(
            state.create(&ADDRESS_A, token(0), ADDRESS_A).map(|_| ()),
            Err(CustomContractError::Unauthorized)
        );
        claim_eq!(state.total_supply(), 0);

        // Admin can mint for anyone
        state
            .create(&ADDRESS_ADMIN, token(0), ADDRESS_A)
            .expect_report("Admin failed to create token");
        claim_eq!(state.owner_of(&token(0)), Ok(ADDRESS_A));

        // Only admins can open minting
        claim_eq!(
            state.update_mint_policy(&ADDRESS_A, MintPolicy::Open),
            Err(CustomContractError::Unauthorized)
        );
        claim_eq!(
            state.update_mint_policy(&ADDRESS_ADMIN, MintPolicy::Open),
            Ok(CustomEvent::UpdateMintPolicy(MintPolicy::Open))
        );
        state
            .create(&ADDRESS_A, token(1), ADDRESS_A)
            .expect_report("Failed to create token under open policy");
        claim_eq!(state.balance_of(&ADDRESS_A), 2);
        state.claim_consistent();
    }

    #[concordium_test]
    fn test_token_ids_are_never_reused() {
        let mut state_builder = TestStateBuilder::new();
        let mut state = minted_state(&mut state_builder);

        state
            .transfer(&ADDRESS_A, ADDRESS_C, token(4))
            .expect_report("Failed to transfer");
        state
            .transfer(&ADDRESS_C, ADDRESS_A, token(4))
            .expect_report("Failed to transfer back");

        claim_eq!(
            state.create(&ADDRESS_C, token(4), ADDRESS_C).map(|_| ()),
            Err(CustomContractError::AlreadyExists)
        );
        claim_eq!(state.owner_of(&token(4)), Ok(ADDRESS_A));
        // Token came back to the end of the list
        claim_eq!(
            state.tokens_of(&ADDRESS_A),
            vec![token(0), token(1), token(2), token(3), token(4)]
        );
        claim_eq!(state.balance_of(&ADDRESS_C), 0);
        state.claim_consistent();
    }
}
