use commons::{
    AuthorityUpdateParams, AuthorityViewParams, ContractResult, ContractTokenId,
};
use concordium_std::*;

use crate::external::*;
use crate::state::State;

/// Initialize the registry with no tokens. The account creating the instance
/// becomes its first admin.
#[init(contract = "BictoryNftRegistry", parameter = "InitParams")]
fn init<S: HasStateApi>(
    ctx: &impl HasInitContext,
    state_builder: &mut StateBuilder<S>,
) -> InitResult<State<S>> {
    let params: InitParams = ctx.parameter_cursor().get()?;
    Ok(State::new(state_builder, params, ctx.init_origin()))
}

/// Create a new token owned by the sender.
/// Logs a `Mint` event.
///
/// It rejects if:
/// - It fails to parse the parameter.
/// - The mint policy does not allow the sender to create tokens.
/// - The token ID already exists.
/// - Fails to log event.
#[receive(
    contract = "BictoryNftRegistry",
    name = "create",
    parameter = "ContractTokenId",
    mutable,
    enable_logger
)]
fn create<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let token_id: ContractTokenId = ctx.parameter_cursor().get()?;
    let sender = ctx.sender();

    let event = host.state_mut().create(&sender, token_id, sender)?;
    logger.log(&event)?;

    Ok(())
}

/// Create a new token on behalf of another owner.
/// Logs a `Mint` event.
///
/// It rejects if:
/// - It fails to parse the parameter.
/// - The mint policy does not allow the sender to create tokens.
/// - The token ID already exists.
/// - Fails to log event.
#[receive(
    contract = "BictoryNftRegistry",
    name = "createFor",
    parameter = "CreateForParams",
    mutable,
    enable_logger
)]
fn create_for<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let params: CreateForParams = ctx.parameter_cursor().get()?;

    let event = host
        .state_mut()
        .create(&ctx.sender(), params.token_id, params.owner)?;
    logger.log(&event)?;

    Ok(())
}

/// Number of tokens owned by the given address.
#[receive(
    contract = "BictoryNftRegistry",
    name = "balanceOf",
    parameter = "Address",
    return_value = "u64"
)]
fn balance_of<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<u64> {
    let owner: Address = ctx.parameter_cursor().get()?;
    Ok(host.state().balance_of(&owner))
}

#[receive(
    contract = "BictoryNftRegistry",
    name = "totalSupply",
    return_value = "u64"
)]
fn total_supply<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<u64> {
    Ok(host.state().total_supply())
}

/// Tokens owned by the given address, in the order they were acquired.
#[receive(
    contract = "BictoryNftRegistry",
    name = "tokensOf",
    parameter = "Address",
    return_value = "Vec<ContractTokenId>"
)]
fn tokens_of<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<Vec<ContractTokenId>> {
    let owner: Address = ctx.parameter_cursor().get()?;
    Ok(host.state().tokens_of(&owner))
}

/// It rejects if the token ID does not exist.
#[receive(
    contract = "BictoryNftRegistry",
    name = "ownerOf",
    parameter = "ContractTokenId",
    return_value = "Address"
)]
fn owner_of<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<Address> {
    let token_id: ContractTokenId = ctx.parameter_cursor().get()?;
    host.state().owner_of(&token_id)
}

/// Allow an address to claim a token of the sender. Replaces any previous
/// approval of the token.
/// Logs an `Approval` event.
///
/// It rejects if:
/// - It fails to parse the parameter.
/// - The token ID does not exist.
/// - The sender is not the owner of the token.
/// - The approved address is the owner.
/// - Fails to log event.
#[receive(
    contract = "BictoryNftRegistry",
    name = "approve",
    parameter = "ApproveParams",
    mutable,
    enable_logger
)]
fn approve<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let params: ApproveParams = ctx.parameter_cursor().get()?;

    let event = host
        .state_mut()
        .approve(&ctx.sender(), params.approved, params.token_id)?;
    logger.log(&event)?;

    Ok(())
}

/// Check whether an address is currently approved to claim a token. Unknown
/// tokens are reported as not approved.
#[receive(
    contract = "BictoryNftRegistry",
    name = "isApproved",
    parameter = "IsApprovedParams",
    return_value = "bool"
)]
fn is_approved<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<bool> {
    let params: IsApprovedParams = ctx.parameter_cursor().get()?;
    Ok(host.state().is_approved(&params.address, &params.token_id))
}

/// The address approved to claim a token, if any.
/// It rejects if the token ID does not exist.
#[receive(
    contract = "BictoryNftRegistry",
    name = "approvedOf",
    parameter = "ContractTokenId",
    return_value = "Option<Address>"
)]
fn approved_of<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<Option<Address>> {
    let token_id: ContractTokenId = ctx.parameter_cursor().get()?;
    host.state().approved_of(&token_id)
}

/// Claim a token the sender was approved for.
/// Logs a `Transfer` event from the previous owner to the sender.
///
/// It rejects if:
/// - It fails to parse the parameter.
/// - The token ID does not exist.
/// - The sender is not the approved address of the token.
/// - Fails to log event.
#[receive(
    contract = "BictoryNftRegistry",
    name = "takeOwnership",
    parameter = "ContractTokenId",
    mutable,
    enable_logger
)]
fn take_ownership<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let token_id: ContractTokenId = ctx.parameter_cursor().get()?;

    let event = host.state_mut().take_ownership(&ctx.sender(), token_id)?;
    logger.log(&event)?;

    Ok(())
}

/// Move a token to another address. The sender must be either the owner or
/// the approved address of the token.
/// Logs a `Transfer` event from the previous owner to the receiver.
///
/// It rejects if:
/// - It fails to parse the parameter.
/// - The token ID does not exist.
/// - The sender is neither the owner nor approved for the token.
/// - The receiver is the current owner.
/// - Fails to log event.
#[receive(
    contract = "BictoryNftRegistry",
    name = "transfer",
    parameter = "TransferParams",
    mutable,
    enable_logger
)]
fn transfer<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let params: TransferParams = ctx.parameter_cursor().get()?;

    let event = host
        .state_mut()
        .transfer(&ctx.sender(), params.to, params.token_id)?;
    logger.log(&event)?;

    Ok(())
}

#[receive(
    contract = "BictoryNftRegistry",
    name = "name",
    return_value = "String"
)]
fn name<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<String> {
    Ok(host.state().name.clone())
}

#[receive(
    contract = "BictoryNftRegistry",
    name = "symbol",
    return_value = "String"
)]
fn symbol<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<String> {
    Ok(host.state().symbol.clone())
}

/// Switch between open and restricted minting. Only admins can do this.
/// Logs an `UpdateMintPolicy` event.
#[receive(
    contract = "BictoryNftRegistry",
    name = "updateMintPolicy",
    parameter = "MintPolicy",
    mutable,
    enable_logger
)]
fn update_mint_policy<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let mint_policy: MintPolicy = ctx.parameter_cursor().get()?;

    let event = host
        .state_mut()
        .update_mint_policy(&ctx.sender(), mint_policy)?;
    logger.log(&event)?;

    Ok(())
}

#[receive(
    contract = "BictoryNftRegistry",
    name = "viewMintPolicy",
    return_value = "MintPolicy"
)]
fn view_mint_policy<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<MintPolicy> {
    Ok(host.state().mint_policy)
}

#[receive(
    mutable,
    contract = "BictoryNftRegistry",
    name = "updateAuthority",
    parameter = "AuthorityUpdateParams"
)]
fn update_authority<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<()> {
    let params: AuthorityUpdateParams = ctx.parameter_cursor().get()?;
    host.state_mut()
        .authority
        .handle_update(ctx.sender(), params)
}

#[receive(
    contract = "BictoryNftRegistry",
    name = "viewAuthority",
    parameter = "AuthorityViewParams",
    return_value = "Vec<Address>"
)]
fn view_authority<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<Vec<Address>> {
    let params: AuthorityViewParams = ctx.parameter_cursor().get()?;
    Ok(host.state().authority.handle_view(params))
}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use crate::events::{ApprovalEvent, CustomEvent};
    use commons::{
        AuthorityField, AuthorityUpdateKind, ContractEvent, ContractTokenAmount,
        CustomContractError,
    };
    use concordium_cis2::{MintEvent, TokenIdU64, TransferEvent};
    use test_infrastructure::*;

    const ADMIN: AccountAddress = AccountAddress([0u8; 32]);
    const ADDRESS_ADMIN: Address = Address::Account(ADMIN);
    const ADDRESS_A: Address = Address::Account(AccountAddress([1u8; 32]));
    const ADDRESS_B: Address = Address::Account(AccountAddress([2u8; 32]));
    const ADDRESS_C: Address = Address::Account(AccountAddress([3u8; 32]));

    fn token(id: u64) -> ContractTokenId {
        TokenIdU64(id)
    }

    fn init_params(mint_policy: MintPolicy) -> InitParams {
        InitParams {
            name: String::from("Bictory Registry"),
            symbol: String::from("BREG"),
            mint_policy,
        }
    }

    fn receive_ctx(sender: Address, parameter_bytes: &[u8]) -> TestReceiveContext<'_> {
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(sender);
        ctx.set_parameter(parameter_bytes);
        ctx
    }

    fn mint_event(token_id: ContractTokenId, owner: Address) -> Vec<u8> {
        to_bytes(&ContractEvent::Mint(MintEvent {
            token_id,
            amount: ContractTokenAmount::from(1),
            owner,
        }))
    }

    fn transfer_event(token_id: ContractTokenId, from: Address, to: Address) -> Vec<u8> {
        to_bytes(&ContractEvent::Transfer(TransferEvent {
            token_id,
            amount: ContractTokenAmount::from(1),
            from,
            to,
        }))
    }

    fn approval_event(owner: Address, approved: Address, token_id: ContractTokenId) -> Vec<u8> {
        to_bytes(&CustomEvent::Approval(ApprovalEvent {
            owner,
            approved,
            token_id,
        }))
    }

    fn new_host(mint_policy: MintPolicy) -> TestHost<State<TestStateApi>> {
        let mut state_builder = TestStateBuilder::new();
        let state = State::new(&mut state_builder, init_params(mint_policy), ADMIN);
        TestHost::new(state, state_builder)
    }

    fn call_create(
        host: &mut TestHost<State<TestStateApi>>,
        logger: &mut TestLogger,
        sender: Address,
        token_id: ContractTokenId,
    ) -> ContractResult<()> {
        let parameter_bytes = to_bytes(&token_id);
        let ctx = receive_ctx(sender, &parameter_bytes);
        create(&ctx, host, logger)
    }

    fn call_transfer(
        host: &mut TestHost<State<TestStateApi>>,
        logger: &mut TestLogger,
        sender: Address,
        to: Address,
        token_id: ContractTokenId,
    ) -> ContractResult<()> {
        let parameter_bytes = to_bytes(&TransferParams { to, token_id });
        let ctx = receive_ctx(sender, &parameter_bytes);
        transfer(&ctx, host, logger)
    }

    fn call_approve(
        host: &mut TestHost<State<TestStateApi>>,
        logger: &mut TestLogger,
        sender: Address,
        approved: Address,
        token_id: ContractTokenId,
    ) -> ContractResult<()> {
        let parameter_bytes = to_bytes(&ApproveParams { approved, token_id });
        let ctx = receive_ctx(sender, &parameter_bytes);
        approve(&ctx, host, logger)
    }

    fn call_take_ownership(
        host: &mut TestHost<State<TestStateApi>>,
        logger: &mut TestLogger,
        sender: Address,
        token_id: ContractTokenId,
    ) -> ContractResult<()> {
        let parameter_bytes = to_bytes(&token_id);
        let ctx = receive_ctx(sender, &parameter_bytes);
        take_ownership(&ctx, host, logger)
    }

    fn query_balance(host: &TestHost<State<TestStateApi>>, owner: Address) -> u64 {
        let parameter_bytes = to_bytes(&owner);
        let ctx = receive_ctx(ADDRESS_C, &parameter_bytes);
        balance_of(&ctx, host).expect_report("balanceOf failed")
    }

    fn query_tokens(
        host: &TestHost<State<TestStateApi>>,
        owner: Address,
    ) -> Vec<ContractTokenId> {
        let parameter_bytes = to_bytes(&owner);
        let ctx = receive_ctx(ADDRESS_C, &parameter_bytes);
        tokens_of(&ctx, host).expect_report("tokensOf failed")
    }

    fn query_owner(
        host: &TestHost<State<TestStateApi>>,
        token_id: ContractTokenId,
    ) -> ContractResult<Address> {
        let parameter_bytes = to_bytes(&token_id);
        let ctx = receive_ctx(ADDRESS_C, &parameter_bytes);
        owner_of(&ctx, host)
    }

    fn query_is_approved(
        host: &TestHost<State<TestStateApi>>,
        address: Address,
        token_id: ContractTokenId,
    ) -> bool {
        let parameter_bytes = to_bytes(&IsApprovedParams { address, token_id });
        let ctx = receive_ctx(ADDRESS_C, &parameter_bytes);
        is_approved(&ctx, host).expect_report("isApproved failed")
    }

    fn query_total_supply(host: &TestHost<State<TestStateApi>>) -> u64 {
        let ctx = TestReceiveContext::empty();
        total_supply(&ctx, host).expect_report("totalSupply failed")
    }

    /// Tokens 0..=4 created by `ADDRESS_A` and 5..=9 created by `ADDRESS_B`.
    fn minted_host(logger: &mut TestLogger) -> TestHost<State<TestStateApi>> {
        let mut host = new_host(MintPolicy::Open);
        for id in 0..5 {
            call_create(&mut host, logger, ADDRESS_A, token(id))
                .expect_report("Failed to create token for A");
        }
        for id in 5..10 {
            call_create(&mut host, logger, ADDRESS_B, token(id))
                .expect_report("Failed to create token for B");
        }
        host
    }

    /// Test initialization succeeds.
    #[concordium_test]
    fn test_init() {
        // Setup the context
        let parameter_bytes = to_bytes(&init_params(MintPolicy::Restricted));
        let mut ctx = TestInitContext::empty();
        ctx.set_init_origin(ADMIN);
        ctx.set_parameter(&parameter_bytes);
        let mut builder = TestStateBuilder::new();

        // Call the contract function.
        let result = init(&ctx, &mut builder);

        // Check the result
        let state = result.expect_report("Contract initialization failed");

        // Check the state
        claim_eq!(state.total_supply(), 0, "No token should be initialized");
        claim_eq!(state.name, "Bictory Registry");
        claim_eq!(state.symbol, "BREG");
        claim_eq!(state.mint_policy, MintPolicy::Restricted);
        claim!(
            state.authority.has_admin_rights(&ADDRESS_ADMIN),
            "Init origin should be an admin"
        );
    }

    #[concordium_test]
    fn test_name_and_symbol() {
        let host = new_host(MintPolicy::Open);
        let ctx = TestReceiveContext::empty();

        claim_eq!(name(&ctx, &host), Ok(String::from("Bictory Registry")));
        claim_eq!(symbol(&ctx, &host), Ok(String::from("BREG")));
        claim_eq!(view_mint_policy(&ctx, &host), Ok(MintPolicy::Open));
    }

    /// Test creating tokens, ensuring they are owned and listed by the sender
    /// and a `Mint` event is logged for each.
    #[concordium_test]
    fn test_create() {
        let mut logger = TestLogger::init();
        let mut host = new_host(MintPolicy::Open);

        for id in 0..3 {
            let result = call_create(&mut host, &mut logger, ADDRESS_A, token(id));
            claim!(result.is_ok(), "Results in rejection");
        }

        claim_eq!(query_total_supply(&host), 3);
        claim_eq!(query_balance(&host, ADDRESS_A), 3);
        claim_eq!(
            query_tokens(&host, ADDRESS_A),
            vec![token(0), token(1), token(2)]
        );
        claim_eq!(query_owner(&host, token(1)), Ok(ADDRESS_A));

        claim_eq!(logger.logs.len(), 3, "One event per token");
        claim_eq!(logger.logs[2], mint_event(token(2), ADDRESS_A));
        host.state().claim_consistent();
    }

    #[concordium_test]
    fn test_create_for() {
        let mut logger = TestLogger::init();
        let mut host = new_host(MintPolicy::Open);

        let parameter_bytes = to_bytes(&CreateForParams {
            owner: ADDRESS_B,
            token_id: token(42),
        });
        let ctx = receive_ctx(ADDRESS_A, &parameter_bytes);

        let result = create_for(&ctx, &mut host, &mut logger);

        claim_eq!(result, Ok(()));
        claim_eq!(query_owner(&host, token(42)), Ok(ADDRESS_B));
        claim_eq!(query_balance(&host, ADDRESS_A), 0);
        claim_eq!(logger.logs, vec![mint_event(token(42), ADDRESS_B)]);
    }

    /// Creating an existing token fails and leaves the registry untouched.
    #[concordium_test]
    fn test_create_duplicate() {
        let mut logger = TestLogger::init();
        let mut host = new_host(MintPolicy::Open);

        call_create(&mut host, &mut logger, ADDRESS_A, token(7))
            .expect_report("Failed to create token");
        let result = call_create(&mut host, &mut logger, ADDRESS_B, token(7));

        claim_eq!(result, Err(CustomContractError::AlreadyExists));
        claim_eq!(query_owner(&host, token(7)), Ok(ADDRESS_A));
        claim_eq!(query_balance(&host, ADDRESS_A), 1);
        claim_eq!(query_balance(&host, ADDRESS_B), 0);
        claim_eq!(query_total_supply(&host), 1);
        claim_eq!(logger.logs.len(), 1, "Rejected call must not log");
    }

    /// Approve, claim, then fail to claim again.
    #[concordium_test]
    fn test_approve_then_take_ownership() {
        let mut logger = TestLogger::init();
        let mut host = new_host(MintPolicy::Open);
        call_create(&mut host, &mut logger, ADDRESS_A, token(0))
            .expect_report("Failed to create token");

        let result = call_approve(&mut host, &mut logger, ADDRESS_A, ADDRESS_B, token(0));
        claim_eq!(result, Ok(()));
        claim_eq!(
            logger.logs[1],
            approval_event(ADDRESS_A, ADDRESS_B, token(0)),
            "Incorrect event emitted"
        );
        claim!(query_is_approved(&host, ADDRESS_B, token(0)));

        let parameter_bytes = to_bytes(&token(0));
        let ctx = receive_ctx(ADDRESS_C, &parameter_bytes);
        claim_eq!(approved_of(&ctx, &host), Ok(Some(ADDRESS_B)));

        let result = call_take_ownership(&mut host, &mut logger, ADDRESS_B, token(0));
        claim_eq!(result, Ok(()));
        claim_eq!(
            logger.logs[2],
            transfer_event(token(0), ADDRESS_A, ADDRESS_B),
            "Incorrect event emitted"
        );
        claim_eq!(query_owner(&host, token(0)), Ok(ADDRESS_B));
        claim_eq!(query_balance(&host, ADDRESS_A), 0);
        claim_eq!(query_balance(&host, ADDRESS_B), 1);
        claim_eq!(approved_of(&ctx, &host), Ok(None));

        // The approval is consumed by the claim
        let result = call_take_ownership(&mut host, &mut logger, ADDRESS_B, token(0));
        claim_eq!(result, Err(CustomContractError::NotApproved));
        let result = call_take_ownership(&mut host, &mut logger, ADDRESS_A, token(0));
        claim_eq!(result, Err(CustomContractError::NotApproved));
        claim_eq!(query_owner(&host, token(0)), Ok(ADDRESS_B));
        claim_eq!(logger.logs.len(), 3);
        host.state().claim_consistent();
    }

    /// A failing transfer of an unknown token leaves every balance unchanged.
    #[concordium_test]
    fn test_transfer_unknown_token() {
        let mut logger = TestLogger::init();
        let mut host = minted_host(&mut logger);
        claim_eq!(query_owner(&host, token(5)), Ok(ADDRESS_B));

        let result = call_transfer(&mut host, &mut logger, ADDRESS_A, ADDRESS_C, token(999));

        claim_eq!(result, Err(CustomContractError::TokenNotFound));
        claim_eq!(query_balance(&host, ADDRESS_A), 5);
        claim_eq!(query_balance(&host, ADDRESS_B), 5);
        claim_eq!(query_balance(&host, ADDRESS_C), 0);
        claim_eq!(query_total_supply(&host), 10);
        claim_eq!(logger.logs.len(), 10, "Rejected call must not log");
        host.state().claim_consistent();
    }

    /// Test transfer succeeds, when the sender is the owner.
    #[concordium_test]
    fn test_transfer_by_owner() {
        let mut logger = TestLogger::init();
        let mut host = minted_host(&mut logger);

        let result = call_transfer(&mut host, &mut logger, ADDRESS_B, ADDRESS_C, token(7));

        claim!(result.is_ok(), "Results in rejection");
        claim_eq!(query_owner(&host, token(7)), Ok(ADDRESS_C));
        claim_eq!(
            query_tokens(&host, ADDRESS_B),
            vec![token(5), token(6), token(8), token(9)]
        );
        claim_eq!(query_tokens(&host, ADDRESS_C), vec![token(7)]);
        claim_eq!(
            logger.logs.last(),
            Some(&transfer_event(token(7), ADDRESS_B, ADDRESS_C)),
            "Incorrect event emitted"
        );
        host.state().claim_consistent();
    }

    /// Test transfer fails, when the sender is neither the owner nor approved.
    #[concordium_test]
    fn test_transfer_not_authorized() {
        let mut logger = TestLogger::init();
        let mut host = minted_host(&mut logger);

        let result = call_transfer(&mut host, &mut logger, ADDRESS_C, ADDRESS_C, token(0));

        claim_eq!(
            result,
            Err(CustomContractError::NotOwner),
            "Error is expected to be NotOwner"
        );
        claim_eq!(query_owner(&host, token(0)), Ok(ADDRESS_A));
    }

    #[concordium_test]
    fn test_self_transfer() {
        let mut logger = TestLogger::init();
        let mut host = minted_host(&mut logger);

        let result = call_transfer(&mut host, &mut logger, ADDRESS_A, ADDRESS_A, token(3));

        claim_eq!(result, Err(CustomContractError::SelfTransfer));
        claim_eq!(
            query_tokens(&host, ADDRESS_A),
            vec![token(0), token(1), token(2), token(3), token(4)]
        );
        claim_eq!(logger.logs.len(), 10);
    }

    /// The approved address may move the token on, which clears the approval.
    #[concordium_test]
    fn test_approved_transfer() {
        let mut logger = TestLogger::init();
        let mut host = minted_host(&mut logger);
        call_approve(&mut host, &mut logger, ADDRESS_A, ADDRESS_B, token(1))
            .expect_report("Failed to approve");

        let result = call_transfer(&mut host, &mut logger, ADDRESS_B, ADDRESS_C, token(1));

        claim_eq!(result, Ok(()));
        claim_eq!(
            logger.logs.last(),
            Some(&transfer_event(token(1), ADDRESS_A, ADDRESS_C)),
            "Transfer must name the previous owner"
        );
        claim_eq!(query_owner(&host, token(1)), Ok(ADDRESS_C));
        claim!(!query_is_approved(&host, ADDRESS_B, token(1)));
        host.state().claim_consistent();
    }

    /// An approval does not survive an owner transfer.
    #[concordium_test]
    fn test_transfer_clears_approval() {
        let mut logger = TestLogger::init();
        let mut host = minted_host(&mut logger);
        call_approve(&mut host, &mut logger, ADDRESS_A, ADDRESS_B, token(2))
            .expect_report("Failed to approve");
        call_transfer(&mut host, &mut logger, ADDRESS_A, ADDRESS_C, token(2))
            .expect_report("Failed to transfer");

        claim!(!query_is_approved(&host, ADDRESS_B, token(2)));
        let result = call_take_ownership(&mut host, &mut logger, ADDRESS_B, token(2));
        claim_eq!(result, Err(CustomContractError::NotApproved));
        claim_eq!(query_owner(&host, token(2)), Ok(ADDRESS_C));
    }

    #[concordium_test]
    fn test_approve_rejections() {
        let mut logger = TestLogger::init();
        let mut host = minted_host(&mut logger);

        claim_eq!(
            call_approve(&mut host, &mut logger, ADDRESS_A, ADDRESS_B, token(999)),
            Err(CustomContractError::TokenNotFound)
        );
        claim_eq!(
            call_approve(&mut host, &mut logger, ADDRESS_B, ADDRESS_C, token(0)),
            Err(CustomContractError::NotOwner)
        );
        claim_eq!(
            call_approve(&mut host, &mut logger, ADDRESS_A, ADDRESS_A, token(0)),
            Err(CustomContractError::SelfApproval)
        );
        claim_eq!(logger.logs.len(), 10);

        let parameter_bytes = to_bytes(&token(999));
        let ctx = receive_ctx(ADDRESS_C, &parameter_bytes);
        claim_eq!(
            approved_of(&ctx, &host),
            Err(CustomContractError::TokenNotFound)
        );
        claim!(!query_is_approved(&host, ADDRESS_B, token(999)));
    }

    #[concordium_test]
    fn test_owner_of_unknown_token() {
        let host = new_host(MintPolicy::Open);

        claim_eq!(
            query_owner(&host, token(0)),
            Err(CustomContractError::TokenNotFound)
        );
        claim_eq!(query_balance(&host, ADDRESS_A), 0);
        claim_eq!(query_tokens(&host, ADDRESS_A), Vec::<ContractTokenId>::new());
    }

    /// Restricted minting is limited to the authority until an admin opens it.
    #[concordium_test]
    fn test_restricted_minting() {
        let mut logger = TestLogger::init();
        let mut host = new_host(MintPolicy::Restricted);

        let result = call_create(&mut host, &mut logger, ADDRESS_A, token(0));
        claim_eq!(result, Err(CustomContractError::Unauthorized));

        // Admin grants minter rights to A
        let parameter_bytes = to_bytes(&AuthorityUpdateParams {
            field: AuthorityField::Minter,
            kind: AuthorityUpdateKind::Add,
            address: ADDRESS_A,
        });
        let ctx = receive_ctx(ADDRESS_B, &parameter_bytes);
        claim_eq!(
            update_authority(&ctx, &mut host),
            Err(CustomContractError::Unauthorized)
        );
        let ctx = receive_ctx(ADDRESS_ADMIN, &parameter_bytes);
        claim_eq!(update_authority(&ctx, &mut host), Ok(()));

        let parameter_bytes = to_bytes(&AuthorityViewParams {
            field: AuthorityField::Minter,
            skip: 0,
            show: 10,
        });
        let ctx = receive_ctx(ADDRESS_C, &parameter_bytes);
        claim_eq!(view_authority(&ctx, &host), Ok(vec![ADDRESS_A]));

        let result = call_create(&mut host, &mut logger, ADDRESS_A, token(0));
        claim_eq!(result, Ok(()));
        claim_eq!(
            call_create(&mut host, &mut logger, ADDRESS_B, token(1)),
            Err(CustomContractError::Unauthorized)
        );

        // Only admins switch the policy
        let parameter_bytes = to_bytes(&MintPolicy::Open);
        let ctx = receive_ctx(ADDRESS_A, &parameter_bytes);
        claim_eq!(
            update_mint_policy(&ctx, &mut host, &mut logger),
            Err(CustomContractError::Unauthorized)
        );
        let ctx = receive_ctx(ADDRESS_ADMIN, &parameter_bytes);
        claim_eq!(update_mint_policy(&ctx, &mut host, &mut logger), Ok(()));
        claim_eq!(
            logger.logs.last(),
            Some(&to_bytes(&CustomEvent::UpdateMintPolicy(MintPolicy::Open)))
        );

        claim_eq!(
            call_create(&mut host, &mut logger, ADDRESS_B, token(1)),
            Ok(())
        );
        claim_eq!(query_total_supply(&host), 2);
        host.state().claim_consistent();
    }
}
