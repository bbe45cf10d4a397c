use crate::{ContractResult, CustomContractError};
use concordium_std::*;

#[derive(Serial, DeserialWithState)]
#[concordium(state_parameter = "S")]
pub struct Authority<S: HasStateApi> {
    /// Trusted addresses that manage both lists and the contract settings
    admins: StateSet<Address, S>,
    /// Addresses that may create tokens when minting is restricted
    minters: StateSet<Address, S>,
}

impl<S: HasStateApi> Authority<S> {
    pub fn new(state_builder: &mut StateBuilder<S>, admin: Address) -> Self {
        let mut admins = state_builder.new_set();
        admins.insert(admin);
        Self {
            admins,
            minters: state_builder.new_set(),
        }
    }

    pub fn has_admin_rights(&self, address: &Address) -> bool {
        self.admins.contains(address)
    }

    /// Admins can always mint.
    pub fn has_minter_rights(&self, address: &Address) -> bool {
        self.minters.contains(address) || self.has_admin_rights(address)
    }

    /// Add or remove an address from one of the lists.
    /// Only admins may edit either list. Adding a present address or removing
    /// a missing one succeeds without change.
    pub fn handle_update(
        &mut self,
        sender: Address,
        update: AuthorityUpdateParams,
    ) -> ContractResult<()> {
        ensure!(
            self.has_admin_rights(&sender),
            CustomContractError::Unauthorized
        );

        let address_list = match update.field {
            AuthorityField::Minter => &mut self.minters,
            AuthorityField::Admin => &mut self.admins,
        };

        match update.kind {
            AuthorityUpdateKind::Remove => {
                address_list.remove(&update.address);
            }
            AuthorityUpdateKind::Add => {
                address_list.insert(update.address);
            }
        }

        Ok(())
    }

    pub fn handle_view(&self, view: AuthorityViewParams) -> Vec<Address> {
        let address_list = match view.field {
            AuthorityField::Minter => &self.minters,
            AuthorityField::Admin => &self.admins,
        };

        address_list
            .iter()
            .skip(view.skip as usize)
            .take(view.show as usize)
            .map(|a| *a)
            .collect()
    }
}

#[derive(Debug, SchemaType, Serialize)]
pub enum AuthorityField {
    Minter,
    Admin,
}

#[derive(Debug, SchemaType, Serialize)]
pub enum AuthorityUpdateKind {
    Remove,
    Add,
}

#[derive(Debug, SchemaType, Serialize)]
pub struct AuthorityUpdateParams {
    pub field: AuthorityField,
    pub kind: AuthorityUpdateKind,
    pub address: Address,
}

#[derive(Debug, SchemaType, Serialize)]
pub struct AuthorityViewParams {
    pub field: AuthorityField,
    pub skip: u32,
    pub show: u32,
}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use concordium_std::test_infrastructure::*;

    const ADMIN: AccountAddress = AccountAddress([1; 32]);
    const MINTER_ACCOUNT: AccountAddress = AccountAddress([2; 32]);
    const MINTER_CONTRACT: ContractAddress = ContractAddress {
        index: 2,
        subindex: 0,
    };
    const USER: AccountAddress = AccountAddress([16; 32]);

    fn default_authority() -> Authority<TestStateApi> {
        let mut state_builder = TestStateBuilder::new();

        let mut authority = Authority::new(&mut state_builder, Address::Account(ADMIN));
        authority.minters.insert(Address::Account(MINTER_ACCOUNT));
        authority.minters.insert(Address::Contract(MINTER_CONTRACT));

        authority
    }

    fn update(
        field: AuthorityField,
        kind: AuthorityUpdateKind,
        address: Address,
    ) -> AuthorityUpdateParams {
        AuthorityUpdateParams {
            field,
            kind,
            address,
        }
    }

    #[concordium_test]
    fn test_rights() {
        let authority = default_authority();

        claim!(authority.has_admin_rights(&Address::Account(ADMIN)));
        claim!(authority.has_minter_rights(&Address::Account(ADMIN)));

        claim!(!authority.has_admin_rights(&Address::Account(MINTER_ACCOUNT)));
        claim!(authority.has_minter_rights(&Address::Account(MINTER_ACCOUNT)));
        claim!(authority.has_minter_rights(&Address::Contract(MINTER_CONTRACT)));

        claim!(!authority.has_admin_rights(&Address::Account(USER)));
        claim!(!authority.has_minter_rights(&Address::Account(USER)));
    }

    #[concordium_test]
    fn test_admin_adds_minter() {
        let mut authority = default_authority();

        let result = authority.handle_update(
            Address::Account(ADMIN),
            update(
                AuthorityField::Minter,
                AuthorityUpdateKind::Add,
                Address::Account(USER),
            ),
        );
        claim_eq!(result, Ok(()));
        claim!(authority.has_minter_rights(&Address::Account(USER)));
        claim!(!authority.has_admin_rights(&Address::Account(USER)));
    }

    #[concordium_test]
    fn test_minter_cannot_update_lists() {
        let mut authority = default_authority();

        let result = authority.handle_update(
            Address::Account(MINTER_ACCOUNT),
            update(
                AuthorityField::Minter,
                AuthorityUpdateKind::Add,
                Address::Account(USER),
            ),
        );
        claim_eq!(result, Err(CustomContractError::Unauthorized));
        claim!(!authority.has_minter_rights(&Address::Account(USER)));

        let result = authority.handle_update(
            Address::Contract(MINTER_CONTRACT),
            update(
                AuthorityField::Admin,
                AuthorityUpdateKind::Add,
                Address::Contract(MINTER_CONTRACT),
            ),
        );
        claim_eq!(result, Err(CustomContractError::Unauthorized));
        claim!(!authority.has_admin_rights(&Address::Contract(MINTER_CONTRACT)));
    }

    #[concordium_test]
    fn test_remove_minter() {
        let mut authority = default_authority();

        let result = authority.handle_update(
            Address::Account(ADMIN),
            update(
                AuthorityField::Minter,
                AuthorityUpdateKind::Remove,
                Address::Account(MINTER_ACCOUNT),
            ),
        );
        claim_eq!(result, Ok(()));
        claim!(!authority.has_minter_rights(&Address::Account(MINTER_ACCOUNT)));

        // Removing a missing address is not an error
        let result = authority.handle_update(
            Address::Account(ADMIN),
            update(
                AuthorityField::Minter,
                AuthorityUpdateKind::Remove,
                Address::Account(USER),
            ),
        );
        claim_eq!(result, Ok(()));
    }

    #[concordium_test]
    fn test_admin_removes_itself() {
        let mut authority = default_authority();

        let result = authority.handle_update(
            Address::Account(ADMIN),
            update(
                AuthorityField::Admin,
                AuthorityUpdateKind::Remove,
                Address::Account(ADMIN),
            ),
        );
        claim_eq!(result, Ok(()));
        claim!(!authority.has_admin_rights(&Address::Account(ADMIN)));

        // Nobody is left to restore the admin
        let result = authority.handle_update(
            Address::Account(ADMIN),
            update(
                AuthorityField::Admin,
                AuthorityUpdateKind::Add,
                Address::Account(ADMIN),
            ),
        );
        claim_eq!(result, Err(CustomContractError::Unauthorized));
    }

    #[concordium_test]
    fn test_view_minters_paged() {
        let mut authority = default_authority();

        for n in 16u8..80u8 {
            authority.minters.insert(Address::Account(AccountAddress([n; 32])));
        }

        let mut seen = Vec::new();
        let show = 10;
        loop {
            let page = authority.handle_view(AuthorityViewParams {
                field: AuthorityField::Minter,
                skip: seen.len() as u32,
                show,
            });
            let last_page = page.len() != show as usize;
            seen.extend(page);
            if last_page {
                break;
            }
        }

        // 64 inserted plus the two default minters
        claim_eq!(seen.len(), 66);
        claim!(seen.contains(&Address::Account(MINTER_ACCOUNT)));
        claim!(seen.contains(&Address::Contract(MINTER_CONTRACT)));
        claim!(seen.contains(&Address::Account(AccountAddress([79; 32]))));

        let admins = authority.handle_view(AuthorityViewParams {
            field: AuthorityField::Admin,
            skip: 0,
            show: 10,
        });
        claim_eq!(admins, vec![Address::Account(ADMIN)]);
    }
}
