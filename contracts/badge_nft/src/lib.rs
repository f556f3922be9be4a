#![no_std]

extern crate alloc;

use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, symbol_short, Address, Env, String,
};


// ============================================================================
// Error Types
// ============================================================================

/// Contract errors for structured error handling
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ContractError {
    /// Contract has not been initialized
    NotInitialized = 1,
    /// Contract has already been initialized
    AlreadyInitialized = 2,
    /// Token with the given token_id does not exist
    TokenNotFound = 3,
    /// `from` is not the current owner of the token
    NotOwner = 4,
    /// Caller holds neither the token nor an approval for it
    NotAuthorized = 5,
}

// ============================================================================
// Data Types
// ============================================================================

/// Storage keys for the contract
#[contracttype]
pub enum DataKey {
    /// Collection name (singleton)
    Name,
    /// Collection symbol (singleton)
    Symbol,
    /// Counter for generating sequential token IDs
    TokenCounter,
    /// Total number of minted tokens
    TotalSupply,
    /// Owner mapping (token_id -> Address)
    Owner(u32),
    /// Standing transfer approval (token_id -> Address)
    Approved(u32),
    /// Number of tokens held (owner -> u32)
    Balance(Address),
}

// ============================================================================
// Storage Module
// ============================================================================

mod storage {
    use super::*;

    // --- Collection Metadata ---

    pub fn set_name(e: &Env, name: &String) {
        e.storage().instance().set(&DataKey::Name, name);
    }

    pub fn get_name(e: &Env) -> Option<String> {
        e.storage().instance().get(&DataKey::Name)
    }

    pub fn has_name(e: &Env) -> bool {
        e.storage().instance().has(&DataKey::Name)
    }

    pub fn set_symbol(e: &Env, symbol: &String) {
        e.storage().instance().set(&DataKey::Symbol, symbol);
    }

    pub fn get_symbol(e: &Env) -> Option<String> {
        e.storage().instance().get(&DataKey::Symbol)
    }

    // --- Token Counter ---

    pub fn increment_token_counter(e: &Env) -> u32 {
        let count: u32 = e
            .storage()
            .instance()
            .get(&DataKey::TokenCounter)
            .unwrap_or(0);
        let new_count = count + 1;
        e.storage()
            .instance()
            .set(&DataKey::TokenCounter, &new_count);
        new_count
    }

    // --- Owner Mapping ---

    pub fn set_owner(e: &Env, token_id: u32, owner: &Address) {
        e.storage()
            .persistent()
            .set(&DataKey::Owner(token_id), owner);
    }

    pub fn get_owner(e: &Env, token_id: u32) -> Option<Address> {
        e.storage().persistent().get(&DataKey::Owner(token_id))
    }

    // --- Approvals ---

    pub fn set_approved(e: &Env, token_id: u32, approved: &Address) {
        e.storage()
            .persistent()
            .set(&DataKey::Approved(token_id), approved);
    }

    pub fn clear_approved(e: &Env, token_id: u32) {
        e.storage().persistent().remove(&DataKey::Approved(token_id));
    }

    pub fn get_approved(e: &Env, token_id: u32) -> Option<Address> {
        e.storage().persistent().get(&DataKey::Approved(token_id))
    }

    // --- Balances ---

    pub fn get_balance(e: &Env, owner: &Address) -> u32 {
        e.storage()
            .persistent()
            .get(&DataKey::Balance(owner.clone()))
            .unwrap_or(0)
    }

    pub fn set_balance(e: &Env, owner: &Address, balance: u32) {
        e.storage()
            .persistent()
            .set(&DataKey::Balance(owner.clone()), &balance);
    }

    // --- Total Supply ---

    pub fn increment_total_supply(e: &Env) {
        let supply: u32 = e
            .storage()
            .instance()
            .get(&DataKey::TotalSupply)
            .unwrap_or(0);
        e.storage()
            .instance()
            .set(&DataKey::TotalSupply, &(supply + 1));
    }

    pub fn get_total_supply(e: &Env) -> u32 {
        e.storage()
            .instance()
            .get(&DataKey::TotalSupply)
            .unwrap_or(0)
    }
}

// ============================================================================
// Metadata Rendering
// ============================================================================

mod metadata {
    use super::*;
    use alloc::format;
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

    /// Markup preceding the token id text. Off-chain consumers slice the
    /// decoded SVG at this prefix length to read the id back out, so the
    /// prefix is byte-for-byte fixed.
    pub const SVG_PREFIX: &str = "<svg xmlns=\"http://www.w3.org/2000/svg\" preserveAspectRatio=\"xMinYMin meet\" viewBox=\"0 0 350 350\"><style>.base { fill: white; font-family: serif; font-size: 300px; }</style><rect width=\"100%\" height=\"100%\" fill=\"brown\" /><text x=\"100\" y=\"260\" class=\"base\">";

    pub const SVG_SUFFIX: &str = "</text></svg>";

    pub const URI_PREFIX: &str = "data:application/json;base64,";

    pub const IMAGE_PREFIX: &str = "data:image/svg+xml;base64,";

    pub const DESCRIPTION: &str = "Badge NFT with on-chain SVG image.";

    /// Render the full data URI for a token: a base64 JSON document whose
    /// `image` field is itself a base64 SVG data URI.
    pub fn render_token_uri(e: &Env, token_id: u32) -> String {
        let svg = format!("{}{}{}", SVG_PREFIX, token_id, SVG_SUFFIX);
        let image = format!("{}{}", IMAGE_PREFIX, BASE64.encode(svg.as_bytes()));
        let json = format!(
            "{{\"name\":\"Badge #{}\",\"description\":\"{}\",\"image\":\"{}\"}}",
            token_id, DESCRIPTION, image
        );
        let uri = format!("{}{}", URI_PREFIX, BASE64.encode(json.as_bytes()));
        String::from_str(e, &uri)
    }
}

// ============================================================================
// Contract Implementation
// ============================================================================

#[contract]
pub struct BadgeTokenContract;

#[contractimpl]
impl BadgeTokenContract {
    // ========================================================================
    // Initialization
    // ========================================================================

    /// Initialize the collection with its name and symbol
    ///
    /// # Errors
    /// * `AlreadyInitialized` - If the contract has already been initialized
    pub fn initialize(e: Env, name: String, symbol: String) -> Result<(), ContractError> {
        if storage::has_name(&e) {
            return Err(ContractError::AlreadyInitialized);
        }

        storage::set_name(&e, &name);
        storage::set_symbol(&e, &symbol);
        e.storage().instance().set(&DataKey::TokenCounter, &0u32);
        e.storage().instance().set(&DataKey::TotalSupply, &0u32);

        Ok(())
    }

    /// Get the collection name
    pub fn name(e: Env) -> Result<String, ContractError> {
        storage::get_name(&e).ok_or(ContractError::NotInitialized)
    }

    /// Get the collection symbol
    pub fn symbol(e: Env) -> Result<String, ContractError> {
        storage::get_symbol(&e).ok_or(ContractError::NotInitialized)
    }

    // ========================================================================
    // Minting
    // ========================================================================

    /// Mint the next badge to `to`. Token ids are sequential starting at 1.
    ///
    /// Minting is permissionless: anyone may mint to any address.
    ///
    /// # Returns
    /// The token_id of the newly minted badge
    pub fn mint_to(e: Env, to: Address) -> u32 {
        let token_id = storage::increment_token_counter(&e);

        storage::set_owner(&e, token_id, &to);
        storage::set_balance(&e, &to, storage::get_balance(&e, &to) + 1);
        storage::increment_total_supply(&e);

        // A mint is a transfer with no source
        e.events().publish(
            (symbol_short!("Transfer"), token_id),
            (Option::<Address>::None, to),
        );

        token_id
    }

    // ========================================================================
    // Query Functions
    // ========================================================================

    /// Get owner of a token
    pub fn owner_of(e: Env, token_id: u32) -> Result<Address, ContractError> {
        storage::get_owner(&e, token_id).ok_or(ContractError::TokenNotFound)
    }

    /// Number of tokens held by `owner`
    pub fn balance_of(e: Env, owner: Address) -> u32 {
        storage::get_balance(&e, &owner)
    }

    /// Total number of minted tokens
    pub fn total_supply(e: Env) -> u32 {
        storage::get_total_supply(&e)
    }

    /// Get the standing approval for a token, if any
    pub fn get_approved(e: Env, token_id: u32) -> Option<Address> {
        storage::get_approved(&e, token_id)
    }

    /// Whether `spender` may move the token: it is the owner or holds the
    /// standing approval. Unknown tokens report `false`.
    pub fn is_approved_or_owner(e: Env, spender: Address, token_id: u32) -> bool {
        match storage::get_owner(&e, token_id) {
            Some(owner) => {
                owner == spender || storage::get_approved(&e, token_id) == Some(spender)
            }
            None => false,
        }
    }

    // ========================================================================
    // Approvals
    // ========================================================================

    /// Grant or clear the transfer approval for a token
    ///
    /// Passing `None` clears the approval.
    ///
    /// # Errors
    /// * `TokenNotFound` - If the token does not exist
    /// * `NotOwner` - If `owner` does not hold the token
    pub fn approve(
        e: Env,
        owner: Address,
        approved: Option<Address>,
        token_id: u32,
    ) -> Result<(), ContractError> {
        owner.require_auth();

        let current_owner = storage::get_owner(&e, token_id).ok_or(ContractError::TokenNotFound)?;
        if current_owner != owner {
            return Err(ContractError::NotOwner);
        }

        match &approved {
            Some(operator) => storage::set_approved(&e, token_id, operator),
            None => storage::clear_approved(&e, token_id),
        }

        e.events().publish(
            (symbol_short!("Approval"), token_id),
            (owner, approved),
        );

        Ok(())
    }

    // ========================================================================
    // Transfer
    // ========================================================================

    /// Transfer a token on behalf of `spender`
    ///
    /// `spender` must be the owner or hold the standing approval. The
    /// approval is cleared on success, so a listing backed by it becomes
    /// invalid once the token moves.
    ///
    /// # Errors
    /// * `TokenNotFound` - If the token does not exist
    /// * `NotAuthorized` - If `spender` is neither owner nor approved
    /// * `NotOwner` - If `from` is not the current owner
    pub fn transfer_from(
        e: Env,
        spender: Address,
        from: Address,
        to: Address,
        token_id: u32,
    ) -> Result<(), ContractError> {
        spender.require_auth();

        let owner = storage::get_owner(&e, token_id).ok_or(ContractError::TokenNotFound)?;

        let approved = storage::get_approved(&e, token_id);
        if spender != owner && approved != Some(spender) {
            return Err(ContractError::NotAuthorized);
        }
        if owner != from {
            return Err(ContractError::NotOwner);
        }

        storage::clear_approved(&e, token_id);
        storage::set_owner(&e, token_id, &to);
        storage::set_balance(&e, &from, storage::get_balance(&e, &from) - 1);
        storage::set_balance(&e, &to, storage::get_balance(&e, &to) + 1);

        e.events().publish(
            (symbol_short!("Transfer"), token_id),
            (Some(from), to),
        );

        Ok(())
    }

    // ========================================================================
    // Token Metadata
    // ========================================================================

    /// Render the token's metadata as a `data:application/json;base64,` URI
    ///
    /// The decoded JSON carries the badge name, a fixed description and a
    /// `data:image/svg+xml;base64,` image whose decoded markup contains the
    /// token id as literal text.
    ///
    /// # Errors
    /// * `TokenNotFound` - If the token does not exist
    pub fn token_uri(e: Env, token_id: u32) -> Result<String, ContractError> {
        storage::get_owner(&e, token_id).ok_or(ContractError::TokenNotFound)?;

        Ok(metadata::render_token_uri(&e, token_id))
    }
}
