#![no_std]

use registry_interface::TokenRegistryClient;
use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, token, Address, Env, Symbol, Vec,
};


// ============================================================================
// Error Types
// ============================================================================

/// Marketplace errors
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum MarketplaceError {
    /// Marketplace not initialized
    NotInitialized = 1,
    /// Already initialized
    AlreadyInitialized = 2,
    /// Listing fee must be > 0
    InvalidFee = 3,
    /// Invalid price (must be > 0)
    InvalidPrice = 4,
    /// Supplied payment does not equal the required amount
    PaymentMismatch = 5,
    /// NFT must be approved to market
    AuthorizationMissing = 6,
    /// No matching market item
    ItemNotFound = 7,
    /// Caller is not the recorded seller
    NotSeller = 8,
    /// Item is not in the state required for this transition
    InvalidState = 9,
    /// Recorded seller no longer owns the token
    OwnershipMismatch = 10,
}

// ============================================================================
// Data Types
// ============================================================================

/// Lifecycle state of a market item. Transitions are one-directional:
/// `Created -> Released` or `Created -> Deleted`, both terminal.
#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ItemState {
    Created,
    Released,
    Deleted,
}

/// One record per listing attempt. Records are never erased; ids are never
/// reused.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MarketItem {
    pub id: u32,
    pub nft_contract: Address,
    pub token_id: u32,
    pub seller: Address,
    pub buyer: Option<Address>,
    pub price: i128,
    pub state: ItemState,
}

/// Storage keys
#[contracttype]
pub enum DataKey {
    /// Operator address: receives every listing fee
    Operator,
    /// Token contract used for all payments
    PaymentToken,
    /// Flat fee charged once per listing
    ListingFee,
    /// Counter for generating sequential item ids
    ItemCounter,
    /// Item records (item_id -> MarketItem)
    Item(u32),
}

// ============================================================================
// Storage Module
// ============================================================================

mod storage {
    use super::*;

    pub fn has_operator(e: &Env) -> bool {
        e.storage().instance().has(&DataKey::Operator)
    }

    pub fn get_operator(e: &Env) -> Option<Address> {
        e.storage().instance().get(&DataKey::Operator)
    }

    pub fn get_payment_token(e: &Env) -> Option<Address> {
        e.storage().instance().get(&DataKey::PaymentToken)
    }

    pub fn get_listing_fee(e: &Env) -> Option<i128> {
        e.storage().instance().get(&DataKey::ListingFee)
    }

    pub fn item_count(e: &Env) -> u32 {
        e.storage().instance().get(&DataKey::ItemCounter).unwrap_or(0)
    }

    pub fn next_item_id(e: &Env) -> u32 {
        let next = item_count(e) + 1;
        e.storage().instance().set(&DataKey::ItemCounter, &next);
        next
    }

    pub fn read_item(e: &Env, item_id: u32) -> Option<MarketItem> {
        e.storage().persistent().get(&DataKey::Item(item_id))
    }

    pub fn write_item(e: &Env, item: &MarketItem) {
        e.storage().persistent().set(&DataKey::Item(item.id), item);
    }

    /// Lowest-id `Created` item for the given token, if any.
    pub fn find_created_item(
        e: &Env,
        nft_contract: &Address,
        token_id: u32,
    ) -> Option<MarketItem> {
        let count = item_count(e);
        for id in 1..=count {
            if let Some(item) = read_item(e, id) {
                if item.state == ItemState::Created
                    && item.token_id == token_id
                    && item.nft_contract == *nft_contract
                {
                    return Some(item);
                }
            }
        }
        None
    }
}

// ============================================================================
// Contract Implementation
// ============================================================================

#[contract]
pub struct NFTMarketplace;

#[contractimpl]
impl NFTMarketplace {
    // ========================================================================
    // Initialization
    // ========================================================================

    /// Initialize the marketplace
    ///
    /// # Arguments
    /// * `operator` - Receives every listing fee
    /// * `payment_token` - Token contract used for fees and sale payments
    /// * `listing_fee` - Flat fee charged once per listing, immutable
    ///
    /// # Errors
    /// * `AlreadyInitialized` - If the marketplace has already been initialized
    /// * `InvalidFee` - If the listing fee is not positive
    pub fn initialize(
        e: Env,
        operator: Address,
        payment_token: Address,
        listing_fee: i128,
    ) -> Result<(), MarketplaceError> {
        if storage::has_operator(&e) {
            return Err(MarketplaceError::AlreadyInitialized);
        }

        operator.require_auth();

        if listing_fee <= 0 {
            return Err(MarketplaceError::InvalidFee);
        }

        e.storage().instance().set(&DataKey::Operator, &operator);
        e.storage()
            .instance()
            .set(&DataKey::PaymentToken, &payment_token);
        e.storage().instance().set(&DataKey::ListingFee, &listing_fee);
        e.storage().instance().set(&DataKey::ItemCounter, &0u32);

        Ok(())
    }

    /// Get the operator address
    pub fn get_operator(e: Env) -> Result<Address, MarketplaceError> {
        storage::get_operator(&e).ok_or(MarketplaceError::NotInitialized)
    }

    /// Get the payment token contract address
    pub fn get_payment_token(e: Env) -> Result<Address, MarketplaceError> {
        storage::get_payment_token(&e).ok_or(MarketplaceError::NotInitialized)
    }

    /// Get the flat listing fee
    pub fn get_listing_fee(e: Env) -> Result<i128, MarketplaceError> {
        storage::get_listing_fee(&e).ok_or(MarketplaceError::NotInitialized)
    }

    // ========================================================================
    // Listing
    // ========================================================================

    /// List a token for sale
    ///
    /// The seller must have approved this marketplace on the registry
    /// beforehand; the listing fee is transferred to the operator and is not
    /// refunded by any later deletion or sale.
    ///
    /// # Arguments
    /// * `seller` - The listing account (must authorize the call)
    /// * `nft_contract` - Registry holding the token
    /// * `token_id` - The token to list
    /// * `price` - Sale price, fixed for the life of the item
    /// * `payment` - Must equal the configured listing fee exactly
    ///
    /// # Returns
    /// The id of the new market item
    pub fn create_market_item(
        e: Env,
        seller: Address,
        nft_contract: Address,
        token_id: u32,
        price: i128,
        payment: i128,
    ) -> Result<u32, MarketplaceError> {
        seller.require_auth();

        // CHECKS
        let operator = storage::get_operator(&e).ok_or(MarketplaceError::NotInitialized)?;
        let payment_token =
            storage::get_payment_token(&e).ok_or(MarketplaceError::NotInitialized)?;
        let listing_fee = storage::get_listing_fee(&e).ok_or(MarketplaceError::NotInitialized)?;

        if price <= 0 {
            return Err(MarketplaceError::InvalidPrice);
        }
        if payment != listing_fee {
            return Err(MarketplaceError::PaymentMismatch);
        }

        let registry = TokenRegistryClient::new(&e, &nft_contract);
        if !registry.is_approved_or_owner(&e.current_contract_address(), &token_id) {
            return Err(MarketplaceError::AuthorizationMissing);
        }

        // EFFECTS
        let id = storage::next_item_id(&e);
        let item = MarketItem {
            id,
            nft_contract,
            token_id,
            seller: seller.clone(),
            buyer: None,
            price,
            state: ItemState::Created,
        };
        storage::write_item(&e, &item);

        // INTERACTIONS - listing fee to the operator
        token::Client::new(&e, &payment_token).transfer(&seller, &operator, &payment);

        // Emit event with the full item snapshot for off-chain indexers
        e.events()
            .publish((Symbol::new(&e, "MarketItemCreated"), id), item);

        Ok(id)
    }

    // ========================================================================
    // Sale
    // ========================================================================

    /// Buy a listed token
    ///
    /// The full payment goes to the seller; the marketplace takes no cut
    /// beyond the listing fee already charged. The sale fails if the seller
    /// moved the token out-of-band after listing, or revoked the
    /// marketplace's approval.
    ///
    /// # Arguments
    /// * `buyer` - The purchasing account (must authorize the call)
    /// * `nft_contract` - Registry holding the token
    /// * `token_id` - The listed token
    /// * `payment` - Must equal the item price exactly
    pub fn create_market_sale(
        e: Env,
        buyer: Address,
        nft_contract: Address,
        token_id: u32,
        payment: i128,
    ) -> Result<(), MarketplaceError> {
        buyer.require_auth();

        // CHECKS
        let payment_token =
            storage::get_payment_token(&e).ok_or(MarketplaceError::NotInitialized)?;

        let mut item = storage::find_created_item(&e, &nft_contract, token_id)
            .ok_or(MarketplaceError::ItemNotFound)?;

        if payment != item.price {
            return Err(MarketplaceError::PaymentMismatch);
        }

        let registry = TokenRegistryClient::new(&e, &nft_contract);
        let market = e.current_contract_address();
        if !registry.is_approved_or_owner(&market, &token_id) {
            return Err(MarketplaceError::AuthorizationMissing);
        }
        if registry.owner_of(&token_id) != item.seller {
            return Err(MarketplaceError::OwnershipMismatch);
        }

        // EFFECTS
        item.buyer = Some(buyer.clone());
        item.state = ItemState::Released;
        storage::write_item(&e, &item);

        // INTERACTIONS - payment straight to the seller, then the token to
        // the buyer; a failure in either reverts the whole invocation
        token::Client::new(&e, &payment_token).transfer(&buyer, &item.seller, &payment);
        registry.transfer_from(&market, &item.seller, &buyer, &token_id);

        e.events()
            .publish((Symbol::new(&e, "MarketItemSold"), item.id), item);

        Ok(())
    }

    // ========================================================================
    // Delisting
    // ========================================================================

    /// Withdraw a listing
    ///
    /// Only the recorded seller may delete, only while the item is still
    /// `Created`, and only while the marketplace still holds the registry
    /// approval for the token. The listing fee is forfeited.
    ///
    /// # Errors
    /// * `ItemNotFound` - If no item with `item_id` exists
    /// * `NotSeller` - If the caller is not the recorded seller
    /// * `InvalidState` - If the item was already released or deleted
    /// * `AuthorizationMissing` - If the registry approval is gone
    pub fn delete_market_item(
        e: Env,
        seller: Address,
        item_id: u32,
    ) -> Result<(), MarketplaceError> {
        seller.require_auth();

        // CHECKS
        let mut item = storage::read_item(&e, item_id).ok_or(MarketplaceError::ItemNotFound)?;

        if item.seller != seller {
            return Err(MarketplaceError::NotSeller);
        }
        if item.state != ItemState::Created {
            return Err(MarketplaceError::InvalidState);
        }

        let registry = TokenRegistryClient::new(&e, &item.nft_contract);
        if !registry.is_approved_or_owner(&e.current_contract_address(), &item.token_id) {
            return Err(MarketplaceError::AuthorizationMissing);
        }

        // EFFECTS
        item.state = ItemState::Deleted;
        storage::write_item(&e, &item);

        e.events()
            .publish((Symbol::new(&e, "MarketItemDeleted"), item_id), item);

        Ok(())
    }

    // ========================================================================
    // Query Functions
    // ========================================================================

    /// Get a market item by id
    pub fn get_item(e: Env, item_id: u32) -> Result<MarketItem, MarketplaceError> {
        storage::read_item(&e, item_id).ok_or(MarketplaceError::ItemNotFound)
    }

    /// All items still open for sale, in ascending id order.
    ///
    /// Unbounded full scan over the item store; safe on an empty store.
    pub fn fetch_active_items(e: Env) -> Vec<MarketItem> {
        let count = storage::item_count(&e);
        let mut items = Vec::new(&e);
        for id in 1..=count {
            if let Some(item) = storage::read_item(&e, id) {
                if item.state == ItemState::Created {
                    items.push_back(item);
                }
            }
        }
        items
    }

    /// Every item ever listed by `account`, in ascending id order.
    ///
    /// Deleted and released items are included: this is the account's
    /// historical record, not a view of current holdings.
    pub fn fetch_my_created_items(e: Env, account: Address) -> Vec<MarketItem> {
        let count = storage::item_count(&e);
        let mut items = Vec::new(&e);
        for id in 1..=count {
            if let Some(item) = storage::read_item(&e, id) {
                if item.seller == account {
                    items.push_back(item);
                }
            }
        }
        items
    }

    /// Items `account` has bought, in ascending id order.
    pub fn fetch_my_purchased_items(e: Env, account: Address) -> Vec<MarketItem> {
        let count = storage::item_count(&e);
        let mut items = Vec::new(&e);
        for id in 1..=count {
            if let Some(item) = storage::read_item(&e, id) {
                if item.state == ItemState::Released && item.buyer == Some(account.clone()) {
                    items.push_back(item);
                }
            }
        }
        items
    }
}
