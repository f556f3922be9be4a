//! Integration Test Harness
//!
//! This module provides a reusable test harness that:
//! - Boots a Soroban Env
//! - Deploys the badge registry, the marketplace and a payment token
//! - Creates test accounts (operator/seller/buyer/attacker)
//! - Seeds token balances
//! - Provides typed contract clients and balance helpers

use soroban_sdk::{
    testutils::{Address as _, Ledger, LedgerInfo},
    token::{Client as TokenClient, StellarAssetClient},
    Address, Env, String,
};

use badge_nft::{BadgeTokenContract, BadgeTokenContractClient};
use nft_marketplace::{NFTMarketplace, NFTMarketplaceClient};

/// Flat listing fee charged per market item (0.025 units, 7 decimals)
pub const LISTING_FEE: i128 = 250_000;

/// Sale price used throughout the suites (1 unit, 7 decimals)
pub const PRICE: i128 = 10_000_000;

/// Balance every test account starts with (1000 units, 7 decimals)
pub const DEFAULT_USER_BALANCE: i128 = 10_000_000_000;

/// Test accounts container
pub struct TestAccounts {
    pub operator: Address,
    pub seller: Address,
    pub buyer: Address,
    pub attacker: Address,
}

impl TestAccounts {
    /// Create new test accounts
    pub fn new(e: &Env) -> Self {
        Self {
            operator: Address::generate(e),
            seller: Address::generate(e),
            buyer: Address::generate(e),
            attacker: Address::generate(e),
        }
    }
}

/// Deployed contract addresses
pub struct DeployedContracts {
    pub badge: Address,
    pub marketplace: Address,
    pub token: Address,
}

/// Main test harness structure
pub struct TestHarness {
    pub env: Env,
    pub accounts: TestAccounts,
    pub contracts: DeployedContracts,
}

impl TestHarness {
    /// Create a new test harness with all contracts deployed and initialized
    pub fn new() -> Self {
        let env = Env::default();
        env.mock_all_auths();

        // Set initial ledger state
        env.ledger().set(LedgerInfo {
            timestamp: 1704067200, // Jan 1, 2024 00:00:00 UTC
            protocol_version: 22,
            sequence_number: 1,
            network_id: Default::default(),
            base_reserve: 10,
            min_temp_entry_ttl: 1000,
            min_persistent_entry_ttl: 1000,
            max_entry_ttl: 10000,
        });

        let accounts = TestAccounts::new(&env);

        // Deploy payment token (Stellar Asset Contract)
        let token_admin = Address::generate(&env);
        let token = env.register_stellar_asset_contract_v2(token_admin);
        let token_address = token.address();

        // Deploy contracts
        let badge = env.register_contract(None, BadgeTokenContract);
        let marketplace = env.register_contract(None, NFTMarketplace);

        // Initialize the badge collection
        let badge_client = BadgeTokenContractClient::new(&env, &badge);
        badge_client.initialize(
            &String::from_str(&env, "BadgeToken"),
            &String::from_str(&env, "BADGE"),
        );

        // Initialize the marketplace
        let market_client = NFTMarketplaceClient::new(&env, &marketplace);
        market_client.initialize(&accounts.operator, &token_address, &LISTING_FEE);

        // Mint payment tokens to users
        let token_client = StellarAssetClient::new(&env, &token_address);
        token_client.mint(&accounts.seller, &DEFAULT_USER_BALANCE);
        token_client.mint(&accounts.buyer, &DEFAULT_USER_BALANCE);
        token_client.mint(&accounts.attacker, &DEFAULT_USER_BALANCE);

        let contracts = DeployedContracts {
            badge,
            marketplace,
            token: token_address,
        };

        Self {
            env,
            accounts,
            contracts,
        }
    }

    // ========================================================================
    // Typed Clients
    // ========================================================================

    /// Client for the badge registry
    pub fn badge(&self) -> BadgeTokenContractClient<'_> {
        BadgeTokenContractClient::new(&self.env, &self.contracts.badge)
    }

    /// Client for the marketplace
    pub fn market(&self) -> NFTMarketplaceClient<'_> {
        NFTMarketplaceClient::new(&self.env, &self.contracts.marketplace)
    }

    /// Client for the payment token
    pub fn token_client(&self) -> TokenClient<'_> {
        TokenClient::new(&self.env, &self.contracts.token)
    }

    // ========================================================================
    // Balance Helpers
    // ========================================================================

    /// Payment token balance of an account
    pub fn balance(&self, account: &Address) -> i128 {
        self.token_client().balance(account)
    }

    // ========================================================================
    // Flow Helpers
    // ========================================================================

    /// Mint a badge to `owner` and return its token id
    pub fn mint_badge(&self, owner: &Address) -> u32 {
        self.badge().mint_to(owner)
    }

    /// Grant the marketplace the transfer approval for a token
    pub fn approve_to_market(&self, owner: &Address, token_id: u32) {
        self.badge()
            .approve(owner, &Some(self.contracts.marketplace.clone()), &token_id);
    }

    /// Mint, approve and list a badge at `PRICE`. Returns (token_id, item_id).
    pub fn mint_and_list(&self, seller: &Address) -> (u32, u32) {
        let token_id = self.mint_badge(seller);
        self.approve_to_market(seller, token_id);
        let item_id = self.market().create_market_item(
            seller,
            &self.contracts.badge,
            &token_id,
            &PRICE,
            &LISTING_FEE,
        );
        (token_id, item_id)
    }
}
