#![no_std]

//! Cross-contract interface for NFT registries.
//!
//! The marketplace is generic over any contract that tracks token
//! ownership and transfer approvals. This crate declares that capability
//! set as a trait and derives the typed client the marketplace uses to
//! talk to a registry by address, so multiple collections can list on a
//! single marketplace instance.

use soroban_sdk::{contractclient, Address, Env};

/// Capability set the marketplace requires from an NFT registry.
///
/// `badge_nft` implements this surface; any other contract exposing the
/// same entrypoints can be listed as well.
#[contractclient(name = "TokenRegistryClient")]
pub trait TokenRegistry {
    /// Current owner of `token_id`. Fails if the token has not been minted.
    fn owner_of(e: Env, token_id: u32) -> Address;

    /// Whether `spender` may move `token_id` — it owns the token or holds
    /// the standing approval. Never fails; unknown tokens report `false`.
    fn is_approved_or_owner(e: Env, spender: Address, token_id: u32) -> bool;

    /// Move `token_id` from `from` to `to` on behalf of `spender`.
    ///
    /// Fails unless `spender` is approved-or-owner and `from` is the
    /// current owner. Clears any standing approval on success.
    fn transfer_from(e: Env, spender: Address, from: Address, to: Address, token_id: u32);
}
