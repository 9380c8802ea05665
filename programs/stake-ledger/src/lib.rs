#![allow(unexpected_cfgs)]

pub mod account_structs;
pub mod address;
/// # stake ledger - Multi-Asset Staking System
///
/// ## Business Process Flow
///
/// 1. Initial Setup:
///    - The program's upgrade authority initializes the config with reward
///      rates per asset kind, a minimum lock duration and a reward policy
///    - A reward mint is created whose mint authority is the config PDA
///
/// 2. User Staking Flow:
///    a. Native (SOL):
///       - Lamports move into a vault PDA owned by the system program
///    b. Fungible (SPL):
///       - Tokens move into a vault token account owned by the stake PDA
///    c. Non-fungible (verified collection NFT):
///       - Either escrowed in a vault token account, or frozen in place in the
///         owner's token account with the stake PDA as delegate
///    Each stake is its own PDA keyed by a caller-chosen seed, so the same
///    user can hold many concurrent stakes of one asset with independent
///    lock clocks. Reward tokens are minted to the user on open.
///
/// 3. Withdrawal Flow:
///    - Once the stake's lock period has elapsed the owner unstakes
///    - The full vault balance is returned (or the NFT is thawed)
///    - A closing reward is minted according to the config's reward policy
///    - The stake account and vault are closed and rent returned
///
/// 4. Administrative Functions:
///    - Update reward rates, minimum lock and reward policy
///
/// All custody moves happen through PDA-signed CPIs, and every instruction
/// validates before it mutates, so a failed call leaves no partial state.
pub mod error;
pub mod events;
mod guard;
pub mod processor;
pub mod reward;
pub mod state;

use account_structs::*;
use anchor_lang::prelude::*;
use reward::RewardPolicy;
use state::RewardRates;

declare_id!("EcaiCRTvbHhGbiLGNjZNvWNgMxBsjA2fQdcgp8F4Snyj");

#[program]
pub mod stake_ledger {
    use super::*;

    /// Creates the config and reward mint. Callable once, by the program's
    /// upgrade authority, who becomes the config admin.
    pub fn initialize_config(
        ctx: Context<InitializeConfig>,
        native_rate: u64,
        fungible_rate: u64,
        non_fungible_rate: u64,
        locked_apr_bps: u64,
        min_lock_seconds: i64,
        reward_policy: RewardPolicy,
    ) -> Result<()> {
        processor::initialize_config(
            ctx,
            RewardRates {
                native: native_rate,
                fungible: fungible_rate,
                non_fungible: non_fungible_rate,
                locked_apr_bps,
            },
            min_lock_seconds,
            reward_policy,
        )
    }

    /// Replaces the rate table, minimum lock and reward policy (admin only).
    /// Open stakes keep the lock and opening credit they recorded.
    pub fn update_config(
        ctx: Context<UpdateConfig>,
        rates: RewardRates,
        min_lock_seconds: i64,
        reward_policy: RewardPolicy,
    ) -> Result<()> {
        processor::update_config(ctx, rates, min_lock_seconds, reward_policy)
    }

    /// Creates the caller's user account. Stake instructions also create it on
    /// first use.
    pub fn initialize_user(ctx: Context<InitializeUser>) -> Result<()> {
        processor::initialize_user(ctx)
    }

    /// Locks `amount` lamports in a new stake instance identified by `seed`.
    /// A `locked` stake earns the config's locked APR bonus when it closes.
    pub fn stake_native(
        ctx: Context<StakeNative>,
        seed: u64,
        amount: u64,
        locked: bool,
        lock_seconds: Option<i64>,
    ) -> Result<()> {
        processor::stake_native(ctx, seed, amount, locked, lock_seconds)
    }

    /// Returns every lamport in the vault once the lock has elapsed.
    pub fn unstake_native(ctx: Context<UnstakeNative>) -> Result<()> {
        processor::unstake_native(ctx)
    }

    /// Locks `amount` base units of `mint` in a new stake instance.
    pub fn stake_fungible(
        ctx: Context<StakeFungible>,
        seed: u64,
        amount: u64,
        locked: bool,
        lock_seconds: Option<i64>,
    ) -> Result<()> {
        processor::stake_fungible(ctx, seed, amount, locked, lock_seconds)
    }

    /// Drains the token vault back to the owner and closes it.
    pub fn unstake_fungible(ctx: Context<UnstakeFungible>) -> Result<()> {
        processor::unstake_fungible(ctx)
    }

    /// Stakes a verified-collection NFT. With `freeze` the NFT stays in the
    /// owner's token account, frozen; otherwise it moves into the vault.
    pub fn stake_non_fungible(
        ctx: Context<StakeNonFungible>,
        seed: u64,
        freeze: bool,
        locked: bool,
        lock_seconds: Option<i64>,
    ) -> Result<()> {
        processor::stake_non_fungible(ctx, seed, freeze, locked, lock_seconds)
    }

    /// Thaws a frozen NFT, or moves an escrowed one back to the owner.
    pub fn unstake_non_fungible(ctx: Context<UnstakeNonFungible>) -> Result<()> {
        processor::unstake_non_fungible(ctx)
    }
}
