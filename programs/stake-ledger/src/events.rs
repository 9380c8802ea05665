use crate::reward::RewardPolicy;
use crate::state::{AssetKind, RewardRates};
use anchor_lang::prelude::*;

#[event]
pub struct ConfigInitialized {
    pub admin: Pubkey,
    pub reward_mint: Pubkey,
    pub rates: RewardRates,
    pub min_lock_seconds: i64,
    pub reward_policy: RewardPolicy,
}

#[event]
pub struct ConfigUpdated {
    pub admin: Pubkey,
    pub old_rates: RewardRates,
    pub new_rates: RewardRates,
    pub old_min_lock_seconds: i64,
    pub new_min_lock_seconds: i64,
    pub reward_policy: RewardPolicy,
}

#[event]
pub struct UserInitialized {
    pub user: Pubkey,
    pub user_account: Pubkey,
}

#[event]
pub struct StakeOpened {
    pub user: Pubkey,
    pub stake: Pubkey,
    pub kind: AssetKind,
    pub mint: Option<Pubkey>,
    pub amount: u64,
    pub seed: u64,
    pub lock_seconds: i64,
    pub frozen: bool,
    pub locked: bool,
    pub reward: u64,
}

#[event]
pub struct StakeClosed {
    pub user: Pubkey,
    pub stake: Pubkey,
    pub kind: AssetKind,
    pub mint: Option<Pubkey>,
    pub amount: u64,
    pub elapsed_seconds: i64,
    pub reward: u64,
}
