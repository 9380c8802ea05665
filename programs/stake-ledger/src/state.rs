use crate::address::{FUNGIBLE_TAG, NATIVE_TAG, NON_FUNGIBLE_TAG};
use crate::error::CustomErrorCode;
use crate::reward::RewardPolicy;
use anchor_lang::prelude::*;

/// Upper bound on both the configured floor and any per-stake lock request.
pub const MAX_LOCK_SECONDS: i64 = 365 * 24 * 60 * 60;

/// The three asset kinds the ledger accepts.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssetKind {
    Native,
    Fungible,
    NonFungible,
}

impl AssetKind {
    /// Seed component that keeps the stake namespaces of each kind disjoint.
    pub fn seed_tag(&self) -> &'static [u8] {
        match self {
            AssetKind::Native => NATIVE_TAG,
            AssetKind::Fungible => FUNGIBLE_TAG,
            AssetKind::NonFungible => NON_FUNGIBLE_TAG,
        }
    }
}

/// Reward units per whole staked unit, one entry per asset kind.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct RewardRates {
    pub native: u64,
    pub fungible: u64,
    pub non_fungible: u64,
    /// Annual percentage rate, in basis points, applied at close to stakes
    /// opened as locked.
    pub locked_apr_bps: u64,
}

impl RewardRates {
    pub const LEN: usize = 8 + 8 + 8 + 8;

    pub fn rate(&self, kind: AssetKind) -> u64 {
        match kind {
            AssetKind::Native => self.native,
            AssetKind::Fungible => self.fungible,
            AssetKind::NonFungible => self.non_fungible,
        }
    }
}

/// What a stake instance holds in escrow.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StakedAsset {
    Native,
    Fungible { mint: Pubkey },
    NonFungible { mint: Pubkey, collection: Pubkey },
}

impl StakedAsset {
    pub const LEN: usize = 1 + 32 + 32; // tag + largest variant

    pub fn kind(&self) -> AssetKind {
        match self {
            StakedAsset::Native => AssetKind::Native,
            StakedAsset::Fungible { .. } => AssetKind::Fungible,
            StakedAsset::NonFungible { .. } => AssetKind::NonFungible,
        }
    }

    /// Mint identity for token-backed stakes, `None` for native.
    pub fn mint(&self) -> Option<Pubkey> {
        match self {
            StakedAsset::Native => None,
            StakedAsset::Fungible { mint } | StakedAsset::NonFungible { mint, .. } => Some(*mint),
        }
    }
}

#[account]
pub struct Config {
    pub admin: Pubkey,
    pub reward_mint: Pubkey,
    pub rates: RewardRates,
    pub min_lock_seconds: i64,
    pub reward_policy: RewardPolicy,
    pub bump: u8,
    pub reward_mint_bump: u8,
}

impl Config {
    pub const LEN: usize = 8 + 32 + 32 + RewardRates::LEN + 8 + 1 + 1 + 1;

    pub fn is_initialized(&self) -> bool {
        self.admin != Pubkey::default()
    }

    pub fn validate_min_lock(min_lock_seconds: i64) -> Result<()> {
        require!(
            (0..=MAX_LOCK_SECONDS).contains(&min_lock_seconds),
            CustomErrorCode::InvalidLockDuration
        );
        Ok(())
    }

    /// Lock applied to a new stake: the request clamped up to the configured floor.
    pub fn effective_lock(&self, requested: Option<i64>) -> Result<i64> {
        let requested = requested.unwrap_or(self.min_lock_seconds);
        require!(
            requested <= MAX_LOCK_SECONDS,
            CustomErrorCode::InvalidLockDuration
        );
        Ok(requested.max(self.min_lock_seconds))
    }
}

#[account]
pub struct UserAccount {
    pub owner: Pubkey,
    pub points: u64,
    pub sol_staked: u64,
    pub spl_staked: u64,
    pub nft_staked_amount: u32,
    pub open_stakes: u32,
    pub created_at: i64,
    pub bump: u8,
}

impl UserAccount {
    pub const LEN: usize = 8 + 32 + 8 + 8 + 8 + 4 + 4 + 8 + 1;

    pub fn is_initialized(&self) -> bool {
        self.owner != Pubkey::default()
    }

    pub fn initialize(&mut self, owner: Pubkey, bump: u8, now: i64) {
        self.owner = owner;
        self.points = 0;
        self.sol_staked = 0;
        self.spl_staked = 0;
        self.nft_staked_amount = 0;
        self.open_stakes = 0;
        self.created_at = now;
        self.bump = bump;
    }

    /// Books a new stake and its opening credit. Nothing is written unless
    /// every counter update succeeds.
    pub fn record_stake(&mut self, kind: AssetKind, amount: u64, credit: u64) -> Result<()> {
        let mut next = self.totals();
        match kind {
            AssetKind::Native => next.sol = checked_add(next.sol, amount)?,
            AssetKind::Fungible => next.spl = checked_add(next.spl, amount)?,
            AssetKind::NonFungible => {
                next.nft = next
                    .nft
                    .checked_add(1)
                    .ok_or(CustomErrorCode::ArithmeticOverflow)?
            }
        }
        next.open = next
            .open
            .checked_add(1)
            .ok_or(CustomErrorCode::ArithmeticOverflow)?;
        next.points = checked_add(next.points, credit)?;
        self.apply(next);
        Ok(())
    }

    /// Books a closed stake and its closing credit.
    pub fn record_unstake(&mut self, kind: AssetKind, amount: u64, credit: u64) -> Result<()> {
        let mut next = self.totals();
        match kind {
            AssetKind::Native => next.sol = checked_sub(next.sol, amount)?,
            AssetKind::Fungible => next.spl = checked_sub(next.spl, amount)?,
            AssetKind::NonFungible => {
                next.nft = next
                    .nft
                    .checked_sub(1)
                    .ok_or(CustomErrorCode::ArithmeticOverflow)?
            }
        }
        next.open = next
            .open
            .checked_sub(1)
            .ok_or(CustomErrorCode::ArithmeticOverflow)?;
        next.points = checked_add(next.points, credit)?;
        self.apply(next);
        Ok(())
    }

    fn totals(&self) -> Totals {
        Totals {
            points: self.points,
            sol: self.sol_staked,
            spl: self.spl_staked,
            nft: self.nft_staked_amount,
            open: self.open_stakes,
        }
    }

    fn apply(&mut self, totals: Totals) {
        self.points = totals.points;
        self.sol_staked = totals.sol;
        self.spl_staked = totals.spl;
        self.nft_staked_amount = totals.nft;
        self.open_stakes = totals.open;
    }
}

struct Totals {
    points: u64,
    sol: u64,
    spl: u64,
    nft: u32,
    open: u32,
}

#[account]
pub struct StakeAccount {
    pub owner: Pubkey,
    pub asset: StakedAsset,
    pub amount: u64,
    pub seed: u64,
    pub staked_at: i64,
    pub lock_seconds: i64,
    /// Non-fungible only: the asset sits frozen in the owner's holding account,
    /// which is the escrow for this stake. The vault stays empty.
    pub frozen: bool,
    /// Opened as a locked staker, earning the locked APR bonus at close.
    pub locked: bool,
    pub reward_credited: u64,
    pub bump: u8,
    pub vault_bump: u8,
}

impl StakeAccount {
    pub const LEN: usize = 8 + 32 + StakedAsset::LEN + 8 + 8 + 8 + 8 + 1 + 1 + 8 + 1 + 1;

    /// A freshly allocated account deserializes with a zeroed owner.
    pub fn is_open(&self) -> bool {
        self.owner != Pubkey::default()
    }

    pub fn unlocks_at(&self) -> Result<i64> {
        self.staked_at
            .checked_add(self.lock_seconds)
            .ok_or_else(|| error!(CustomErrorCode::ArithmeticOverflow))
    }

    /// Checks that `owner` may close this stake and that it holds the asset the
    /// caller names.
    pub fn ensure_held_by(
        &self,
        owner: &Pubkey,
        kind: AssetKind,
        mint: Option<Pubkey>,
    ) -> Result<()> {
        require!(self.owner == *owner, CustomErrorCode::Unauthorized);
        require!(self.asset.kind() == kind, CustomErrorCode::InvalidStakeKind);
        require!(self.asset.mint() == mint, CustomErrorCode::InvalidStakeMint);
        Ok(())
    }

    /// Seconds the stake has been open, failing while the lock still holds.
    pub fn ensure_unlocked(&self, now: i64) -> Result<i64> {
        let elapsed = now
            .checked_sub(self.staked_at)
            .ok_or(CustomErrorCode::ArithmeticOverflow)?;
        require!(
            elapsed >= self.lock_seconds,
            CustomErrorCode::LockNotExpired
        );
        Ok(elapsed)
    }
}

fn checked_add(a: u64, b: u64) -> Result<u64> {
    a.checked_add(b)
        .ok_or_else(|| error!(CustomErrorCode::ArithmeticOverflow))
}

fn checked_sub(a: u64, b: u64) -> Result<u64> {
    a.checked_sub(b)
        .ok_or_else(|| error!(CustomErrorCode::ArithmeticOverflow))
}
