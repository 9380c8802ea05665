use crate::error::CustomErrorCode;
use crate::state::{AssetKind, RewardRates};
use anchor_lang::prelude::*;

/// Decimals of the reward mint created at config initialization.
pub const REWARD_DECIMALS: u8 = 9;
/// Lamports per SOL, expressed as decimals.
pub const NATIVE_DECIMALS: u8 = 9;
/// Accrual window under `RewardPolicy::ElapsedAccrual`: one opening credit per day.
pub const ACCRUAL_PERIOD_SECONDS: u64 = 86_400;
/// Basis points in one whole, for `RewardRates::locked_apr_bps`.
pub const BPS_DENOMINATOR: u128 = 10_000;

/// How much is credited when a stake closes.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RewardPolicy {
    /// Rewards are paid once, when the stake opens.
    StakeEventOnly,
    /// On close, the opening credit is paid again per accrual period the stake
    /// stayed open, prorated to the second.
    ElapsedAccrual,
}

impl RewardPolicy {
    /// Reward base units credited when a stake closes after `elapsed_seconds`.
    /// Locked stakes pass the config's `locked_apr_bps` and additionally earn
    /// that share of everything the stake was credited.
    pub fn closing_credit(
        &self,
        opening_credit: u64,
        elapsed_seconds: i64,
        locked_apr_bps: Option<u64>,
    ) -> Result<u64> {
        let accrued = match self {
            RewardPolicy::StakeEventOnly => 0,
            RewardPolicy::ElapsedAccrual => {
                let elapsed = u128::try_from(elapsed_seconds)
                    .map_err(|_| error!(CustomErrorCode::ArithmeticOverflow))?;
                (opening_credit as u128)
                    .checked_mul(elapsed)
                    .ok_or(CustomErrorCode::ArithmeticOverflow)?
                    / ACCRUAL_PERIOD_SECONDS as u128
            }
        };

        let bonus = match locked_apr_bps {
            None => 0,
            Some(bps) => (opening_credit as u128)
                .checked_add(accrued)
                .and_then(|earned| earned.checked_mul(bps as u128))
                .ok_or(CustomErrorCode::ArithmeticOverflow)?
                / BPS_DENOMINATOR,
        };

        narrow(
            accrued
                .checked_add(bonus)
                .ok_or(CustomErrorCode::ArithmeticOverflow)?,
        )
    }
}

/// Reward base units credited when a stake of `amount` base units opens.
///
/// Native and fungible credits are `amount * rate` per whole unit, so the
/// asset's decimals form the denominator. Non-fungible stakes earn the flat
/// rate regardless of `amount`.
pub fn opening_credit(
    kind: AssetKind,
    amount: u64,
    asset_decimals: u8,
    rates: &RewardRates,
) -> Result<u64> {
    let rate = rates.rate(kind) as u128;
    let reward_unit = pow10(REWARD_DECIMALS)?;
    let credit = match kind {
        AssetKind::NonFungible => rate.checked_mul(reward_unit),
        AssetKind::Native | AssetKind::Fungible => {
            let decimals = match kind {
                AssetKind::Native => NATIVE_DECIMALS,
                _ => asset_decimals,
            };
            let asset_unit = pow10(decimals)?;
            (amount as u128)
                .checked_mul(rate)
                .and_then(|v| v.checked_mul(reward_unit))
                .map(|v| v / asset_unit)
        }
    }
    .ok_or(CustomErrorCode::ArithmeticOverflow)?;
    narrow(credit)
}

fn pow10(decimals: u8) -> Result<u128> {
    10u128
        .checked_pow(decimals as u32)
        .ok_or_else(|| error!(CustomErrorCode::ArithmeticOverflow))
}

fn narrow(value: u128) -> Result<u64> {
    u64::try_from(value).map_err(|_| error!(CustomErrorCode::ArithmeticOverflow))
}
