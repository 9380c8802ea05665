//! Derived-address layout shared by the on-chain account constraints and any
//! off-chain client that needs to locate ledger accounts without an index.
//!
//! | account           | seeds                                              |
//! |-------------------|----------------------------------------------------|
//! | config            | `["config"]`                                       |
//! | reward mint       | `["rewards", config]`                              |
//! | user              | `["user", owner]`                                  |
//! | stake (native)    | `["stake", config, owner, "native", seed_le]`      |
//! | stake (token)     | `["stake", config, owner, tag, mint, seed_le]`     |
//! | vault             | `["vault", stake]`                                 |

use crate::state::AssetKind;
use anchor_lang::prelude::*;

pub const CONFIG_SEED: &[u8] = b"config";
pub const REWARD_MINT_SEED: &[u8] = b"rewards";
pub const USER_SEED: &[u8] = b"user";
pub const STAKE_SEED: &[u8] = b"stake";
pub const VAULT_SEED: &[u8] = b"vault";

pub const NATIVE_TAG: &[u8] = b"native";
pub const FUNGIBLE_TAG: &[u8] = b"fungible";
pub const NON_FUNGIBLE_TAG: &[u8] = b"nft";

// Token Metadata PDAs
pub const METADATA_SEED: &[u8] = b"metadata";
pub const EDITION_SEED: &[u8] = b"edition";

/// Address and bump for `tag` followed by `seeds`, under `program_id`.
pub fn derive(tag: &[u8], seeds: &[&[u8]], program_id: &Pubkey) -> (Pubkey, u8) {
    let mut all: Vec<&[u8]> = Vec::with_capacity(seeds.len() + 1);
    all.push(tag);
    all.extend_from_slice(seeds);
    Pubkey::find_program_address(&all, program_id)
}

pub fn config_address() -> (Pubkey, u8) {
    derive(CONFIG_SEED, &[], &crate::ID)
}

pub fn reward_mint_address(config: &Pubkey) -> (Pubkey, u8) {
    derive(REWARD_MINT_SEED, &[config.as_ref()], &crate::ID)
}

pub fn user_address(owner: &Pubkey) -> (Pubkey, u8) {
    derive(USER_SEED, &[owner.as_ref()], &crate::ID)
}

/// Stake instance address. `mint` is `None` for native stakes, which carry no
/// asset component in their seeds.
pub fn stake_address(
    config: &Pubkey,
    owner: &Pubkey,
    kind: AssetKind,
    mint: Option<&Pubkey>,
    seed: u64,
) -> (Pubkey, u8) {
    let seed_bytes = seed.to_le_bytes();
    match mint {
        Some(mint) => derive(
            STAKE_SEED,
            &[
                config.as_ref(),
                owner.as_ref(),
                kind.seed_tag(),
                mint.as_ref(),
                &seed_bytes,
            ],
            &crate::ID,
        ),
        None => derive(
            STAKE_SEED,
            &[config.as_ref(), owner.as_ref(), kind.seed_tag(), &seed_bytes],
            &crate::ID,
        ),
    }
}

pub fn vault_address(stake: &Pubkey) -> (Pubkey, u8) {
    derive(VAULT_SEED, &[stake.as_ref()], &crate::ID)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn addresses_are_deterministic() {
        let owner = Pubkey::new_unique();
        assert_eq!(user_address(&owner), user_address(&owner));
        assert_eq!(config_address(), config_address());
    }

    #[test]
    fn bump_recreates_the_address() {
        let (config, _) = config_address();
        let owner = Pubkey::new_unique();
        let (stake, bump) = stake_address(&config, &owner, AssetKind::Native, None, 42);
        let recreated = Pubkey::create_program_address(
            &[
                STAKE_SEED,
                config.as_ref(),
                owner.as_ref(),
                NATIVE_TAG,
                &42u64.to_le_bytes(),
                &[bump],
            ],
            &crate::ID,
        )
        .unwrap();
        assert_eq!(stake, recreated);
    }

    #[test]
    fn distinct_seed_tuples_do_not_collide() {
        let (config, _) = config_address();
        let owner = Pubkey::new_unique();
        let other = Pubkey::new_unique();
        let mint = Pubkey::new_unique();

        let addresses = [
            stake_address(&config, &owner, AssetKind::Native, None, 0).0,
            stake_address(&config, &owner, AssetKind::Native, None, 1).0,
            stake_address(&config, &other, AssetKind::Native, None, 0).0,
            stake_address(&config, &owner, AssetKind::Fungible, Some(&mint), 0).0,
            stake_address(&config, &owner, AssetKind::NonFungible, Some(&mint), 0).0,
            stake_address(&config, &owner, AssetKind::Fungible, Some(&mint), 1).0,
            user_address(&owner).0,
            config,
        ];
        let unique: HashSet<_> = addresses.iter().collect();
        assert_eq!(unique.len(), addresses.len());
    }

    #[test]
    fn vaults_are_scoped_to_their_stake() {
        let (config, _) = config_address();
        let owner = Pubkey::new_unique();
        let (first, _) = stake_address(&config, &owner, AssetKind::Native, None, 0);
        let (second, _) = stake_address(&config, &owner, AssetKind::Native, None, 1);
        assert_ne!(vault_address(&first).0, vault_address(&second).0);
        assert_ne!(vault_address(&first).0, first);
    }

    #[test]
    fn derived_addresses_are_off_curve() {
        let (mint, _) = reward_mint_address(&config_address().0);
        assert!(!mint.is_on_curve());
    }
}
