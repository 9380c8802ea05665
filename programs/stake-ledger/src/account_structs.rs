use crate::address::*;
use crate::error::*;
use crate::reward::REWARD_DECIMALS;
use crate::state::*;
use anchor_lang::prelude::*;
use anchor_spl::associated_token::AssociatedToken;
use anchor_spl::metadata::{MasterEditionAccount, Metadata, MetadataAccount};
use anchor_spl::token::{Mint, Token, TokenAccount};

use anchor_lang::solana_program::bpf_loader_upgradeable::{self};

#[derive(Accounts)]
pub struct InitializeConfig<'info> {
    #[account(mut)]
    pub signer: Signer<'info>,

    // init_if_needed so a second call reaches the handler and fails with
    // AlreadyInitialized instead of a system program error
    #[account(
        init_if_needed,
        payer = signer,
        space = Config::LEN,
        seeds = [CONFIG_SEED],
        bump
    )]
    pub config: Box<Account<'info, Config>>,

    /// Reward token, minted only by the config PDA.
    #[account(
        init_if_needed,
        payer = signer,
        seeds = [REWARD_MINT_SEED, config.key().as_ref()],
        bump,
        mint::decimals = REWARD_DECIMALS,
        mint::authority = config,
    )]
    pub reward_mint: Box<Account<'info, Mint>>,

    /// CHECK: This is the program data account that contains the update authority
    #[account(
        constraint = program_data.key() == get_program_data_address(&crate::id()) @ CustomErrorCode::InvalidProgramData
    )]
    pub program_data: UncheckedAccount<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct UpdateConfig<'info> {
    #[account(
        mut,
        seeds = [CONFIG_SEED],
        bump = config.bump,
        has_one = admin @ CustomErrorCode::Unauthorized
    )]
    pub config: Account<'info, Config>,

    pub admin: Signer<'info>,
}

#[derive(Accounts)]
pub struct InitializeUser<'info> {
    #[account(mut)]
    pub signer: Signer<'info>,

    #[account(
        init_if_needed,
        payer = signer,
        space = UserAccount::LEN,
        seeds = [USER_SEED, signer.key().as_ref()],
        bump
    )]
    pub user_account: Account<'info, UserAccount>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
#[instruction(seed: u64)]
pub struct StakeNative<'info> {
    #[account(mut)]
    pub user: Signer<'info>,

    #[account(
        seeds = [CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Box<Account<'info, Config>>,

    #[account(
        mut,
        seeds = [REWARD_MINT_SEED, config.key().as_ref()],
        bump = config.reward_mint_bump,
        constraint = reward_mint.key() == config.reward_mint @ CustomErrorCode::InvalidRewardMint
    )]
    pub reward_mint: Box<Account<'info, Mint>>,

    #[account(
        init_if_needed,
        payer = user,
        associated_token::mint = reward_mint,
        associated_token::authority = user,
    )]
    pub user_reward_account: Box<Account<'info, TokenAccount>>,

    #[account(
        init_if_needed,
        payer = user,
        space = UserAccount::LEN,
        seeds = [USER_SEED, user.key().as_ref()],
        bump
    )]
    pub user_account: Box<Account<'info, UserAccount>>,

    #[account(
        init_if_needed,
        payer = user,
        space = StakeAccount::LEN,
        seeds = [
            STAKE_SEED,
            config.key().as_ref(),
            user.key().as_ref(),
            NATIVE_TAG,
            seed.to_le_bytes().as_ref()
        ],
        bump
    )]
    pub stake_account: Box<Account<'info, StakeAccount>>,

    /// Lamport escrow for this stake; a plain system account signed for by seeds.
    #[account(
        mut,
        seeds = [VAULT_SEED, stake_account.key().as_ref()],
        bump
    )]
    pub vault: SystemAccount<'info>,

    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct UnstakeNative<'info> {
    #[account(mut)]
    pub user: Signer<'info>,

    #[account(
        seeds = [CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Box<Account<'info, Config>>,

    /// CHECK: Loaded by the handler, which reports a missing stake as
    /// AccountNotFound and checks owner, kind, mint and address.
    #[account(mut)]
    pub stake_account: UncheckedAccount<'info>,

    #[account(
        mut,
        seeds = [VAULT_SEED, stake_account.key().as_ref()],
        bump
    )]
    pub vault: SystemAccount<'info>,

    #[account(
        mut,
        seeds = [USER_SEED, user.key().as_ref()],
        bump = user_account.bump
    )]
    pub user_account: Box<Account<'info, UserAccount>>,

    #[account(
        mut,
        seeds = [REWARD_MINT_SEED, config.key().as_ref()],
        bump = config.reward_mint_bump,
        constraint = reward_mint.key() == config.reward_mint @ CustomErrorCode::InvalidRewardMint
    )]
    pub reward_mint: Box<Account<'info, Mint>>,

    #[account(
        init_if_needed,
        payer = user,
        associated_token::mint = reward_mint,
        associated_token::authority = user,
    )]
    pub user_reward_account: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
#[instruction(seed: u64)]
pub struct StakeFungible<'info> {
    #[account(mut)]
    pub user: Signer<'info>,

    #[account(
        seeds = [CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Box<Account<'info, Config>>,

    pub mint: Box<Account<'info, Mint>>,

    #[account(
        mut,
        token::mint = mint,
        token::authority = user
    )]
    pub user_token_account: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        seeds = [REWARD_MINT_SEED, config.key().as_ref()],
        bump = config.reward_mint_bump,
        constraint = reward_mint.key() == config.reward_mint @ CustomErrorCode::InvalidRewardMint
    )]
    pub reward_mint: Box<Account<'info, Mint>>,

    #[account(
        init_if_needed,
        payer = user,
        associated_token::mint = reward_mint,
        associated_token::authority = user,
    )]
    pub user_reward_account: Box<Account<'info, TokenAccount>>,

    #[account(
        init_if_needed,
        payer = user,
        space = UserAccount::LEN,
        seeds = [USER_SEED, user.key().as_ref()],
        bump
    )]
    pub user_account: Box<Account<'info, UserAccount>>,

    #[account(
        init_if_needed,
        payer = user,
        space = StakeAccount::LEN,
        seeds = [
            STAKE_SEED,
            config.key().as_ref(),
            user.key().as_ref(),
            FUNGIBLE_TAG,
            mint.key().as_ref(),
            seed.to_le_bytes().as_ref()
        ],
        bump
    )]
    pub stake_account: Box<Account<'info, StakeAccount>>,

    /// Token escrow owned by the stake account.
    #[account(
        init_if_needed,
        payer = user,
        seeds = [VAULT_SEED, stake_account.key().as_ref()],
        bump,
        token::mint = mint,
        token::authority = stake_account,
    )]
    pub vault: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct UnstakeFungible<'info> {
    #[account(mut)]
    pub user: Signer<'info>,

    #[account(
        seeds = [CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Box<Account<'info, Config>>,

    /// CHECK: Loaded by the handler, which reports a missing stake as
    /// AccountNotFound and checks owner, kind, mint and address.
    #[account(mut)]
    pub stake_account: UncheckedAccount<'info>,

    pub mint: Box<Account<'info, Mint>>,

    /// CHECK: Token vault PDA, validated by seeds. Its mint and authority are
    /// checked by the handler once the stake itself has been found.
    #[account(
        mut,
        seeds = [VAULT_SEED, stake_account.key().as_ref()],
        bump
    )]
    pub vault: UncheckedAccount<'info>,

    #[account(
        mut,
        token::mint = mint,
        token::authority = user
    )]
    pub user_token_account: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        seeds = [USER_SEED, user.key().as_ref()],
        bump = user_account.bump
    )]
    pub user_account: Box<Account<'info, UserAccount>>,

    #[account(
        mut,
        seeds = [REWARD_MINT_SEED, config.key().as_ref()],
        bump = config.reward_mint_bump,
        constraint = reward_mint.key() == config.reward_mint @ CustomErrorCode::InvalidRewardMint
    )]
    pub reward_mint: Box<Account<'info, Mint>>,

    #[account(
        init_if_needed,
        payer = user,
        associated_token::mint = reward_mint,
        associated_token::authority = user,
    )]
    pub user_reward_account: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
#[instruction(seed: u64)]
pub struct StakeNonFungible<'info> {
    #[account(mut)]
    pub user: Signer<'info>,

    #[account(
        seeds = [CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Box<Account<'info, Config>>,

    pub mint: Box<Account<'info, Mint>>,

    pub collection_mint: Box<Account<'info, Mint>>,

    #[account(
        mut,
        token::mint = mint,
        token::authority = user
    )]
    pub user_token_account: Box<Account<'info, TokenAccount>>,

    #[account(
        seeds = [METADATA_SEED, metadata_program.key().as_ref(), mint.key().as_ref()],
        bump,
        seeds::program = metadata_program.key(),
        constraint = metadata
            .collection
            .as_ref()
            .is_some_and(|c| c.verified && c.key == collection_mint.key())
            @ CustomErrorCode::UnverifiedCollection
    )]
    pub metadata: Box<Account<'info, MetadataAccount>>,

    #[account(
        seeds = [METADATA_SEED, metadata_program.key().as_ref(), mint.key().as_ref(), EDITION_SEED],
        bump,
        seeds::program = metadata_program.key()
    )]
    pub master_edition: Box<Account<'info, MasterEditionAccount>>,

    #[account(
        mut,
        seeds = [REWARD_MINT_SEED, config.key().as_ref()],
        bump = config.reward_mint_bump,
        constraint = reward_mint.key() == config.reward_mint @ CustomErrorCode::InvalidRewardMint
    )]
    pub reward_mint: Box<Account<'info, Mint>>,

    #[account(
        init_if_needed,
        payer = user,
        associated_token::mint = reward_mint,
        associated_token::authority = user,
    )]
    pub user_reward_account: Box<Account<'info, TokenAccount>>,

    #[account(
        init_if_needed,
        payer = user,
        space = UserAccount::LEN,
        seeds = [USER_SEED, user.key().as_ref()],
        bump
    )]
    pub user_account: Box<Account<'info, UserAccount>>,

    #[account(
        init_if_needed,
        payer = user,
        space = StakeAccount::LEN,
        seeds = [
            STAKE_SEED,
            config.key().as_ref(),
            user.key().as_ref(),
            NON_FUNGIBLE_TAG,
            mint.key().as_ref(),
            seed.to_le_bytes().as_ref()
        ],
        bump
    )]
    pub stake_account: Box<Account<'info, StakeAccount>>,

    /// CHECK: Token escrow PDA, validated by seeds. Only created by the handler
    /// when the NFT is moved into custody rather than frozen in place.
    #[account(
        mut,
        seeds = [VAULT_SEED, stake_account.key().as_ref()],
        bump
    )]
    pub vault: UncheckedAccount<'info>,

    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub metadata_program: Program<'info, Metadata>,
    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct UnstakeNonFungible<'info> {
    #[account(mut)]
    pub user: Signer<'info>,

    #[account(
        seeds = [CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Box<Account<'info, Config>>,

    /// CHECK: Loaded by the handler, which reports a missing stake as
    /// AccountNotFound and checks owner, kind, mint and address.
    #[account(mut)]
    pub stake_account: UncheckedAccount<'info>,

    pub mint: Box<Account<'info, Mint>>,

    #[account(
        mut,
        token::mint = mint,
        token::authority = user
    )]
    pub user_token_account: Box<Account<'info, TokenAccount>>,

    #[account(
        seeds = [METADATA_SEED, metadata_program.key().as_ref(), mint.key().as_ref(), EDITION_SEED],
        bump,
        seeds::program = metadata_program.key()
    )]
    pub master_edition: Box<Account<'info, MasterEditionAccount>>,

    /// CHECK: Token escrow PDA, validated by seeds. Empty when the stake froze
    /// the NFT in the owner's holding account.
    #[account(
        mut,
        seeds = [VAULT_SEED, stake_account.key().as_ref()],
        bump
    )]
    pub vault: UncheckedAccount<'info>,

    #[account(
        mut,
        seeds = [USER_SEED, user.key().as_ref()],
        bump = user_account.bump
    )]
    pub user_account: Box<Account<'info, UserAccount>>,

    #[account(
        mut,
        seeds = [REWARD_MINT_SEED, config.key().as_ref()],
        bump = config.reward_mint_bump,
        constraint = reward_mint.key() == config.reward_mint @ CustomErrorCode::InvalidRewardMint
    )]
    pub reward_mint: Box<Account<'info, Mint>>,

    #[account(
        init_if_needed,
        payer = user,
        associated_token::mint = reward_mint,
        associated_token::authority = user,
    )]
    pub user_reward_account: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub metadata_program: Program<'info, Metadata>,
    pub system_program: Program<'info, System>,
}

// Helper function to derive the program data address
fn get_program_data_address(program_id: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[program_id.as_ref()], &bpf_loader_upgradeable::id()).0
}
