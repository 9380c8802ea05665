use crate::account_structs::*;
use crate::address::*;
use crate::error::*;
use crate::events::*;
use crate::guard::validate_program_update_authority;
use crate::reward::{self, RewardPolicy, NATIVE_DECIMALS};
use crate::state::*;
use anchor_lang::prelude::*;
use anchor_lang::system_program::{self, Allocate, Assign, CreateAccount};
use anchor_spl::metadata::mpl_token_metadata::instructions::{
    FreezeDelegatedAccountCpi, FreezeDelegatedAccountCpiAccounts, ThawDelegatedAccountCpi,
    ThawDelegatedAccountCpiAccounts,
};
use anchor_spl::token::{
    self, Approve, CloseAccount, InitializeAccount3, Mint, MintTo, Revoke, Token, TokenAccount,
    TransferChecked,
};

pub fn initialize_config(
    ctx: Context<InitializeConfig>,
    rates: RewardRates,
    min_lock_seconds: i64,
    reward_policy: RewardPolicy,
) -> Result<()> {
    require!(
        !ctx.accounts.config.is_initialized(),
        CustomErrorCode::AlreadyInitialized
    );
    validate_program_update_authority(&ctx.accounts.program_data, &ctx.accounts.signer)?;
    Config::validate_min_lock(min_lock_seconds)?;

    let admin = ctx.accounts.signer.key();
    let reward_mint = ctx.accounts.reward_mint.key();
    ctx.accounts.config.set_inner(Config {
        admin,
        reward_mint,
        rates,
        min_lock_seconds,
        reward_policy,
        bump: ctx.bumps.config,
        reward_mint_bump: ctx.bumps.reward_mint,
    });

    emit!(ConfigInitialized {
        admin,
        reward_mint,
        rates,
        min_lock_seconds,
        reward_policy,
    });

    msg!("Config initialized by {} with reward mint {}", admin, reward_mint);

    Ok(())
}

pub fn update_config(
    ctx: Context<UpdateConfig>,
    rates: RewardRates,
    min_lock_seconds: i64,
    reward_policy: RewardPolicy,
) -> Result<()> {
    Config::validate_min_lock(min_lock_seconds)?;

    let config = &mut ctx.accounts.config;
    let old_rates = config.rates;
    let old_min_lock_seconds = config.min_lock_seconds;
    config.rates = rates;
    config.min_lock_seconds = min_lock_seconds;
    config.reward_policy = reward_policy;

    emit!(ConfigUpdated {
        admin: ctx.accounts.admin.key(),
        old_rates,
        new_rates: rates,
        old_min_lock_seconds,
        new_min_lock_seconds: min_lock_seconds,
        reward_policy,
    });

    Ok(())
}

pub fn initialize_user(ctx: Context<InitializeUser>) -> Result<()> {
    require!(
        !ctx.accounts.user_account.is_initialized(),
        CustomErrorCode::AlreadyExists
    );

    let owner = ctx.accounts.signer.key();
    let now = Clock::get()?.unix_timestamp;
    ctx.accounts
        .user_account
        .initialize(owner, ctx.bumps.user_account, now);

    emit!(UserInitialized {
        user: owner,
        user_account: ctx.accounts.user_account.key(),
    });

    Ok(())
}

pub fn stake_native(
    ctx: Context<StakeNative>,
    seed: u64,
    amount: u64,
    locked: bool,
    lock_seconds: Option<i64>,
) -> Result<()> {
    require!(
        !ctx.accounts.stake_account.is_open(),
        CustomErrorCode::InvalidSeedCollision
    );
    require!(amount > 0, CustomErrorCode::InvalidAmount);
    // the vault is a bare system account and has to be rent exempt on its own
    require!(
        amount >= Rent::get()?.minimum_balance(0),
        CustomErrorCode::InvalidAmount
    );
    require!(
        ctx.accounts.user.lamports() >= amount,
        CustomErrorCode::InsufficientBalance
    );

    let now = Clock::get()?.unix_timestamp;
    let config = &ctx.accounts.config;
    let lock_seconds = config.effective_lock(lock_seconds)?;
    let credit = reward::opening_credit(AssetKind::Native, amount, NATIVE_DECIMALS, &config.rates)?;

    let user = ctx.accounts.user.key();
    ensure_user(&mut ctx.accounts.user_account, user, ctx.bumps.user_account, now);
    ctx.accounts
        .user_account
        .record_stake(AssetKind::Native, amount, credit)?;

    system_program::transfer(
        CpiContext::new(
            ctx.accounts.system_program.to_account_info(),
            system_program::Transfer {
                from: ctx.accounts.user.to_account_info(),
                to: ctx.accounts.vault.to_account_info(),
            },
        ),
        amount,
    )?;

    mint_reward(
        &ctx.accounts.token_program,
        &ctx.accounts.reward_mint,
        &ctx.accounts.user_reward_account,
        &ctx.accounts.config,
        credit,
    )?;

    ctx.accounts.stake_account.set_inner(StakeAccount {
        owner: user,
        asset: StakedAsset::Native,
        amount,
        seed,
        staked_at: now,
        lock_seconds,
        frozen: false,
        locked,
        reward_credited: credit,
        bump: ctx.bumps.stake_account,
        vault_bump: ctx.bumps.vault,
    });

    emit!(StakeOpened {
        user,
        stake: ctx.accounts.stake_account.key(),
        kind: AssetKind::Native,
        mint: None,
        amount,
        seed,
        lock_seconds,
        frozen: false,
        locked,
        reward: credit,
    });

    msg!(
        "Native stake opened: {} lamports, seed {}, lock {}s, reward {}",
        amount,
        hex::encode(seed.to_le_bytes()),
        lock_seconds,
        credit
    );

    Ok(())
}

pub fn unstake_native(ctx: Context<UnstakeNative>) -> Result<()> {
    let user_key = ctx.accounts.user.key();
    let stake = load_stake(
        &ctx.accounts.stake_account,
        &ctx.accounts.config.key(),
        &user_key,
        AssetKind::Native,
        None,
    )?;
    let now = Clock::get()?.unix_timestamp;
    let elapsed = stake.ensure_unlocked(now)?;
    let credit = closing_credit(&ctx.accounts.config, &stake, elapsed)?;

    ctx.accounts
        .user_account
        .record_unstake(AssetKind::Native, stake.amount, credit)?;

    let stake_key = ctx.accounts.stake_account.key();
    let seeds: &[&[u8]] = &[VAULT_SEED, stake_key.as_ref(), &[stake.vault_bump]];
    let signer = &[&seeds[..]];
    // drain everything, including lamports donated to the vault after opening
    let vault_balance = ctx.accounts.vault.lamports();
    system_program::transfer(
        CpiContext::new_with_signer(
            ctx.accounts.system_program.to_account_info(),
            system_program::Transfer {
                from: ctx.accounts.vault.to_account_info(),
                to: ctx.accounts.user.to_account_info(),
            },
            signer,
        ),
        vault_balance,
    )?;

    mint_reward(
        &ctx.accounts.token_program,
        &ctx.accounts.reward_mint,
        &ctx.accounts.user_reward_account,
        &ctx.accounts.config,
        credit,
    )?;

    close_stake(&ctx.accounts.stake_account, &ctx.accounts.user)?;

    emit!(StakeClosed {
        user: user_key,
        stake: stake_key,
        kind: AssetKind::Native,
        mint: None,
        amount: stake.amount,
        elapsed_seconds: elapsed,
        reward: credit,
    });

    msg!(
        "Native stake {} closed after {}s: returned {} lamports, reward {}",
        stake_key,
        elapsed,
        vault_balance,
        credit
    );

    Ok(())
}

pub fn stake_fungible(
    ctx: Context<StakeFungible>,
    seed: u64,
    amount: u64,
    locked: bool,
    lock_seconds: Option<i64>,
) -> Result<()> {
    require!(
        !ctx.accounts.stake_account.is_open(),
        CustomErrorCode::InvalidSeedCollision
    );
    require!(amount > 0, CustomErrorCode::InvalidAmount);
    require!(
        ctx.accounts.user_token_account.amount >= amount,
        CustomErrorCode::InsufficientBalance
    );

    let now = Clock::get()?.unix_timestamp;
    let decimals = ctx.accounts.mint.decimals;
    let config = &ctx.accounts.config;
    let lock_seconds = config.effective_lock(lock_seconds)?;
    let credit = reward::opening_credit(AssetKind::Fungible, amount, decimals, &config.rates)?;

    let user = ctx.accounts.user.key();
    ensure_user(&mut ctx.accounts.user_account, user, ctx.bumps.user_account, now);
    ctx.accounts
        .user_account
        .record_stake(AssetKind::Fungible, amount, credit)?;

    token::transfer_checked(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            TransferChecked {
                from: ctx.accounts.user_token_account.to_account_info(),
                mint: ctx.accounts.mint.to_account_info(),
                to: ctx.accounts.vault.to_account_info(),
                authority: ctx.accounts.user.to_account_info(),
            },
        ),
        amount,
        decimals,
    )?;

    mint_reward(
        &ctx.accounts.token_program,
        &ctx.accounts.reward_mint,
        &ctx.accounts.user_reward_account,
        &ctx.accounts.config,
        credit,
    )?;

    let mint = ctx.accounts.mint.key();
    ctx.accounts.stake_account.set_inner(StakeAccount {
        owner: user,
        asset: StakedAsset::Fungible { mint },
        amount,
        seed,
        staked_at: now,
        lock_seconds,
        frozen: false,
        locked,
        reward_credited: credit,
        bump: ctx.bumps.stake_account,
        vault_bump: ctx.bumps.vault,
    });

    emit!(StakeOpened {
        user,
        stake: ctx.accounts.stake_account.key(),
        kind: AssetKind::Fungible,
        mint: Some(mint),
        amount,
        seed,
        lock_seconds,
        frozen: false,
        locked,
        reward: credit,
    });

    msg!(
        "Fungible stake opened: {} of {}, seed {}, lock {}s, reward {}",
        amount,
        mint,
        hex::encode(seed.to_le_bytes()),
        lock_seconds,
        credit
    );

    Ok(())
}

pub fn unstake_fungible(ctx: Context<UnstakeFungible>) -> Result<()> {
    let config_key = ctx.accounts.config.key();
    let user_key = ctx.accounts.user.key();
    let mint_key = ctx.accounts.mint.key();
    let stake = load_stake(
        &ctx.accounts.stake_account,
        &config_key,
        &user_key,
        AssetKind::Fungible,
        Some(mint_key),
    )?;
    let now = Clock::get()?.unix_timestamp;
    let elapsed = stake.ensure_unlocked(now)?;
    let credit = closing_credit(&ctx.accounts.config, &stake, elapsed)?;

    let stake_key = ctx.accounts.stake_account.key();
    let vault = load_vault(&ctx.accounts.vault, &mint_key, &stake_key)?;

    ctx.accounts
        .user_account
        .record_unstake(AssetKind::Fungible, stake.amount, credit)?;

    let seed_bytes = stake.seed.to_le_bytes();
    let seeds: &[&[u8]] = &[
        STAKE_SEED,
        config_key.as_ref(),
        user_key.as_ref(),
        FUNGIBLE_TAG,
        mint_key.as_ref(),
        &seed_bytes,
        &[stake.bump],
    ];
    let signer = &[&seeds[..]];

    let vault_balance = vault.amount;
    token::transfer_checked(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            TransferChecked {
                from: ctx.accounts.vault.to_account_info(),
                mint: ctx.accounts.mint.to_account_info(),
                to: ctx.accounts.user_token_account.to_account_info(),
                authority: ctx.accounts.stake_account.to_account_info(),
            },
            signer,
        ),
        vault_balance,
        ctx.accounts.mint.decimals,
    )?;

    token::close_account(CpiContext::new_with_signer(
        ctx.accounts.token_program.to_account_info(),
        CloseAccount {
            account: ctx.accounts.vault.to_account_info(),
            destination: ctx.accounts.user.to_account_info(),
            authority: ctx.accounts.stake_account.to_account_info(),
        },
        signer,
    ))?;

    mint_reward(
        &ctx.accounts.token_program,
        &ctx.accounts.reward_mint,
        &ctx.accounts.user_reward_account,
        &ctx.accounts.config,
        credit,
    )?;

    close_stake(&ctx.accounts.stake_account, &ctx.accounts.user)?;

    emit!(StakeClosed {
        user: user_key,
        stake: stake_key,
        kind: AssetKind::Fungible,
        mint: Some(mint_key),
        amount: stake.amount,
        elapsed_seconds: elapsed,
        reward: credit,
    });

    msg!(
        "Fungible stake closed after {}s: returned {} of {}, reward {}",
        elapsed,
        vault_balance,
        mint_key,
        credit
    );

    Ok(())
}

pub fn stake_non_fungible(
    ctx: Context<StakeNonFungible>,
    seed: u64,
    freeze: bool,
    locked: bool,
    lock_seconds: Option<i64>,
) -> Result<()> {
    require!(
        !ctx.accounts.stake_account.is_open(),
        CustomErrorCode::InvalidSeedCollision
    );
    require!(
        ctx.accounts.user_token_account.amount == 1,
        CustomErrorCode::InsufficientBalance
    );

    let now = Clock::get()?.unix_timestamp;
    let config = &ctx.accounts.config;
    let lock_seconds = config.effective_lock(lock_seconds)?;
    let credit = reward::opening_credit(AssetKind::NonFungible, 1, 0, &config.rates)?;

    let user = ctx.accounts.user.key();
    ensure_user(&mut ctx.accounts.user_account, user, ctx.bumps.user_account, now);
    ctx.accounts
        .user_account
        .record_stake(AssetKind::NonFungible, 1, credit)?;

    let config_key = ctx.accounts.config.key();
    let mint = ctx.accounts.mint.key();
    let seed_bytes = seed.to_le_bytes();
    let stake_bump = ctx.bumps.stake_account;
    let stake_key = ctx.accounts.stake_account.key();

    if freeze {
        // The NFT stays with the owner, delegated to and frozen by the stake account.
        token::approve(
            CpiContext::new(
                ctx.accounts.token_program.to_account_info(),
                Approve {
                    to: ctx.accounts.user_token_account.to_account_info(),
                    delegate: ctx.accounts.stake_account.to_account_info(),
                    authority: ctx.accounts.user.to_account_info(),
                },
            ),
            1,
        )?;

        let seeds: &[&[u8]] = &[
            STAKE_SEED,
            config_key.as_ref(),
            user.as_ref(),
            NON_FUNGIBLE_TAG,
            mint.as_ref(),
            &seed_bytes,
            &[stake_bump],
        ];
        let metadata_program = ctx.accounts.metadata_program.to_account_info();
        let delegate = ctx.accounts.stake_account.to_account_info();
        let token_account = ctx.accounts.user_token_account.to_account_info();
        let edition = ctx.accounts.master_edition.to_account_info();
        let mint_info = ctx.accounts.mint.to_account_info();
        let token_program = ctx.accounts.token_program.to_account_info();
        FreezeDelegatedAccountCpi::new(
            &metadata_program,
            FreezeDelegatedAccountCpiAccounts {
                delegate: &delegate,
                token_account: &token_account,
                edition: &edition,
                mint: &mint_info,
                token_program: &token_program,
            },
        )
        .invoke_signed(&[seeds])?;
    } else {
        let vault_seeds: &[&[u8]] = &[VAULT_SEED, stake_key.as_ref(), &[ctx.bumps.vault]];
        open_token_vault(
            &ctx.accounts.user,
            &ctx.accounts.vault,
            &ctx.accounts.mint,
            &ctx.accounts.stake_account.to_account_info(),
            vault_seeds,
            &ctx.accounts.token_program,
            &ctx.accounts.system_program,
        )?;

        token::transfer_checked(
            CpiContext::new(
                ctx.accounts.token_program.to_account_info(),
                TransferChecked {
                    from: ctx.accounts.user_token_account.to_account_info(),
                    mint: ctx.accounts.mint.to_account_info(),
                    to: ctx.accounts.vault.to_account_info(),
                    authority: ctx.accounts.user.to_account_info(),
                },
            ),
            1,
            ctx.accounts.mint.decimals,
        )?;
    }

    mint_reward(
        &ctx.accounts.token_program,
        &ctx.accounts.reward_mint,
        &ctx.accounts.user_reward_account,
        &ctx.accounts.config,
        credit,
    )?;

    let collection = ctx.accounts.collection_mint.key();
    ctx.accounts.stake_account.set_inner(StakeAccount {
        owner: user,
        asset: StakedAsset::NonFungible { mint, collection },
        amount: 1,
        seed,
        staked_at: now,
        lock_seconds,
        frozen: freeze,
        locked,
        reward_credited: credit,
        bump: stake_bump,
        vault_bump: ctx.bumps.vault,
    });

    emit!(StakeOpened {
        user,
        stake: stake_key,
        kind: AssetKind::NonFungible,
        mint: Some(mint),
        amount: 1,
        seed,
        lock_seconds,
        frozen: freeze,
        locked,
        reward: credit,
    });

    msg!(
        "NFT stake opened: {} from collection {}, seed {}, frozen {}, reward {}",
        mint,
        collection,
        hex::encode(seed_bytes),
        freeze,
        credit
    );

    Ok(())
}

pub fn unstake_non_fungible(ctx: Context<UnstakeNonFungible>) -> Result<()> {
    let config_key = ctx.accounts.config.key();
    let user_key = ctx.accounts.user.key();
    let mint_key = ctx.accounts.mint.key();
    let stake = load_stake(
        &ctx.accounts.stake_account,
        &config_key,
        &user_key,
        AssetKind::NonFungible,
        Some(mint_key),
    )?;
    let now = Clock::get()?.unix_timestamp;
    let elapsed = stake.ensure_unlocked(now)?;
    let credit = closing_credit(&ctx.accounts.config, &stake, elapsed)?;

    let stake_key = ctx.accounts.stake_account.key();
    if !stake.frozen {
        load_vault(&ctx.accounts.vault, &mint_key, &stake_key)?;
    }

    ctx.accounts
        .user_account
        .record_unstake(AssetKind::NonFungible, 1, credit)?;

    let seed_bytes = stake.seed.to_le_bytes();
    let seeds: &[&[u8]] = &[
        STAKE_SEED,
        config_key.as_ref(),
        user_key.as_ref(),
        NON_FUNGIBLE_TAG,
        mint_key.as_ref(),
        &seed_bytes,
        &[stake.bump],
    ];
    let signer = &[&seeds[..]];

    if stake.frozen {
        let metadata_program = ctx.accounts.metadata_program.to_account_info();
        let delegate = ctx.accounts.stake_account.to_account_info();
        let token_account = ctx.accounts.user_token_account.to_account_info();
        let edition = ctx.accounts.master_edition.to_account_info();
        let mint_info = ctx.accounts.mint.to_account_info();
        let token_program = ctx.accounts.token_program.to_account_info();
        ThawDelegatedAccountCpi::new(
            &metadata_program,
            ThawDelegatedAccountCpiAccounts {
                delegate: &delegate,
                token_account: &token_account,
                edition: &edition,
                mint: &mint_info,
                token_program: &token_program,
            },
        )
        .invoke_signed(signer)?;

        token::revoke(CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Revoke {
                source: ctx.accounts.user_token_account.to_account_info(),
                authority: ctx.accounts.user.to_account_info(),
            },
        ))?;
    } else {
        token::transfer_checked(
            CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                TransferChecked {
                    from: ctx.accounts.vault.to_account_info(),
                    mint: ctx.accounts.mint.to_account_info(),
                    to: ctx.accounts.user_token_account.to_account_info(),
                    authority: ctx.accounts.stake_account.to_account_info(),
                },
                signer,
            ),
            1,
            ctx.accounts.mint.decimals,
        )?;

        token::close_account(CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            CloseAccount {
                account: ctx.accounts.vault.to_account_info(),
                destination: ctx.accounts.user.to_account_info(),
                authority: ctx.accounts.stake_account.to_account_info(),
            },
            signer,
        ))?;
    }

    mint_reward(
        &ctx.accounts.token_program,
        &ctx.accounts.reward_mint,
        &ctx.accounts.user_reward_account,
        &ctx.accounts.config,
        credit,
    )?;

    close_stake(&ctx.accounts.stake_account, &ctx.accounts.user)?;

    emit!(StakeClosed {
        user: user_key,
        stake: stake_key,
        kind: AssetKind::NonFungible,
        mint: Some(mint_key),
        amount: 1,
        elapsed_seconds: elapsed,
        reward: credit,
    });

    msg!(
        "NFT stake closed after {}s: {} returned (was frozen: {}), reward {}",
        elapsed,
        mint_key,
        stake.frozen,
        credit
    );

    Ok(())
}

/// Reads the stake behind an unstake request. An address holding nothing
/// is `AccountNotFound`; anything else must be this program's stake for
/// `owner`, of `kind` and `mint`, at its derived address.
fn load_stake(
    stake_account: &UncheckedAccount,
    config: &Pubkey,
    owner: &Pubkey,
    kind: AssetKind,
    mint: Option<Pubkey>,
) -> Result<StakeAccount> {
    require!(
        stake_account.lamports() > 0 && *stake_account.owner == crate::ID,
        CustomErrorCode::AccountNotFound
    );
    let stake = {
        let data = stake_account.try_borrow_data()?;
        StakeAccount::try_deserialize(&mut &data[..])?
    };
    stake.ensure_held_by(owner, kind, mint)?;

    let (expected, bump) = stake_address(config, owner, kind, mint.as_ref(), stake.seed);
    require!(
        expected == stake_account.key() && bump == stake.bump,
        anchor_lang::error::ErrorCode::ConstraintSeeds
    );
    Ok(stake)
}

/// Reads a stake's token vault. A vault that was never created is
/// `AccountNotFound`.
fn load_vault(vault: &UncheckedAccount, mint: &Pubkey, authority: &Pubkey) -> Result<TokenAccount> {
    require!(
        vault.lamports() > 0 && *vault.owner == token::ID,
        CustomErrorCode::AccountNotFound
    );
    let account = {
        let data = vault.try_borrow_data()?;
        TokenAccount::try_deserialize(&mut &data[..])?
    };
    require!(
        account.mint == *mint,
        anchor_lang::error::ErrorCode::ConstraintTokenMint
    );
    require!(
        account.owner == *authority,
        anchor_lang::error::ErrorCode::ConstraintTokenOwner
    );
    Ok(account)
}

fn closing_credit(config: &Config, stake: &StakeAccount, elapsed: i64) -> Result<u64> {
    let locked_apr_bps = stake.locked.then_some(config.rates.locked_apr_bps);
    config
        .reward_policy
        .closing_credit(stake.reward_credited, elapsed, locked_apr_bps)
}

/// Returns the stake account's rent to `destination` and hands the emptied
/// account back to the system program.
fn close_stake<'info>(
    stake_account: &UncheckedAccount<'info>,
    destination: &Signer<'info>,
) -> Result<()> {
    let rent = stake_account.lamports();
    let refunded = destination
        .lamports()
        .checked_add(rent)
        .ok_or(CustomErrorCode::ArithmeticOverflow)?;
    **destination.try_borrow_mut_lamports()? = refunded;
    **stake_account.try_borrow_mut_lamports()? = 0;

    stake_account.assign(&system_program::ID);
    stake_account.resize(0)?;
    Ok(())
}

// Stake instructions create the user account on first use
fn ensure_user(user_account: &mut Account<UserAccount>, owner: Pubkey, bump: u8, now: i64) {
    if !user_account.is_initialized() {
        user_account.initialize(owner, bump, now);
        msg!("User account created for {}", owner);
    }
}

fn mint_reward<'info>(
    token_program: &Program<'info, Token>,
    reward_mint: &Account<'info, Mint>,
    destination: &Account<'info, TokenAccount>,
    config: &Account<'info, Config>,
    amount: u64,
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }

    let seeds: &[&[u8]] = &[CONFIG_SEED, &[config.bump]];
    let signer = &[&seeds[..]];
    token::mint_to(
        CpiContext::new_with_signer(
            token_program.to_account_info(),
            MintTo {
                mint: reward_mint.to_account_info(),
                to: destination.to_account_info(),
                authority: config.to_account_info(),
            },
            signer,
        ),
        amount,
    )
}

/// Creates the NFT escrow token account at its PDA. A vault address that was
/// pre-funded by someone else is topped up, allocated and assigned instead,
/// since `create_account` refuses addresses that already hold lamports.
fn open_token_vault<'info>(
    payer: &Signer<'info>,
    vault: &UncheckedAccount<'info>,
    mint: &Account<'info, Mint>,
    authority: &AccountInfo<'info>,
    vault_seeds: &[&[u8]],
    token_program: &Program<'info, Token>,
    system_program: &Program<'info, System>,
) -> Result<()> {
    let space = TokenAccount::LEN;
    let required = Rent::get()?.minimum_balance(space);
    let current = vault.lamports();
    let signer = &[vault_seeds];

    if current == 0 {
        system_program::create_account(
            CpiContext::new_with_signer(
                system_program.to_account_info(),
                CreateAccount {
                    from: payer.to_account_info(),
                    to: vault.to_account_info(),
                },
                signer,
            ),
            required,
            space as u64,
            &token_program.key(),
        )?;
    } else {
        let top_up = required.saturating_sub(current);
        if top_up > 0 {
            system_program::transfer(
                CpiContext::new(
                    system_program.to_account_info(),
                    system_program::Transfer {
                        from: payer.to_account_info(),
                        to: vault.to_account_info(),
                    },
                ),
                top_up,
            )?;
        }
        system_program::allocate(
            CpiContext::new_with_signer(
                system_program.to_account_info(),
                Allocate {
                    account_to_allocate: vault.to_account_info(),
                },
                signer,
            ),
            space as u64,
        )?;
        system_program::assign(
            CpiContext::new_with_signer(
                system_program.to_account_info(),
                Assign {
                    account_to_assign: vault.to_account_info(),
                },
                signer,
            ),
            &token_program.key(),
        )?;
    }

    token::initialize_account3(CpiContext::new(
        token_program.to_account_info(),
        InitializeAccount3 {
            account: vault.to_account_info(),
            mint: mint.to_account_info(),
            authority: authority.clone(),
        },
    ))
}
