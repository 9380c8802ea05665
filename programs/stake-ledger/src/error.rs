use anchor_lang::prelude::*;

#[error_code]
pub enum CustomErrorCode {
    #[msg("Signer is not authorized for this account")]
    Unauthorized = 1,
    #[msg("Config is already initialized")]
    AlreadyInitialized = 2,
    #[msg("User account already exists")]
    AlreadyExists = 3,
    #[msg("Insufficient balance")]
    InsufficientBalance = 4,
    #[msg("Mint is not a verified member of the collection")]
    UnverifiedCollection = 5,
    #[msg("Lock period has not expired")]
    LockNotExpired = 6,
    #[msg("Arithmetic overflow")]
    ArithmeticOverflow = 7,
    #[msg("Account not found")]
    AccountNotFound = 8,
    #[msg("A stake already exists for this seed")]
    InvalidSeedCollision = 9,

    #[msg("Invalid amount")]
    InvalidAmount = 10,
    #[msg("Lock duration out of range")]
    InvalidLockDuration = 11,
    #[msg("Stake account holds a different asset kind")]
    InvalidStakeKind = 12,
    #[msg("Invalid reward mint")]
    InvalidRewardMint = 13,

    #[msg("ProgramData account did not match expected PDA.")]
    InvalidProgramData = 14,
    #[msg("Program has no upgrade authority (set to None).")]
    NoUpgradeAuthority = 15,

    #[msg("Stake account holds a different mint")]
    InvalidStakeMint = 16,
}
