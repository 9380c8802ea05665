use crate::error::CustomErrorCode;
use anchor_lang::prelude::*;

#[allow(deprecated)]
use anchor_lang::solana_program::bpf_loader_upgradeable::UpgradeableLoaderState;

pub fn validate_program_update_authority(
    program_data_account: &UncheckedAccount,
    authority: &Signer,
) -> Result<()> {
    let program_data = program_data_account
        .try_borrow_data()
        .map_err(|_| CustomErrorCode::InvalidProgramData)?;

    check_upgrade_authority(&program_data, &authority.key())
}

/// Checks `authority` against the upgrade authority recorded in raw
/// ProgramData bytes.
pub fn check_upgrade_authority(program_data: &[u8], authority: &Pubkey) -> Result<()> {
    let loader_state = bincode::deserialize::<UpgradeableLoaderState>(program_data)
        .map_err(|_| CustomErrorCode::InvalidProgramData)?;

    match loader_state {
        UpgradeableLoaderState::ProgramData {
            slot: _,
            upgrade_authority_address,
        } => match upgrade_authority_address {
            Some(update_authority) => {
                require!(
                    *authority == update_authority,
                    CustomErrorCode::Unauthorized
                );
            }
            None => return Err(CustomErrorCode::NoUpgradeAuthority.into()),
        },
        _ => return Err(CustomErrorCode::InvalidProgramData.into()),
    }

    Ok(())
}
