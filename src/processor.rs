use borsh::BorshDeserialize;
use solana_program::{
    account_info::{next_account_info, AccountInfo},
    entrypoint::ProgramResult,
    msg,
    program::set_return_data,
    program_error::ProgramError,
    program_pack::{IsInitialized, Pack},
    pubkey::Pubkey,
    sysvar::{rent::Rent, Sysvar},
};

use crate::{
    error::LedgerError,
    instruction::LedgerInstruction,
    ledger::Ledger,
    state::{ConfigAccount, LedgerState},
};

pub struct Processor;
impl Processor {
    pub fn process(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        instruction_data: &[u8],
    ) -> ProgramResult {
        let instruction = LedgerInstruction::try_from_slice(instruction_data)
            .map_err(|_| ProgramError::InvalidInstructionData)?;

        match instruction {
            LedgerInstruction::Initialize {
                authority,
                treasury,
            } => {
                msg!("Instruction: Initialize");
                Self::process_initialize(accounts, authority, treasury, program_id)
            }
            LedgerInstruction::AddReward {
                name,
                credit_amount,
                description,
            } => {
                msg!("Instruction: AddReward");
                Self::process_add_reward(accounts, name, credit_amount, description, program_id)
            }
            LedgerInstruction::Issue {
                to,
                metadata_uri,
                credit_amount,
            } => {
                msg!("Instruction: Issue");
                Self::process_issue(accounts, to, metadata_uri, credit_amount, program_id)
            }
            LedgerInstruction::Redeem { certificate_id } => {
                msg!("Instruction: Redeem");
                Self::process_redeem(accounts, certificate_id, program_id)
            }
            LedgerInstruction::SetTransferability { enabled } => {
                msg!("Instruction: SetTransferability");
                Self::process_set_transferability(accounts, enabled, program_id)
            }
            LedgerInstruction::Approve {
                certificate_id,
                delegate,
            } => {
                msg!("Instruction: Approve");
                Self::process_approve(accounts, certificate_id, delegate, program_id)
            }
            query @ LedgerInstruction::GetReward { .. } => {
                msg!("Instruction: GetReward");
                Self::process_query(accounts, &query, program_id)
            }
            query @ LedgerInstruction::IsRedeemed { .. } => {
                msg!("Instruction: IsRedeemed");
                Self::process_query(accounts, &query, program_id)
            }
            query @ LedgerInstruction::GetBalance { .. } => {
                msg!("Instruction: GetBalance");
                Self::process_query(accounts, &query, program_id)
            }
        }
    }

    /// Processes Initialize instruction.
    fn process_initialize(
        accounts: &[AccountInfo],
        authority: Pubkey,
        treasury: Pubkey,
        program_id: &Pubkey,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let initializer_account = next_account_info(account_info_iter)?; // Signer
        let config_account = next_account_info(account_info_iter)?; // Writable
        let ledger_account = next_account_info(account_info_iter)?; // Writable
        let rent_sysvar_account = next_account_info(account_info_iter)?; // Rent

        if !initializer_account.is_signer {
            msg!("Initializer signature missing");
            return Err(ProgramError::MissingRequiredSignature);
        }
        Self::check_state_owner(config_account, ledger_account, program_id)?;

        if treasury == authority {
            msg!("Error: Treasury must differ from the authority");
            return Err(LedgerError::InvalidTreasury { account: treasury }.into());
        }

        let rent = Rent::from_account_info(rent_sysvar_account)?;
        for account in [config_account, ledger_account] {
            if !rent.is_exempt(account.lamports(), account.data_len()) {
                msg!("Error: Account {} not rent exempt", account.key);
                return Err(LedgerError::NotRentExempt.into());
            }
        }

        let config_data = ConfigAccount::unpack_unchecked(&config_account.try_borrow_data()?)?;
        if config_data.is_initialized() {
            msg!("Error: Config account already initialized");
            return Err(LedgerError::AlreadyInitialized.into());
        }

        ConfigAccount::pack(
            ConfigAccount::new(authority, treasury),
            &mut config_account.try_borrow_mut_data()?,
        )?;
        LedgerState::default().store(&mut ledger_account.try_borrow_mut_data()?)?;

        msg!(
            "Reward ledger initialized. Authority: {}, treasury: {}",
            authority,
            treasury
        );
        Ok(())
    }

    /// Processes AddReward instruction.
    fn process_add_reward(
        accounts: &[AccountInfo],
        name: String,
        credit_amount: u64,
        description: String,
        program_id: &Pubkey,
    ) -> ProgramResult {
        let index = Self::transact(accounts, program_id, |ledger, caller| {
            ledger.add_reward(caller, name, credit_amount, description)
        })?;
        msg!("Reward {} added, cost {} credits", index, credit_amount);
        Ok(())
    }

    /// Processes Issue instruction.
    fn process_issue(
        accounts: &[AccountInfo],
        to: Pubkey,
        metadata_uri: String,
        credit_amount: u64,
        program_id: &Pubkey,
    ) -> ProgramResult {
        let issuance = Self::transact(accounts, program_id, |ledger, caller| {
            ledger.issue(caller, to, metadata_uri, credit_amount)
        })?;
        if let Some(id) = issuance.certificate_id {
            msg!("Certificate {} minted to {}", id, to);
        }
        if issuance.credits > 0 {
            msg!("{} credits issued to {}", issuance.credits, to);
        }
        if issuance.is_noop() {
            msg!("Nothing to issue");
        }
        Ok(())
    }

    /// Processes Redeem instruction.
    fn process_redeem(
        accounts: &[AccountInfo],
        certificate_id: u64,
        program_id: &Pubkey,
    ) -> ProgramResult {
        let redemption = Self::transact(accounts, program_id, |ledger, caller| {
            ledger.redeem(*caller, certificate_id)
        })?;
        msg!(
            "Certificate {} redeemed against reward {} for {} credits",
            redemption.certificate_id,
            redemption.reward_index,
            redemption.credits_spent
        );
        Ok(())
    }

    /// Processes SetTransferability instruction.
    fn process_set_transferability(
        accounts: &[AccountInfo],
        enabled: bool,
        program_id: &Pubkey,
    ) -> ProgramResult {
        Self::transact(accounts, program_id, |ledger, caller| {
            ledger.set_transferability(caller, enabled)
        })?;
        msg!("Redemption enabled: {}", enabled);
        Ok(())
    }

    /// Processes Approve instruction.
    fn process_approve(
        accounts: &[AccountInfo],
        certificate_id: u64,
        delegate: Pubkey,
        program_id: &Pubkey,
    ) -> ProgramResult {
        Self::transact(accounts, program_id, |ledger, caller| {
            ledger.approve(caller, certificate_id, delegate)
        })?;
        msg!("Certificate {} approved for {}", certificate_id, delegate);
        Ok(())
    }

    /// Encodes the answer to a query instruction with Borsh: a
    /// `RewardDefinition` for `GetReward`, a `bool` for `IsRedeemed` and a
    /// `u64` for `GetBalance`. Any other instruction is rejected.
    pub fn encode_query(ledger: &Ledger, query: &LedgerInstruction) -> Result<Vec<u8>, ProgramError> {
        let encoded = match query {
            LedgerInstruction::GetReward { index } => {
                let reward = ledger.get_reward(*index).map_err(|e| {
                    msg!("Error: {}", e);
                    ProgramError::from(e)
                })?;
                borsh::to_vec(reward)
            }
            LedgerInstruction::IsRedeemed { account } => borsh::to_vec(&ledger.is_redeemed(account)),
            LedgerInstruction::GetBalance { account } => borsh::to_vec(&ledger.get_balance(account)),
            _ => return Err(ProgramError::InvalidInstructionData),
        };
        encoded.map_err(|e| ProgramError::BorshIoError(e.to_string()))
    }

    /// Runs a read-only query and publishes its encoded result as return data.
    fn process_query(
        accounts: &[AccountInfo],
        query: &LedgerInstruction,
        program_id: &Pubkey,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let _caller_account = next_account_info(account_info_iter)?;
        let config_account = next_account_info(account_info_iter)?;
        let ledger_account = next_account_info(account_info_iter)?;

        let ledger = Self::load(config_account, ledger_account, program_id)?;
        set_return_data(&Self::encode_query(&ledger, query)?);
        Ok(())
    }

    /// Loads the ledger, applies `op` for the signing caller, and writes the
    /// state back only if `op` succeeded.
    fn transact<T, Op>(accounts: &[AccountInfo], program_id: &Pubkey, op: Op) -> Result<T, ProgramError>
    where
        Op: FnOnce(&mut Ledger, &Pubkey) -> Result<T, LedgerError>,
    {
        let account_info_iter = &mut accounts.iter();
        let caller_account = next_account_info(account_info_iter)?; // Signer
        let config_account = next_account_info(account_info_iter)?; // Writable
        let ledger_account = next_account_info(account_info_iter)?; // Writable

        if !caller_account.is_signer {
            msg!("Error: Caller signature missing");
            return Err(ProgramError::MissingRequiredSignature);
        }

        let mut ledger = Self::load(config_account, ledger_account, program_id)?;
        let outcome = op(&mut ledger, caller_account.key).map_err(|e| {
            msg!("Error: {}", e);
            ProgramError::from(e)
        })?;

        let (config_data, state) = ledger.into_state();
        ConfigAccount::pack(config_data, &mut config_account.try_borrow_mut_data()?)?;
        state.store(&mut ledger_account.try_borrow_mut_data()?)?;
        Ok(outcome)
    }

    fn load(
        config_account: &AccountInfo,
        ledger_account: &AccountInfo,
        program_id: &Pubkey,
    ) -> Result<Ledger, ProgramError> {
        Self::check_state_owner(config_account, ledger_account, program_id)?;

        let config_data = ConfigAccount::unpack_unchecked(&config_account.try_borrow_data()?)?;
        if !config_data.is_initialized() {
            msg!("Error: Config account not initialized");
            return Err(LedgerError::NotInitialized.into());
        }
        let state = LedgerState::load(&ledger_account.try_borrow_data()?)?;
        Ok(Ledger::from_state(config_data, state))
    }

    fn check_state_owner(
        config_account: &AccountInfo,
        ledger_account: &AccountInfo,
        program_id: &Pubkey,
    ) -> ProgramResult {
        if config_account.owner != program_id {
            msg!("Error: Config account not owned by program");
            return Err(LedgerError::InvalidStateAccountOwner.into());
        }
        if ledger_account.owner != program_id {
            msg!("Error: Ledger account not owned by program");
            return Err(LedgerError::InvalidStateAccountOwner.into());
        }
        Ok(())
    }
}
