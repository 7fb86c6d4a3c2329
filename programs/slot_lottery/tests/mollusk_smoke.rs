use anchor_lang::{AccountDeserialize, AccountSerialize, Discriminator, InstructionData};
use mollusk_svm::Mollusk;
use mollusk_svm::program::keyed_account_for_system_program;
use solana_account::Account;
use solana_instruction::{AccountMeta, Instruction};
use solana_pubkey::Pubkey;

use slot_lottery::{
    constants::{SEED_CFG, SEED_LOTTERY, SLOT_COUNT},
    errors::ErrorCode,
    instructions::UpdateConfigArgs,
    randomness::RandomnessSource,
    state::{Config, Lottery, NewLottery, SlotClaim},
};

type AnchorPubkey = anchor_lang::prelude::Pubkey;

const FEE: u64 = 15_000_000;
const PRIZE: u64 = 100_000_000_000_000;

/// Never consulted: fixtures stop one claim short of settlement.
struct NoDraw;

impl RandomnessSource for NoDraw {
    fn draw_uniform(&mut self, _bound: u64, _context_seed: &[u8; 32]) -> anchor_lang::Result<u64> {
        Err(ErrorCode::RandomnessUnavailable.into())
    }

    fn last_digest(&self) -> [u8; 32] {
        [0u8; 32]
    }
}

#[test]
#[ignore = "requires prebuilt SBF program via anchor build"]
fn init_config_instruction_succeeds_in_mollusk() {
    let program_id = program_id();
    let payer = Pubkey::new_unique();
    let admin = Pubkey::new_unique();
    let prize_mint = Pubkey::new_from_array([2u8; 32]);
    let (config_pda, config_bump) = Pubkey::find_program_address(&[SEED_CFG], &program_id);
    let (system_program, system_account) = keyed_account_for_system_program();

    let mollusk = Mollusk::new(&program_id, "slot_lottery");

    let instruction = Instruction {
        program_id,
        accounts: vec![
            AccountMeta::new(payer, true),
            AccountMeta::new_readonly(admin, true),
            AccountMeta::new(config_pda, false),
            AccountMeta::new_readonly(system_program, false),
        ],
        data: slot_lottery::instruction::InitConfig {
            args: slot_lottery::instructions::InitConfigArgs {
                prize_mint: anchor_key(prize_mint),
            },
        }
        .data(),
    };

    let accounts = vec![
        (payer, signer_account()),
        (admin, signer_account()),
        (config_pda, Account::new(0, 0, &system_program)),
        (system_program, system_account),
    ];

    let result = mollusk.process_instruction(&instruction, &accounts);
    assert!(result.program_result.is_ok(), "{:?}", result.program_result);

    let cfg = read_config(&result.get_account(&config_pda).expect("config account").data);
    assert_eq!(cfg.admin, anchor_key(admin));
    assert_eq!(cfg.prize_mint, anchor_key(prize_mint));
    assert_eq!(cfg.lottery_count, 0);
    assert!(!cfg.paused);
    assert_eq!(cfg.bump, config_bump);
}

#[test]
#[ignore = "requires prebuilt SBF program via anchor build"]
fn update_config_is_admin_only_in_mollusk() {
    let program_id = program_id();
    let admin = Pubkey::new_unique();
    let stranger = Pubkey::new_unique();
    let (config_pda, config_bump) = Pubkey::find_program_address(&[SEED_CFG], &program_id);

    let mollusk = Mollusk::new(&program_id, "slot_lottery");

    let update = |signer: Pubkey| Instruction {
        program_id,
        accounts: vec![
            AccountMeta::new_readonly(signer, true),
            AccountMeta::new(config_pda, false),
        ],
        data: slot_lottery::instruction::UpdateConfig {
            args: UpdateConfigArgs {
                paused: Some(true),
                prize_mint: None,
            },
        }
        .data(),
    };
    let config = config_account(&program_id, config_bump, admin, 3);

    let result = mollusk.process_instruction(
        &update(stranger),
        &[(stranger, signer_account()), (config_pda, config.clone())],
    );
    assert_custom_error(&result.program_result, ErrorCode::Unauthorized);

    let result = mollusk.process_instruction(
        &update(admin),
        &[(admin, signer_account()), (config_pda, config)],
    );
    assert!(result.program_result.is_ok(), "{:?}", result.program_result);

    let cfg = read_config(&result.get_account(&config_pda).expect("config account").data);
    assert!(cfg.paused);
    assert_eq!(cfg.lottery_count, 3);
}

#[test]
#[ignore = "requires prebuilt SBF program via anchor build"]
fn claim_slot_moves_exactly_the_fee_in_mollusk() {
    let program_id = program_id();
    let creator = Pubkey::new_unique();
    let claimer = Pubkey::new_unique();
    let lottery_id = 0u64;
    let (lottery_pda, _) = lottery_address(&program_id, lottery_id);

    let mut mollusk = Mollusk::new(&program_id, "slot_lottery");
    mollusk.sysvars.clock.unix_timestamp = 1_717_000_000;
    let rent = mollusk.sysvars.rent.minimum_balance(Lottery::SPACE);

    let instruction = claim_ix(&program_id, claimer, lottery_pda, lottery_id, 4, FEE);
    let accounts = claim_accounts(
        &program_id,
        claimer,
        (lottery_pda, lottery_account(&program_id, lottery_id, creator, 0, rent)),
    );

    let result = mollusk.process_instruction(&instruction, &accounts);
    assert!(result.program_result.is_ok(), "{:?}", result.program_result);

    let after = result.get_account(&lottery_pda).expect("lottery account");
    let lottery = read_lottery(&after.data);
    assert!(lottery.is_slot_taken(4));
    assert_eq!(lottery.fee_balance, FEE);
    assert_eq!(after.lamports, rent + FEE);
    assert_eq!(
        result.get_account(&claimer).expect("claimer").lamports,
        signer_account().lamports - FEE
    );

    let wrong = claim_ix(&program_id, claimer, lottery_pda, lottery_id, 5, FEE - 1);
    let result = mollusk.process_instruction(&wrong, &accounts);
    assert_custom_error(&result.program_result, ErrorCode::WrongFeeAmount);
}

#[test]
#[ignore = "requires prebuilt SBF program via anchor build"]
fn final_claim_settles_and_fee_collection_keeps_rent_in_mollusk() {
    let program_id = program_id();
    let creator = Pubkey::new_unique();
    let claimer = Pubkey::new_unique();
    let lottery_id = 9u64;
    let (lottery_pda, _) = lottery_address(&program_id, lottery_id);

    let mut mollusk = Mollusk::new(&program_id, "slot_lottery");
    mollusk.sysvars.clock.unix_timestamp = 1_717_000_000;
    let rent = mollusk.sysvars.rent.minimum_balance(Lottery::SPACE);

    let eight_sold = lottery_account(&program_id, lottery_id, creator, 8, rent + 8 * FEE);
    let claim = claim_ix(&program_id, claimer, lottery_pda, lottery_id, 8, FEE);
    let result = mollusk.process_instruction(
        &claim,
        &claim_accounts(&program_id, claimer, (lottery_pda, eight_sold)),
    );
    assert!(result.program_result.is_ok(), "{:?}", result.program_result);

    let settled = result.get_account(&lottery_pda).expect("lottery account").clone();
    let lottery = read_lottery(&settled.data);
    assert!(lottery.is_settled());
    assert!((lottery.winning_slot as usize) < SLOT_COUNT);
    assert_ne!(lottery.randomness, [0u8; 32]);
    assert_eq!(settled.lamports, rent + 9 * FEE);

    let collect = Instruction {
        program_id,
        accounts: vec![
            AccountMeta::new(creator, true),
            AccountMeta::new(lottery_pda, false),
        ],
        data: slot_lottery::instruction::CollectFee { lottery_id }.data(),
    };
    let result = mollusk.process_instruction(
        &collect,
        &[(creator, signer_account()), (lottery_pda, settled)],
    );
    assert!(result.program_result.is_ok(), "{:?}", result.program_result);

    let after = result.get_account(&lottery_pda).expect("lottery account");
    assert_eq!(after.lamports, rent);
    assert_eq!(read_lottery(&after.data).fee_balance, 0);
    assert_eq!(
        result.get_account(&creator).expect("creator").lamports,
        signer_account().lamports + 9 * FEE
    );
}

fn program_id() -> Pubkey {
    Pubkey::new_from_array(slot_lottery::ID.to_bytes())
}

fn anchor_key(key: Pubkey) -> AnchorPubkey {
    AnchorPubkey::new_from_array(key.to_bytes())
}

fn svm_key(key: AnchorPubkey) -> Pubkey {
    Pubkey::new_from_array(key.to_bytes())
}

fn signer_account() -> Account {
    Account::new(1_000_000_000, 0, &Pubkey::default())
}

fn lottery_address(program_id: &Pubkey, lottery_id: u64) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[SEED_LOTTERY, &lottery_id.to_le_bytes()], program_id)
}

fn config_account(program_id: &Pubkey, bump: u8, admin: Pubkey, lottery_count: u64) -> Account {
    let cfg = Config {
        admin: anchor_key(admin),
        prize_mint: AnchorPubkey::new_from_array([2u8; 32]),
        lottery_count,
        paused: false,
        bump,
        reserved: [0u8; 30],
    };
    let mut data = Vec::with_capacity(Config::SPACE);
    cfg.try_serialize(&mut data).expect("config write");
    data.resize(Config::SPACE, 0);

    let mut account = Account::new(1_000_000_000, Config::SPACE, program_id);
    account.data = data;
    account
}

/// Lottery with slots `0..claimed` already sold to distinct players.
fn lottery_account(
    program_id: &Pubkey,
    lottery_id: u64,
    creator: Pubkey,
    claimed: u64,
    lamports: u64,
) -> Account {
    let (pda, bump) = lottery_address(program_id, lottery_id);
    let mut lottery: Lottery = bytemuck::Zeroable::zeroed();
    lottery
        .init(NewLottery {
            lottery_id,
            creator: anchor_key(creator),
            prize_mint: AnchorPubkey::new_from_array([2u8; 32]),
            vault_prize_ata: AnchorPubkey::new_from_array([3u8; 32]),
            prize_amount: PRIZE,
            fee_amount: FEE,
            created_at: 1_716_000_000,
            bump,
        })
        .expect("lottery init");
    for slot in 0..claimed {
        lottery
            .claim_slot(
                &SlotClaim {
                    lottery: anchor_key(pda),
                    claimer: AnchorPubkey::new_from_array([slot as u8 + 10; 32]),
                    slot_index: slot,
                    payment: FEE,
                    now: 1_716_000_100,
                },
                &mut NoDraw,
            )
            .expect("fixture claim");
    }

    let mut account = Account::new(lamports, Lottery::SPACE, program_id);
    account.data[..8].copy_from_slice(Lottery::DISCRIMINATOR);
    account.data[8..].copy_from_slice(bytemuck::bytes_of(&lottery));
    account
}

fn claim_ix(
    program_id: &Pubkey,
    claimer: Pubkey,
    lottery: Pubkey,
    lottery_id: u64,
    slot_index: u64,
    payment: u64,
) -> Instruction {
    let (system_program, _) = keyed_account_for_system_program();
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(claimer, true),
            AccountMeta::new(lottery, false),
            AccountMeta::new_readonly(svm_key(anchor_lang::solana_program::sysvar::slot_hashes::ID), false),
            AccountMeta::new_readonly(svm_key(anchor_lang::solana_program::sysvar::instructions::ID), false),
            AccountMeta::new_readonly(system_program, false),
        ],
        data: slot_lottery::instruction::ClaimSlot {
            lottery_id,
            slot_index,
            payment,
        }
        .data(),
    }
}

fn claim_accounts(
    program_id: &Pubkey,
    claimer: Pubkey,
    lottery: (Pubkey, Account),
) -> Vec<(Pubkey, Account)> {
    let sysvar_owner = svm_key(anchor_lang::solana_program::sysvar::ID);
    let (system_program, system_account) = keyed_account_for_system_program();

    let mut slot_hashes = Account::new(1, 0, &sysvar_owner);
    slot_hashes.data = slot_hashes_data(1_000, [0x42u8; 32]);
    let mut instructions = Account::new(1, 0, &sysvar_owner);
    instructions.data = single_instruction_sysvar(program_id);

    vec![
        (claimer, signer_account()),
        lottery,
        (svm_key(anchor_lang::solana_program::sysvar::slot_hashes::ID), slot_hashes),
        (svm_key(anchor_lang::solana_program::sysvar::instructions::ID), instructions),
        (system_program, system_account),
    ]
}

fn slot_hashes_data(slot: u64, hash: [u8; 32]) -> Vec<u8> {
    let mut data = Vec::with_capacity(8 + 40);
    data.extend_from_slice(&1u64.to_le_bytes());
    data.extend_from_slice(&slot.to_le_bytes());
    data.extend_from_slice(&hash);
    data
}

/// Instructions sysvar for a transaction whose only instruction is the one executing.
fn single_instruction_sysvar(program_id: &Pubkey) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(&1u16.to_le_bytes());
    data.extend_from_slice(&4u16.to_le_bytes());
    data.extend_from_slice(&0u16.to_le_bytes());
    data.extend_from_slice(program_id.as_ref());
    data.extend_from_slice(&0u16.to_le_bytes());
    data.extend_from_slice(&0u16.to_le_bytes());
    data
}

fn read_config(data: &[u8]) -> Config {
    Config::try_deserialize(&mut &data[..]).expect("config layout")
}

fn read_lottery(data: &[u8]) -> Lottery {
    bytemuck::pod_read_unaligned(&data[8..])
}

fn assert_custom_error(result: &impl std::fmt::Debug, code: ErrorCode) {
    let expected = format!("Custom({})", code as u32 + anchor_lang::error::ERROR_CODE_OFFSET);
    let actual = format!("{result:?}");
    assert!(actual.contains(&expected), "expected {expected}, got {actual}");
}
