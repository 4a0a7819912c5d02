//! End-to-end tests exercising the full pipeline:
//! instructions -> seal -> sign -> parse -> verify.
//!
//! These tests use the public API only, the same surface an embedding
//! wallet sees, to catch regressions at the wire-format boundary.

use ed25519_dalek::{Signature, VerifyingKey};
use solwire_keys::{find_program_address, Blockhash, Pubkey};
use solwire_message::{
    sign_in_place, AccountMeta, AddressLookupTable, Ed25519Signer, Instruction, MessageBuilder,
    MessageView, Signer, MAX_MESSAGE_SIZE, SIGNATURE_LENGTH,
};

fn key(byte: u8) -> Pubkey {
    Pubkey::new([byte; 32])
}

fn verify(account: &Pubkey, message: &[u8], signature: &[u8]) -> bool {
    let Ok(verifying) = VerifyingKey::from_bytes(account.as_bytes()) else {
        return false;
    };
    let Ok(signature) = Signature::from_slice(signature) else {
        return false;
    };
    verifying.verify_strict(message, &signature).is_ok()
}

// ─── Legacy: build -> sign -> parse -> verify ──────────────────────

#[test]
fn legacy_full_pipeline() {
    let payer = Ed25519Signer::from_seed(&rand::random::<[u8; 32]>());
    let cosigner = Ed25519Signer::from_seed(&rand::random::<[u8; 32]>());
    let recipient = key(40);
    let program = key(41);

    let mut buffer = [0u8; MAX_MESSAGE_SIZE];
    let transaction = MessageBuilder::legacy(&mut buffer)
        .payer(payer.pubkey())
        .recent_blockhash(Blockhash::new([7u8; 32]))
        .instruction(Instruction::new(
            program,
            vec![
                AccountMeta::writable(cosigner.pubkey(), true),
                AccountMeta::writable(recipient, false),
            ],
            vec![2, 0, 0, 0, 100, 0, 0, 0],
        ))
        .seal()
        .unwrap()
        .signed()
        .by(&payer.pubkey(), &payer)
        .unwrap()
        .by(&cosigner.pubkey(), &cosigner)
        .unwrap()
        .build();

    let view = MessageView::parse(transaction).unwrap();
    assert!(view.is_legacy());
    assert_eq!(view.fee_payer().unwrap(), payer.pubkey());
    assert_eq!(view.count_signed(), 2);

    // Both signatures verify against the message body.
    let body = view.message_bytes();
    for signer in [&payer, &cosigner] {
        let account = signer.pubkey();
        let signature = view.signature_for(&account).unwrap();
        assert!(verify(&account, body, signature));
    }

    // Writability survives the round trip.
    assert!(view.is_writable(&recipient, &[]).unwrap());
    assert!(!view.is_writable(&program, &[]).unwrap());
}

// ─── V0: lookup tables through the whole pipeline ──────────────────

#[test]
fn v0_full_pipeline_with_lookup_tables() {
    let payer = Ed25519Signer::from_seed(&rand::random::<[u8; 32]>());
    let program = key(50);
    let pool = key(51);
    let oracle = key(52);
    let table = AddressLookupTable::new(key(60), vec![key(99), pool, oracle]);

    let mut buffer = [0u8; MAX_MESSAGE_SIZE];
    let transaction = MessageBuilder::v0(&mut buffer)
        .payer(payer.pubkey())
        .recent_blockhash(Blockhash::new([8u8; 32]))
        .instruction(Instruction::new(
            program,
            vec![
                AccountMeta::writable(pool, false),
                AccountMeta::readonly(oracle, false),
            ],
            vec![9],
        ))
        .lookup_tables(vec![table.clone()])
        .seal()
        .unwrap()
        .signed()
        .by(&payer.pubkey(), &payer)
        .unwrap()
        .build();

    let view = MessageView::parse(transaction).unwrap();
    assert!(!view.is_legacy());

    // Only the payer and the program stayed static.
    assert_eq!(view.static_accounts(), &[payer.pubkey(), program]);

    // The flattened list resolves through the supplied table and the
    // instruction indexes land on the right accounts.
    let accounts = view.accounts(std::slice::from_ref(&table)).unwrap();
    assert_eq!(accounts, vec![payer.pubkey(), program, pool, oracle]);
    let ix = &view.instructions()[0];
    assert_eq!(accounts[ix.program_index() as usize], program);
    assert_eq!(accounts[ix.account_indexes()[0] as usize], pool);
    assert_eq!(accounts[ix.account_indexes()[1] as usize], oracle);

    assert!(view.is_writable(&pool, std::slice::from_ref(&table)).unwrap());
    assert!(!view.is_writable(&oracle, std::slice::from_ref(&table)).unwrap());

    let signature = view.signature_for(&payer.pubkey()).unwrap();
    assert!(verify(&payer.pubkey(), view.message_bytes(), signature));
}

// ─── Partial signing across processes ──────────────────────────────

#[test]
fn signers_can_sign_independently_in_any_order() {
    let alice = Ed25519Signer::from_seed(&[0x11; 32]);
    let bob = Ed25519Signer::from_seed(&[0x22; 32]);

    let build = || {
        let mut buffer = vec![0u8; MAX_MESSAGE_SIZE];
        let len = MessageBuilder::legacy(&mut buffer)
            .payer(alice.pubkey())
            .recent_blockhash(Blockhash::new([1u8; 32]))
            .instruction(Instruction::new(
                key(70),
                vec![AccountMeta::writable(bob.pubkey(), true)],
                vec![5],
            ))
            .seal()
            .unwrap()
            .len();
        buffer.truncate(len);
        buffer
    };

    // Each signer works on their own copy of the serialized bytes, as if
    // the transaction had been shipped between processes.
    let mut alice_first = build();
    sign_in_place(&mut alice_first, &alice.pubkey(), &alice).unwrap();
    sign_in_place(&mut alice_first, &bob.pubkey(), &bob).unwrap();

    let mut bob_first = build();
    sign_in_place(&mut bob_first, &bob.pubkey(), &bob).unwrap();
    sign_in_place(&mut bob_first, &alice.pubkey(), &alice).unwrap();

    assert_eq!(alice_first, bob_first);

    let view = MessageView::parse(&alice_first).unwrap();
    for signer in [&alice, &bob] {
        let account = signer.pubkey();
        assert!(verify(
            &account,
            view.message_bytes(),
            view.signature_for(&account).unwrap()
        ));
    }
}

#[test]
fn unsigned_slots_keep_preexisting_buffer_bytes() {
    let alice = Ed25519Signer::from_seed(&[0x33; 32]);
    let bob = Ed25519Signer::from_seed(&[0x44; 32]);

    let mut buffer = [0xB3u8; MAX_MESSAGE_SIZE];
    let transaction = MessageBuilder::legacy(&mut buffer)
        .payer(alice.pubkey())
        .recent_blockhash(Blockhash::new([2u8; 32]))
        .instruction(Instruction::new(
            key(71),
            vec![AccountMeta::writable(bob.pubkey(), true)],
            vec![],
        ))
        .seal()
        .unwrap()
        .signed()
        .by(&alice.pubkey(), &alice)
        .unwrap()
        .build();

    let view = MessageView::parse(transaction).unwrap();
    assert!(verify(
        &alice.pubkey(),
        view.message_bytes(),
        view.signature_for(&alice.pubkey()).unwrap()
    ));
    // Bob never signed; his slot still holds the buffer's original fill.
    assert_eq!(
        view.signature_for(&bob.pubkey()).unwrap(),
        &[0xB3; SIGNATURE_LENGTH][..]
    );
}

#[test]
fn signing_is_size_stable() {
    let payer = Ed25519Signer::from_seed(&[0x55; 32]);

    let mut buffer = [0u8; MAX_MESSAGE_SIZE];
    let sealed = MessageBuilder::legacy(&mut buffer)
        .payer(payer.pubkey())
        .recent_blockhash(Blockhash::new([3u8; 32]))
        .instruction(Instruction::new(key(72), vec![], vec![1, 2, 3]))
        .seal()
        .unwrap();

    let len = sealed.len();
    let unsigned = sealed.unsigned().to_vec();
    sign_in_place(&mut buffer[..len], &payer.pubkey(), &payer).unwrap();

    // Same length, and every byte outside the payer's slot unchanged.
    assert_eq!(&buffer[..1], &unsigned[..1]);
    assert_eq!(&buffer[1 + SIGNATURE_LENGTH..len], &unsigned[1 + SIGNATURE_LENGTH..]);
}

// ─── External signers ──────────────────────────────────────────────

#[test]
fn closure_signers_plug_into_the_same_protocol() {
    // A remote or hardware signer only needs to map message bytes to a
    // 64-byte signature; the key never has to live in this process.
    let remote = |message: &[u8], signature: &mut [u8; SIGNATURE_LENGTH]| {
        let inner = Ed25519Signer::from_seed(&[0x66; 32]);
        inner.sign(message, signature);
    };
    let account = Ed25519Signer::from_seed(&[0x66; 32]).pubkey();

    let mut buffer = [0u8; MAX_MESSAGE_SIZE];
    let transaction = MessageBuilder::legacy(&mut buffer)
        .payer(account)
        .recent_blockhash(Blockhash::new([4u8; 32]))
        .instruction(Instruction::new(key(73), vec![], vec![]))
        .seal()
        .unwrap()
        .signed()
        .by(&account, &remote)
        .unwrap()
        .build();

    let view = MessageView::parse(transaction).unwrap();
    assert!(verify(
        &account,
        view.message_bytes(),
        view.signature_for(&account).unwrap()
    ));
}

// ─── Program-derived addresses in real instructions ────────────────

#[test]
fn pda_accounts_flow_through_the_message() {
    let payer = Ed25519Signer::from_seed(&[0x77; 32]);
    let program = key(80);
    let pda = find_program_address(&[b"vault", payer.pubkey().as_bytes()], &program).unwrap();

    let mut buffer = [0u8; MAX_MESSAGE_SIZE];
    let transaction = MessageBuilder::legacy(&mut buffer)
        .payer(payer.pubkey())
        .recent_blockhash(Blockhash::new([5u8; 32]))
        .instruction(Instruction::new(
            program,
            vec![AccountMeta::writable(pda.address, false)],
            vec![pda.bump],
        ))
        .seal()
        .unwrap()
        .signed()
        .by(&payer.pubkey(), &payer)
        .unwrap()
        .build();

    let view = MessageView::parse(transaction).unwrap();
    // The derived address is an ordinary unsigned writable account.
    assert_eq!(view.static_accounts()[1], pda.address);
    assert!(view.is_writable(&pda.address, &[]).unwrap());
    assert!(!view.is_signer(&pda.address));
}
