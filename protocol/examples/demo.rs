//! Terminal walkthrough of the Pramaan proof lifecycle.
//!
//! Enrolls two users in a temporary sled database, splits their DIDs,
//! produces proofs, and shows which presentations the verifier accepts.
//!
//! Run with:
//!   cargo run --example demo --release

use std::time::Instant;

use pramaan_protocol::crypto::keys::PramaanKeypair;
use pramaan_protocol::identity::{encode, Did};
use pramaan_protocol::proof::{prove, ProofVerifier};
use pramaan_protocol::storage::{IdentityDb, PublicKeyPem};

// ---------------------------------------------------------------------------
// ANSI color constants
// ---------------------------------------------------------------------------

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const WHITE: &str = "\x1b[37m";

// ---------------------------------------------------------------------------
// Display helpers
// ---------------------------------------------------------------------------

fn section(num: u32, title: &str) {
    println!();
    println!("{BOLD}{CYAN}===[{YELLOW} Step {num} {CYAN}]========================================{RESET}");
    println!("{BOLD}{WHITE}  {title}{RESET}");
}

fn info(label: &str, value: &str) {
    println!("{WHITE}  {BOLD}{label}:{RESET} {YELLOW}{value}{RESET}");
}

fn timing(label: &str, elapsed: std::time::Duration) {
    let ms = elapsed.as_secs_f64() * 1000.0;
    println!("{DIM}  [{label}: {ms:.2} ms]{RESET}");
}

fn outcome(label: &str, accepted: bool) {
    if accepted {
        println!("{GREEN}  [ACCEPTED] {label}{RESET}");
    } else {
        println!("{RED}  [REJECTED] {label}{RESET}");
    }
}

fn short(hex: &str) -> String {
    format!("{}...{}", &hex[..12], &hex[hex.len() - 8..])
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() {
    const ALICE_DID: &str = "6b86b273ff34fce19d6b804eff5a3f5747ada4eaa22f1d49c01e52ddb7875b4b";
    const BOB_DID: &str = "d4735e3a265e16eee03f59718b9b5d03019c07d8b6c51f90da3a666eec13ab35";

    // -- Step 1 ---------------------------------------------------------------
    section(1, "Enrollment");

    let t = Instant::now();
    let alice = PramaanKeypair::generate(2048).expect("keygen");
    let bob = PramaanKeypair::generate(2048).expect("keygen");
    timing("RSA-2048 keygen x2", t.elapsed());

    let db = IdentityDb::open_temporary().expect("temporary database");
    for (user, kp, did) in [("alice", &alice, ALICE_DID), ("bob", &bob, BOB_DID)] {
        let pem = PublicKeyPem::from_key(&kp.public_key()).expect("pem");
        db.put_identity(user, &Did::parse(did).expect("did"), &pem)
            .expect("enroll");
        info(user, &format!("{} key {}", short(did), kp.public_key().fingerprint()));
    }

    // -- Step 2 ---------------------------------------------------------------
    section(2, "Split identifiers");

    for did in [ALICE_DID, BOB_DID] {
        let split = encode(did).expect("valid DID");
        info("high", &split.high.to_string());
        info("low ", &split.low.to_string());
        assert_eq!(split.to_hex(), did);
    }

    // -- Step 3 ---------------------------------------------------------------
    section(3, "Proofs");

    let verifier = ProofVerifier::new(db);
    let t = Instant::now();
    let alice_proof = prove(&alice, &Did::parse(ALICE_DID).expect("did"))
        .expect("sign")
        .to_hex();
    timing("prove", t.elapsed());
    info("alice proof", &short(&alice_proof));

    let t = Instant::now();
    outcome("alice presents her own proof", verifier.verify_proof("alice", &alice_proof));
    timing("verify", t.elapsed());

    outcome("bob presents alice's proof", verifier.verify_proof("bob", &alice_proof));

    let mut tampered = alice_proof.clone();
    tampered.replace_range(0..2, if &alice_proof[..2] == "00" { "01" } else { "00" });
    outcome("alice presents a tampered proof", verifier.verify_proof("alice", &tampered));

    outcome("carol was never enrolled", verifier.verify_proof("carol", &alice_proof));
    println!();
}
