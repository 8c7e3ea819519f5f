// Encoding and proof benchmarks for Pramaan.
//
// Covers the split encoder, proof generation, and end-to-end verification
// through the in-memory store at the common RSA modulus sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use pramaan_protocol::crypto::keys::PramaanKeypair;
use pramaan_protocol::identity::{encode, Did};
use pramaan_protocol::proof::{prove, ProofVerifier};
use pramaan_protocol::storage::{MemoryStore, PublicKeyPem};

const DID: &str = "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08";
const KEY_SIZES: [usize; 2] = [2048, 3072];

fn bench_encode(c: &mut Criterion) {
    c.bench_function("identity/encode", |b| {
        b.iter(|| encode(black_box(DID)));
    });
}

fn bench_prove(c: &mut Criterion) {
    let did = Did::parse(DID).unwrap();
    let mut group = c.benchmark_group("proof/prove");
    group.sample_size(20);

    for bits in KEY_SIZES {
        let keypair = PramaanKeypair::generate(bits).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(bits), &keypair, |b, kp| {
            b.iter(|| prove(kp, &did));
        });
    }
    group.finish();
}

fn bench_verify(c: &mut Criterion) {
    let did = Did::parse(DID).unwrap();
    let mut group = c.benchmark_group("proof/verify");

    for bits in KEY_SIZES {
        let keypair = PramaanKeypair::generate(bits).unwrap();
        let store = MemoryStore::new();
        store.insert_identity(
            "alice",
            did.clone(),
            PublicKeyPem::from_key(&keypair.public_key()).unwrap(),
        );
        let verifier = ProofVerifier::new(store);
        let proof = prove(&keypair, &did).unwrap().to_hex();

        group.bench_with_input(BenchmarkId::from_parameter(bits), &proof, |b, proof| {
            b.iter(|| verifier.verify_proof("alice", proof));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_encode, bench_prove, bench_verify);
criterion_main!(benches);
