use criterion::{black_box, criterion_group, criterion_main, Criterion};

use evote_crypto::{ReceiptHasher, TokenClaims, TokenSigner};
use evote_types::{ElectionId, Role, Timestamp, VoterId};

fn sha256_256b_bench(c: &mut Criterion) {
    let data = [0xABu8; 256];

    c.bench_function("sha256_256B", |b| {
        b.iter(|| evote_crypto::sha256(black_box(&data)))
    });
}

fn receipt_bench(c: &mut Criterion) {
    let instant = Timestamp::from_nanos(1_700_000_000_123_456_789);

    c.bench_function("receipt_generate", |b| {
        b.iter(|| {
            ReceiptHasher::generate(
                black_box(VoterId::new(48_213)),
                black_box(ElectionId::new(7)),
                instant,
            )
        })
    });
}

fn token_issue_bench(c: &mut Criterion) {
    let signer = TokenSigner::new("bench-secret");
    let claims = TokenClaims {
        sub: 42,
        role: Role::Voter,
        roles: Vec::new(),
        exp: u64::MAX,
    };

    c.bench_function("token_issue", |b| {
        b.iter(|| signer.issue(black_box(&claims)))
    });
}

fn token_verify_bench(c: &mut Criterion) {
    let signer = TokenSigner::new("bench-secret");
    let claims = TokenClaims {
        sub: 42,
        role: Role::Staff,
        roles: vec!["register_voter,view_results,view_audit_logs".to_string()],
        exp: u64::MAX,
    };
    let token = signer.issue(&claims).unwrap();
    let now = Timestamp::from_secs(1_700_000_000);

    c.bench_function("token_verify", |b| {
        b.iter(|| signer.verify(black_box(&token), now))
    });
}

criterion_group!(
    benches,
    sha256_256b_bench,
    receipt_bench,
    token_issue_bench,
    token_verify_bench,
);
criterion_main!(benches);
