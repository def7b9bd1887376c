//! Benchmarks for the per-frame swarm step
//!
//! Flock is the only quadratic formation, so it dominates frame cost
//!
//! Run with: cargo bench --bench swarm_step_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use drone_swarm::agent::Agent;
use drone_swarm::{notes_for, FormationKind, NoteEngine, Swarm, SwarmConfig};
use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn swarm(formation: FormationKind, agent_count: usize) -> Swarm {
    Swarm::new(SwarmConfig {
        agent_count,
        formation: formation.name().to_string(),
        seed: Some(1),
        ..SwarmConfig::default()
    })
}

/// One frame for every formation at the default drone count
fn bench_formations(c: &mut Criterion) {
    let mut group = c.benchmark_group("formation_step");

    for kind in FormationKind::ALL {
        let mut s = swarm(kind, 8);
        group.bench_function(kind.name(), |b| b.iter(|| black_box(s.step())));
    }

    group.finish();
}

/// Flock cost as the swarm grows
fn bench_flock_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("flock_scaling");
    group.sample_size(50);

    for agent_count in [8, 32, 128] {
        let mut s = swarm(FormationKind::Flock, agent_count);
        group.bench_with_input(BenchmarkId::new("flock", agent_count), &agent_count, |b, _| {
            b.iter(|| black_box(s.step()))
        });
    }

    group.finish();
}

/// Note evaluation alone, with every drone gated open
fn bench_note_engine(c: &mut Criterion) {
    let notes = notes_for("Major", 48);
    let mut engine = NoteEngine::new(StdRng::seed_from_u64(0), 1, 0.3);
    let mut agents: Vec<Agent> = (0..64)
        .map(|i| {
            let mut agent = Agent::seeded(i, i as u64);
            agent.velocity = Vec3::new(0.45, 0.0, 0.0);
            agent
        })
        .collect();
    let mask = vec![true; agents.len()];
    let mut shift = 0.0f32;

    c.bench_function("note_engine_64", |b| {
        b.iter(|| {
            // Move everyone so pitches keep changing
            shift = (shift + 1.7) % 30.0;
            for agent in agents.iter_mut() {
                agent.position.x = (agent.position.x + shift) % 15.0;
            }
            black_box(engine.process(&mut agents, black_box(&mask), &notes))
        })
    });
}

criterion_group!(benches, bench_formations, bench_flock_scaling, bench_note_engine);
criterion_main!(benches);
