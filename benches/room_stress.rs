use std::sync::Arc;

use async_trait::async_trait;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use tokio::runtime::Runtime;
use tokio::sync::Mutex;

use gametable::connection::{SinkAdapter, TransportError};
use gametable::game::pebble::PassThePebble;
use gametable::game::Game;
use gametable::response::Outbound;
use gametable::room::Room;

struct NullSink;

#[async_trait]
impl SinkAdapter for NullSink {
    async fn send(&mut self, _payload: Outbound) -> Result<(), TransportError> {
        Ok(())
    }
}

fn build_room(connections: usize) -> Room<NullSink> {
    let mut room = Room::new("BNCH".to_string(), Box::new(PassThePebble::new(2)));
    for i in 0..connections {
        room.join(format!("client-{i}"), NullSink);
    }
    room
}

fn bench_broadcast_slots(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("broadcast_slots");
    for connections in [16, 64, 256] {
        let room = Arc::new(Mutex::new(build_room(connections)));
        group.bench_with_input(
            BenchmarkId::from_parameter(connections),
            &connections,
            |b, _| {
                b.to_async(&rt).iter(|| {
                    let room = room.clone();
                    async move { room.lock().await.broadcast_slots().await }
                });
            },
        );
    }
    group.finish();
}

fn bench_send_game_state(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("send_game_state");
    for connections in [16, 64, 256] {
        let room = Arc::new(Mutex::new(build_room(connections)));
        rt.block_on(async {
            let mut room = room.lock().await;
            room.claim_slot(0, "client-0").await;
            room.claim_slot(1, "client-1").await;
            room.game_mut().start_game().unwrap();
        });
        group.bench_with_input(
            BenchmarkId::from_parameter(connections),
            &connections,
            |b, _| {
                b.to_async(&rt).iter(|| {
                    let room = room.clone();
                    async move { room.lock().await.send_game_state().await }
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_broadcast_slots, bench_send_game_state);
criterion_main!(benches);
