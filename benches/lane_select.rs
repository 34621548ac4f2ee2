//! Benchmark for lane selection under a loaded screen.

use criterion::Criterion;

use danmaku_rs::overlay::{CommentGeometry, LaneOccupant, LaneState, select_lane};
use danmaku_rs::time::{DurationMs, PlaybackTime};

fn loaded_lanes(count: usize) -> Vec<LaneState> {
    (0..count)
        .map(|index| {
            let mut lane = LaneState::empty();
            lane.set_occupant(LaneOccupant {
                slot: index,
                entered_at: PlaybackTime(-((index as i64) * 333)),
                width: 80.0 + (index as f32) * 40.0,
                travel: DurationMs(5000),
            });
            lane
        })
        .collect()
}

fn bench_select_lane(c: &mut Criterion) {
    let mut group = c.benchmark_group("select_lane");

    for lane_count in [10_usize, 40] {
        let lanes = loaded_lanes(lane_count);
        let geometry = CommentGeometry {
            width: 160.0,
            travel: DurationMs(5000),
            screen_width: 1280.0,
        };
        let occupied: Vec<f32> = (0..lane_count).map(|index| index as f32).collect();
        group.bench_function(format!("{lane_count}_lanes_loaded"), |b| {
            b.iter(|| {
                select_lane(
                    std::hint::black_box(&geometry),
                    std::hint::black_box(PlaybackTime(1000)),
                    std::hint::black_box(&lanes),
                    std::hint::black_box(&occupied),
                )
            });
        });
    }

    group.finish();
}

fn main() {
    let mut criterion = Criterion::default();
    bench_select_lane(&mut criterion);
}
