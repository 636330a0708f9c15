use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec3;
use lane_path_editor::{
    CustomizationRegistry, Curve, LaneCustomization, LaneCustomizationStore, LaneDefaults,
    LaneNetwork, LaneRef, SegmentId,
};
use std::hint::black_box;

/// Kette aus `segment_count` Segmenten mit je vier Lanes, leicht gekrümmt.
fn build_chain(segment_count: usize) -> (LaneNetwork, Vec<SegmentId>) {
    let mut network = LaneNetwork::new();
    for index in 0..=segment_count {
        let x = index as f32 * 25.0;
        let z = (index as f32 * 0.7).sin() * 8.0;
        network.add_node(index as u32 + 1, Vec3::new(x, 0.0, z), true);
    }

    let lanes: Vec<LaneDefaults> = [-5.25, -1.75, 1.75, 5.25]
        .iter()
        .map(|&lateral| LaneDefaults {
            lateral,
            vertical: 0.0,
        })
        .collect();

    let segments = (0..segment_count)
        .map(|index| {
            network
                .add_segment(index as u32 + 1, index as u32 + 2, 7.0, lanes.clone())
                .expect("Segment anlegen fehlgeschlagen")
        })
        .collect();
    network.take_queued_updates();
    (network, segments)
}

fn bench_apply_shift(c: &mut Criterion) {
    let (mut network, segments) = build_chain(1);
    let lane = LaneRef::new(segments[0], 1);
    let mut customization =
        LaneCustomization::from_source(lane, &network).expect("Lane muss existieren");
    customization.lateral_shift = 0.5;

    c.bench_function("apply_shift_single_lane", |b| {
        b.iter(|| {
            // Host-Kurve zurücksetzen, damit sich die Verschiebung nicht aufaddiert
            network.update_segment(segments[0]).expect("Update fehlgeschlagen");
            black_box(customization.apply_shift(black_box(&mut network)))
        })
    });
}

fn bench_recompute_base(c: &mut Criterion) {
    let (mut network, segments) = build_chain(1);
    let lane = LaneRef::new(segments[0], 2);
    let mut customization =
        LaneCustomization::from_source(lane, &network).expect("Lane muss existieren");
    customization.set_delta_points(Curve::ZERO.with_control_point(1, Vec3::new(0.0, 0.5, 1.0)));

    c.bench_function("recompute_base_single_lane", |b| {
        b.iter(|| black_box(customization.recompute_base(black_box(&mut network))))
    });
}

fn bench_recompute_segments(c: &mut Criterion) {
    let mut group = c.benchmark_group("recompute_segments");

    for &segment_count in &[10usize, 100usize] {
        let (mut network, segments) = build_chain(segment_count);
        let mut store = CustomizationRegistry::new();
        for (i, segment_id) in segments.iter().enumerate() {
            for customization in store
                .get_or_create_all(*segment_id, &network)
                .expect("Lanes anlegen fehlgeschlagen")
            {
                // Jede zweite Lane mit Kontrollpunkt-Delta (voller Pfad)
                if (customization.lane().lane_index() + i) % 2 == 0 {
                    customization.set_delta_points(
                        Curve::ZERO.with_control_point(2, Vec3::new(0.0, 0.0, 0.5)),
                    );
                } else {
                    customization.lateral_shift = 0.25;
                }
            }
        }

        group.bench_with_input(
            BenchmarkId::new("all_lanes", segment_count),
            &segments,
            |b, segments| {
                b.iter(|| {
                    let mut lanes = 0usize;
                    for segment_id in segments {
                        network.update_segment(*segment_id).expect("Update fehlgeschlagen");
                        lanes += store
                            .recompute_segment(*segment_id, &mut network)
                            .expect("Recompute fehlgeschlagen");
                    }
                    black_box(lanes)
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_apply_shift,
    bench_recompute_base,
    bench_recompute_segments
);
criterion_main!(benches);
