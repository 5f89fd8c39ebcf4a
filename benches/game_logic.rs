use criterion::{black_box, criterion_group, criterion_main, Criterion};

use gridfall::core::shapes::base_shape;
use gridfall::core::{Board, GameSession, PieceSelector};
use gridfall::types::FamilyId;

fn bench_valid_placement(c: &mut Criterion) {
    let mut board = Board::new();
    let shape = base_shape(FamilyId::L5);
    board.place(4, 4, &base_shape(FamilyId::O3), FamilyId::O3);

    c.bench_function("is_valid_placement", |b| {
        b.iter(|| board.is_valid_placement(black_box(3), black_box(3), &shape))
    });
}

fn bench_clear_lines(c: &mut Criterion) {
    c.bench_function("clear_row_and_column", |b| {
        b.iter(|| {
            let mut board = Board::new();
            for i in 0..10 {
                board.set(i, 3, Some(FamilyId::I));
                board.set(5, i, Some(FamilyId::J));
            }
            board.clear_completed_lines()
        })
    });
}

fn bench_next_piece(c: &mut Criterion) {
    let mut selector = PieceSelector::new(12345);
    let hand = [FamilyId::I, FamilyId::T, FamilyId::O2];

    c.bench_function("next_piece", |b| {
        b.iter(|| selector.next_piece(black_box(&hand)))
    });
}

fn bench_terminal_scan(c: &mut Criterion) {
    let session = GameSession::new(12345);

    c.bench_function("has_valid_moves_empty_board", |b| {
        b.iter(|| session.has_valid_moves())
    });
}

fn bench_placement_cycle(c: &mut Criterion) {
    c.bench_function("attempt_placement", |b| {
        let mut session = GameSession::new(12345);
        b.iter(|| {
            if session.is_game_over() {
                session.new_game();
            }
            let shape = session.hand()[0].shape;
            for y in 0..=(10 - shape.height()) as i8 {
                for x in 0..=(10 - shape.width()) as i8 {
                    if session.preview_validity(0, x, y) {
                        return session.attempt_placement(0, x, y);
                    }
                }
            }
            session.new_game();
            session.attempt_placement(0, 0, 0)
        })
    });
}

criterion_group!(
    benches,
    bench_valid_placement,
    bench_clear_lines,
    bench_next_piece,
    bench_terminal_scan,
    bench_placement_cycle
);
criterion_main!(benches);
