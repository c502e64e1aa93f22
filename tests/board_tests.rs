//! Board tests - grid access, collision, merge, line clears

use blockfall::core::{Board, Tetromino};
use blockfall::types::{Cell, Color, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

const GREY: Cell = Some(Color(0x808080));

fn fill_row(board: &mut Board, y: i8) {
    for x in 0..BOARD_WIDTH as i8 {
        board.set(x, y, GREY);
    }
}

#[test]
fn test_board_new_empty() {
    let board = Board::new();
    assert_eq!(board.width(), BOARD_WIDTH);
    assert_eq!(board.height(), BOARD_HEIGHT);
    assert_eq!(board.lines_cleared(), 0);

    for y in 0..BOARD_HEIGHT as i8 {
        for x in 0..BOARD_WIDTH as i8 {
            assert_eq!(board.get(x, y), Some(None), "cell ({}, {})", x, y);
        }
    }
}

#[test]
fn test_board_out_of_bounds() {
    let mut board = Board::new();

    assert_eq!(board.get(-1, 0), None);
    assert_eq!(board.get(0, -1), None);
    assert_eq!(board.get(BOARD_WIDTH as i8, 0), None);
    assert_eq!(board.get(0, BOARD_HEIGHT as i8), None);

    assert!(!board.set(-1, 0, GREY));
    assert!(!board.set(0, BOARD_HEIGHT as i8, GREY));
    assert!(!board.is_occupied(-1, 5));
}

#[test]
fn test_board_set_and_get_colors() {
    let mut board = Board::new();

    assert!(board.set(5, 10, Some(PieceKind::T.color())));
    assert_eq!(board.get(5, 10), Some(Some(Color(0x800080))));
    assert!(board.is_occupied(5, 10));

    assert!(board.set(5, 10, None));
    assert!(!board.is_occupied(5, 10));
}

#[test]
fn test_collision_with_walls_and_floor() {
    let board = Board::new();
    let mut piece = Tetromino::new(PieceKind::O);

    assert!(!board.collides(&piece, 0, 0));

    piece.x = 0;
    assert!(board.collides(&piece, -1, 0));
    piece.x = 8;
    assert!(board.collides(&piece, 1, 0));
    piece.y = 18;
    assert!(board.collides(&piece, 0, 1));
    assert!(!board.collides(&piece, 0, 0));
}

#[test]
fn test_collision_with_stack() {
    let mut board = Board::new();
    board.set(4, 10, GREY);

    let mut piece = Tetromino::new(PieceKind::O);
    piece.y = 8;
    assert!(board.collides(&piece, 0, 1));
    assert!(!board.collides(&piece, 2, 1));
}

#[test]
fn test_piece_above_board_only_checks_walls() {
    let board = Board::new();
    let mut piece = Tetromino::new(PieceKind::I);
    assert_eq!(piece.y, -1);
    assert!(!board.collides(&piece, 0, 0));

    piece.y = -3;
    assert!(!board.collides(&piece, 0, 0));
    piece.x = -1;
    assert!(board.collides(&piece, 0, 0));
}

#[test]
fn test_merge_writes_piece_color() {
    let mut board = Board::new();
    let mut piece = Tetromino::new(PieceKind::S);
    piece.y = 18;
    board.merge(&piece);

    // S: row 0 is ".XX", row 1 is "XX."
    assert_eq!(board.get(4, 18), Some(Some(PieceKind::S.color())));
    assert_eq!(board.get(5, 18), Some(Some(PieceKind::S.color())));
    assert_eq!(board.get(3, 19), Some(Some(PieceKind::S.color())));
    assert_eq!(board.get(4, 19), Some(Some(PieceKind::S.color())));
    assert_eq!(board.cells().iter().filter(|c| c.is_some()).count(), 4);
}

#[test]
fn test_clear_single_line_shifts_down() {
    let mut board = Board::new();
    fill_row(&mut board, 19);
    board.set(2, 18, GREY);
    board.set(7, 17, GREY);

    let clear = board.clear_lines();
    assert_eq!(clear.rows.as_slice(), &[19]);
    assert_eq!(clear.cleared(), 1);
    assert_eq!(clear.total, 1);

    assert!(board.is_occupied(2, 19));
    assert!(board.is_occupied(7, 18));
    assert_eq!(board.cells().iter().filter(|c| c.is_some()).count(), 2);
}

#[test]
fn test_clear_non_adjacent_lines() {
    let mut board = Board::new();
    fill_row(&mut board, 19);
    fill_row(&mut board, 17);
    board.set(0, 18, GREY);
    board.set(9, 16, GREY);

    let clear = board.clear_lines();
    assert_eq!(clear.rows.as_slice(), &[17, 19]);

    assert!(board.is_occupied(0, 19));
    assert!(board.is_occupied(9, 18));
    assert!(!board.is_row_full(19));
}

#[test]
fn test_clear_four_lines() {
    let mut board = Board::new();
    for y in 16..20 {
        fill_row(&mut board, y);
    }

    let clear = board.clear_lines();
    assert_eq!(clear.rows.as_slice(), &[16, 17, 18, 19]);
    assert!(board.cells().iter().all(|c| c.is_none()));
}

#[test]
fn test_lines_accumulate_across_clears() {
    let mut board = Board::new();
    fill_row(&mut board, 19);
    board.clear_lines();
    fill_row(&mut board, 19);
    fill_row(&mut board, 18);

    assert_eq!(board.clear_lines().total, 3);
    assert_eq!(board.lines_cleared(), 3);
}

#[test]
fn test_no_full_rows_is_noop() {
    let mut board = Board::new();
    board.set(3, 19, GREY);
    let before = board.clone();

    let clear = board.clear_lines();
    assert!(clear.rows.is_empty());
    assert_eq!(board, before);
}

#[test]
fn test_game_over_only_checks_top_row() {
    let mut board = Board::new();
    board.set(0, 1, GREY);
    assert!(!board.is_game_over());

    board.set(9, 0, GREY);
    assert!(board.is_game_over());
}

#[test]
fn test_clear_rows_two_and_five() {
    let mut board = Board::new();
    fill_row(&mut board, 2);
    fill_row(&mut board, 5);
    board.set(1, 0, GREY);
    board.set(2, 3, GREY);
    board.set(3, 4, GREY);
    board.set(4, 6, GREY);
    board.set(5, 19, GREY);

    let clear = board.clear_lines();
    assert_eq!(clear.rows.as_slice(), &[2, 5]);
    assert_eq!(clear.cleared(), 2);
    assert_eq!(clear.total, 2);

    // Above row 2: down two. Between 2 and 5: down one. Below 5: unchanged.
    assert!(board.row(0).unwrap().iter().all(|c| c.is_none()));
    assert!(board.row(1).unwrap().iter().all(|c| c.is_none()));
    assert!(board.is_occupied(1, 2));
    assert!(board.is_occupied(2, 4));
    assert!(board.is_occupied(3, 5));
    assert!(board.is_occupied(4, 6));
    assert!(board.is_occupied(5, 19));
    assert_eq!(board.cells().iter().filter(|c| c.is_some()).count(), 5);
}
