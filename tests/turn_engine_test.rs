//! End-to-end engine tests: multi-turn games and concurrency safety.

use std::thread;
use wordgrid::{
    commit_turn, ClientClaims, Coord, GameSession, GameStatus, ProposedTurn, SessionManager,
    SubmitError, Tile, TileBag, TurnError, WordList,
};

fn lexicon() -> WordList {
    WordList::from_words(["HELLO", "WORLD", "ELF", "AT", "TO", "ONE", "AXE"])
}

/// Deterministic two-player session: player one holds HELLO plus two
/// spares, player two holds WORLDEF.
fn two_player_session(id: &str) -> GameSession {
    let mut tiles = vec!['A'; 86];
    tiles.extend(['W', 'O', 'R', 'L', 'D', 'E', 'F']); // player two's rack
    tiles.extend(['H', 'E', 'L', 'L', 'O', 'A', 'B']); // player one's rack
    GameSession::with_bag(
        id.to_string(),
        vec!["PlayerOne".to_string(), "PlayerTwo".to_string()],
        TileBag::from_tiles(tiles),
    )
}

fn proposed(player_id: &str, snapshot: wordgrid::Board) -> ProposedTurn {
    ProposedTurn {
        player_id: player_id.to_string(),
        snapshot,
        claims: ClientClaims::default(),
    }
}

#[test]
fn test_two_turn_game() {
    let mut session = two_player_session("game_1");
    let p1 = session.players()[0].id().clone();
    let p2 = session.players()[1].id().clone();

    // Turn 1: HELLO across row 7 from the center.
    let mut snapshot = session.board().clone();
    for (i, letter) in "HELLO".chars().enumerate() {
        snapshot.set(Coord::new(7, 7 + i), Tile::letter(letter));
    }
    let first = commit_turn(&mut session, &proposed(&p1, snapshot), &lexicon()).unwrap();
    assert_eq!(first.primary_word(), "HELLO");
    assert_eq!(*first.score(), 18);
    assert_eq!(*first.turn_seq(), 1);
    assert_eq!(*session.status(), GameStatus::InProgress);

    // Turn 2: ELF down through the E of HELLO.
    let mut snapshot = session.board().clone();
    snapshot.set(Coord::new(8, 8), Tile::letter('L'));
    snapshot.set(Coord::new(9, 8), Tile::letter('F'));
    let second = commit_turn(&mut session, &proposed(&p2, snapshot), &lexicon()).unwrap();
    assert_eq!(second.primary_word(), "ELF");
    assert_eq!(*second.score(), 7);
    assert_eq!(*second.turn_seq(), 2);

    // Both words stand on the authoritative board.
    assert_eq!(session.board().get(Coord::new(7, 7)), Some(Tile::letter('H')));
    assert_eq!(session.board().get(Coord::new(9, 8)), Some(Tile::letter('F')));
    assert_eq!(*session.players()[0].score(), 18);
    assert_eq!(*session.players()[1].score(), 7);
}

#[test]
fn test_first_move_off_center_rejected() {
    let mut session = two_player_session("game_2");
    let p1 = session.players()[0].id().clone();

    let mut snapshot = session.board().clone();
    snapshot.set(Coord::new(0, 0), Tile::letter('H'));
    snapshot.set(Coord::new(0, 1), Tile::letter('E'));
    snapshot.set(Coord::new(0, 2), Tile::letter('L'));
    snapshot.set(Coord::new(0, 3), Tile::letter('L'));
    snapshot.set(Coord::new(0, 4), Tile::letter('O'));

    let err = commit_turn(&mut session, &proposed(&p1, snapshot), &lexicon()).unwrap_err();
    assert_eq!(err, TurnError::MustCoverCenter);
    assert_eq!(*session.turn_seq(), 0);
    assert_eq!(*session.status(), GameStatus::Waiting);
}

#[test]
fn test_detached_second_move_rejected() {
    let mut session = two_player_session("game_3");
    let p1 = session.players()[0].id().clone();
    let p2 = session.players()[1].id().clone();

    let mut snapshot = session.board().clone();
    for (i, letter) in "HELLO".chars().enumerate() {
        snapshot.set(Coord::new(7, 7 + i), Tile::letter(letter));
    }
    commit_turn(&mut session, &proposed(&p1, snapshot), &lexicon()).unwrap();

    // WORLD nowhere near HELLO.
    let mut snapshot = session.board().clone();
    for (i, letter) in "WORLD".chars().enumerate() {
        snapshot.set(Coord::new(0, i), Tile::letter(letter));
    }
    let err = commit_turn(&mut session, &proposed(&p2, snapshot), &lexicon()).unwrap_err();
    assert_eq!(err, TurnError::Disconnected);
    assert_eq!(*session.turn_seq(), 1);
}

#[test]
fn test_blank_tile_plays_and_scores_zero() {
    let mut tiles = vec!['A'; 86];
    tiles.extend(['W', 'O', 'R', 'L', 'D', 'E', 'F']);
    tiles.extend(['?', 'I', 'L', 'L', 'O', 'A', 'B']); // blank stands in for H
    let mut session = GameSession::with_bag(
        "game_4".to_string(),
        vec!["PlayerOne".to_string(), "PlayerTwo".to_string()],
        TileBag::from_tiles(tiles),
    );
    let p1 = session.players()[0].id().clone();

    let mut snapshot = session.board().clone();
    snapshot.set(Coord::new(7, 7), Tile::blank('H'));
    snapshot.set(Coord::new(7, 8), Tile::letter('I'));
    let committed =
        commit_turn(&mut session, &proposed(&p1, snapshot), &WordList::from_words(["HI"]))
            .unwrap();

    assert_eq!(committed.primary_word(), "HI");
    // Blank H contributes nothing; I doubled by the center star.
    assert_eq!(*committed.score(), 2);
}

#[test]
fn test_concurrent_submissions_commit_exactly_once() {
    let manager = SessionManager::new();
    let session = two_player_session("game_race");
    let p1 = session.players()[0].id().clone();
    let base = session.board().clone();
    manager.insert_game(session);

    // Both submissions diff against the same pre-commit board.
    let mut snapshot = base;
    for (i, letter) in "HELLO".chars().enumerate() {
        snapshot.set(Coord::new(7, 7 + i), Tile::letter(letter));
    }

    let results: Vec<Result<u64, SubmitError>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..2)
            .map(|_| {
                let manager = manager.clone();
                let snapshot = snapshot.clone();
                let p1 = p1.clone();
                scope.spawn(move || {
                    let lexicon = lexicon();
                    manager
                        .submit_turn("game_race", &proposed(&p1, snapshot), &lexicon)
                        .map(|committed| *committed.turn_seq())
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let committed: Vec<_> = results.iter().filter(|r| r.is_ok()).collect();
    assert_eq!(committed.len(), 1, "exactly one submission may commit");

    let game = manager.get_game("game_race").unwrap();
    assert_eq!(*game.turn_seq(), 1);
    assert_eq!(game.board().get(Coord::new(7, 7)), Some(Tile::letter('H')));
}
