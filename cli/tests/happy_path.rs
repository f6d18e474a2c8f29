use draughts::{MOVE_GEN, Position, Variant, VariantId};
use draughts_cli::{Response, Session};

use testresult::TestResult;

fn run(session: &mut Session<draughts::DraughtsMoveGen>, line: &str) -> Result<String, anyhow::Error> {
    session.handle_command(line).map(|response| response.to_string())
}

#[test]
fn test_happy_path() -> TestResult {
    let mut session = Session::new(MOVE_GEN, Position::default());

    assert_eq!(run(&mut session, "new american")?, "new game: American/English (8x8)");
    assert_eq!(run(&mut session, "status")?, "status: playing");

    assert_eq!(run(&mut session, "move 22-18")?, "played 22-18");
    assert_eq!(run(&mut session, "11-15")?, "played 11-15");
    assert_eq!(run(&mut session, "moves captures")?, "18x11");
    assert_eq!(run(&mut session, "moves")?, "18x11");
    assert_eq!(run(&mut session, "18x11")?, "played 18x11");
    assert_eq!(run(&mut session, "history")?, "1. 22-18\n2. 11-15\n3. 18x11");

    assert_eq!(run(&mut session, "undo")?, "undone 18x11");
    assert_eq!(run(&mut session, "fen clocks")?, session.position().to_fen_with_clocks());
    assert!(run(&mut session, "fen")?.starts_with("W:W18,21,23,24,25,26,27,28,29,30,31,32:B"));

    assert_eq!(
        run(&mut session, "draw")?,
        "repetition: false, fifty move rule: false, insufficient material: false"
    );
    Ok(())
}

#[test]
fn test_load_and_finish_game() -> TestResult {
    let mut session = Session::new(MOVE_GEN, Position::start(Variant::get(VariantId::American)));

    assert_eq!(run(&mut session, "load W:W18,22:B14")?, "loaded: white 2, black 1, kings 0");
    assert_eq!(run(&mut session, "18x9")?, "played 18x9\nstatus: checkmate");
    assert_eq!(run(&mut session, "moves")?, "no moves");

    assert_eq!(run(&mut session, "clear")?, "board cleared");
    assert_eq!(run(&mut session, "fen")?, "W:");
    Ok(())
}

#[test]
fn test_errors_leave_session_usable() -> TestResult {
    let mut session = Session::new(MOVE_GEN, Position::default());

    assert!(run(&mut session, "fly 32-28").is_err());
    assert!(run(&mut session, "move 32-23").is_err());
    assert!(run(&mut session, "load W:W28:B28").is_err());
    assert!(run(&mut session, "undo").is_err());
    assert!(run(&mut session, "new chess").is_err());

    assert_eq!(run(&mut session, "32-28")?, "played 32-28");
    Ok(())
}

#[test]
fn test_variants_and_board() -> TestResult {
    let mut session = Session::new(MOVE_GEN, Position::default());

    let variants = run(&mut session, "variants")?;
    assert_eq!(variants.lines().count(), 7);
    assert!(variants.starts_with("international"));
    assert!(variants.contains("turkish"));

    assert_eq!(run(&mut session, "new turkish")?, "new game: Turkish (8x8)");
    let board = run(&mut session, "board")?;
    assert_eq!(board.lines().count(), 9);
    Ok(())
}

#[test]
fn test_quit() -> TestResult {
    let mut session = Session::new(MOVE_GEN, Position::default());
    assert!(matches!(session.handle_command("quit")?, Response::Quit));
    Ok(())
}
