// Minimal integration test that drives the compiled binary through a PTY.
// Starts straight into a three word flashcard run, answers every card and
// quits from the results screen.
//
// Notes:
// - Requires a TTY; uses expectrl which allocates a pseudo terminal.
// - Unix-only and ignored by default.
// - Run manually via: `cargo test --test integration_min_session -- --ignored`.

#![cfg(unix)]

use std::time::Duration;

use expectrl::{spawn, Eof};

#[test]
#[ignore]
fn minimal_flashcard_session_exits() -> Result<(), Box<dyn std::error::Error>> {
    let bin = assert_cmd::cargo::cargo_bin("hanzi-cards");
    let cmd = format!(
        "{} --start flashcards --number-of-words 3 --seed 1",
        bin.display()
    );

    let mut p = spawn(cmd)?;
    std::thread::sleep(Duration::from_millis(200));

    for _ in 0..3 {
        p.send(" ")?;
        p.send("y")?;
        std::thread::sleep(Duration::from_millis(50));
    }

    p.send("\x1b")?; // ESC
    p.expect(Eof)?;
    Ok(())
}

#[test]
#[ignore]
fn matching_game_backs_out_to_menu() -> Result<(), Box<dyn std::error::Error>> {
    let bin = assert_cmd::cargo::cargo_bin("hanzi-cards");
    let cmd = format!("{} --start matching --seed 7", bin.display());

    let mut p = spawn(cmd)?;
    std::thread::sleep(Duration::from_millis(200));

    // select two tiles, then leave before the evaluation delay runs out
    p.send("\r")?;
    p.send("l")?;
    p.send("\r")?;
    p.send("b")?;
    std::thread::sleep(Duration::from_millis(800));

    p.send("q")?;
    p.expect(Eof)?;
    Ok(())
}
