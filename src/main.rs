use anyhow::Result;
use ptydrive::{Pattern, Session};
use std::time::Duration;

/// Drives a small interactive login shim end to end: waits for prompts,
/// answers them, and prints the transcript.
#[tokio::main]
async fn main() -> Result<()> {
    println!("ptydrive - PTY process driving demo");
    println!("{}", "=".repeat(50));

    let script = r#"printf "login: "; read user; printf "password: "; read pass; echo "welcome, $user""#;

    let mut session = Session::builder()
        .timeout(Duration::from_secs(10))
        .poll_interval(Duration::from_millis(50))
        .spawn(script)?;

    println!("spawned pid {}", session.pid());

    session.wait(&Pattern::exact("login: ")).await?;
    session.send_line("demo").await?;

    session.wait(&Pattern::exact("password: ")).await?;
    session.send_line("secret").await?;

    let outcome = session.wait(&Pattern::regex(r"welcome, (\w+)")?).await?;
    if let Some(info) = outcome.match_info() {
        println!("matched: {:?} (user = {:?})", info.matched, info.captures[1]);
    }

    session.flush_with(|bytes| {
        println!("transcript ({} bytes):", bytes.len());
        println!("{}", String::from_utf8_lossy(bytes));
    });

    // Give the reaper a moment, then report the exit status
    tokio::time::sleep(Duration::from_millis(200)).await;
    println!("alive: {}, status: {:?}", session.is_alive(), session.exit_status());

    Ok(())
}
