use colored::Colorize;
use serde::de::DeserializeOwned;

use std::{
    future::Future,
    io::Write,
    path::Path,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

/// Runs a spinner on stderr until `future` completes.
pub async fn print_loading_until_async<F, T>(message: &str, future: F) -> T
where
    F: Future<Output = T>,
{
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();
    let message = message.to_string();

    let spinner = std::thread::spawn(move || {
        let frames = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
        let mut stderr = std::io::stderr();
        let mut i = 0;

        while running_clone.load(Ordering::Relaxed) {
            let _ = write!(stderr, "\r{} {} ", message, frames[i]);
            let _ = stderr.flush();
            std::thread::sleep(Duration::from_millis(100));
            i = (i + 1) % frames.len();
        }

        let _ = write!(stderr, "\r{}\r", " ".repeat(message.len() + 2));
        let _ = stderr.flush();
    });

    let result = future.await;

    running.store(false, Ordering::Relaxed);
    let _ = spinner.join();

    result
}

pub fn print_success_message(message: &str) {
    println!("{}", message.bright_green());
}

pub fn print_error_message(message: &str) {
    println!("{}", message.bright_red());
}

/// Load an object from a JSON file.
pub fn load_from_json_file<P: AsRef<Path>, T: DeserializeOwned>(path: P) -> eyre::Result<T> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("Failed to open {:?}: {}", path, e))?;
    let data = serde_json::from_str(&json)
        .map_err(|e| eyre::eyre!("Failed to read JSON from {:?}: {}", path, e))?;

    Ok(data)
}

/// Pretty JSON on stdout.
pub fn print_json<T: serde::Serialize>(value: &T) -> eyre::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
