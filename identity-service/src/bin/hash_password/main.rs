use std::io::BufRead;

use anyhow::Context;
use auth::PasswordHasher;
use identity_service::config::Config;

/// Print a peppered Argon2 hash for a `[[users]]` entry.
///
/// The password is read from the first argument or, when absent, from the
/// first line of standard input. The pepper comes from the same layered
/// configuration the server loads.
fn main() -> Result<(), anyhow::Error> {
    let password = read_password(std::env::args().skip(1), std::io::stdin().lock())?;

    let config = Config::load().context("Failed to load configuration")?;
    let hasher = PasswordHasher::new(&config.password.pepper);

    println!("{}", hasher.hash(&password)?);

    Ok(())
}

/// Take the password from the first argument, or from the first line of `input`.
fn read_password(
    mut args: impl Iterator<Item = String>,
    mut input: impl BufRead,
) -> anyhow::Result<String> {
    let password = match args.next() {
        Some(password) => password,
        None => {
            let mut line = String::new();
            input
                .read_line(&mut line)
                .context("Failed to read password from stdin")?;
            line.trim_end_matches(['\r', '\n']).to_string()
        }
    };

    if password.is_empty() {
        anyhow::bail!("Password must not be empty");
    }

    Ok(password)
}
