//! Password input.

use std::io::{self, IsTerminal, Read};

use dialoguer::Password;
use secrecy::SecretString;

use crate::constants::PASSWORD_ENV;

/// How to prompt when reading from a terminal.
#[derive(Clone, Copy)]
pub enum Prompt {
    /// Ask twice, for setting a new password.
    WithConfirmation,
    Once,
}

/// Read a password from CREDHASH_PASSWORD, piped stdin, or an interactive prompt.
pub fn read_password(prompt: Prompt) -> anyhow::Result<SecretString> {
    if let Ok(value) = std::env::var(PASSWORD_ENV) {
        if !value.is_empty() {
            return Ok(SecretString::from(value));
        }
    }

    if !io::stdin().is_terminal() {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| anyhow::anyhow!("Failed to read stdin: {}", e))?;
        return Ok(SecretString::from(strip_line_ending(buffer)));
    }

    let password = match prompt {
        Prompt::WithConfirmation => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords do not match")
            .allow_empty_password(true)
            .interact(),
        Prompt::Once => Password::new()
            .with_prompt("Password")
            .allow_empty_password(true)
            .interact(),
    }
    .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))?;

    Ok(SecretString::from(password))
}

/// Drop a single trailing newline. Other whitespace is part of the password.
fn strip_line_ending(mut value: String) -> String {
    if value.ends_with('\n') {
        value.pop();
        if value.ends_with('\r') {
            value.pop();
        }
    }
    value
}
