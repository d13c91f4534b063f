use anyhow::{Context, Result};
use showcase_core::auth::hash_password;

pub fn run() -> Result<()> {
    let password = rpassword::prompt_password("Password: ").context("Could not read password")?;
    if password.is_empty() {
        anyhow::bail!("Password must not be empty");
    }
    let confirm = rpassword::prompt_password("Repeat: ").context("Could not read password")?;
    if password != confirm {
        anyhow::bail!("Passwords do not match");
    }

    println!("{}", hash_password(&password)?);
    Ok(())
}
