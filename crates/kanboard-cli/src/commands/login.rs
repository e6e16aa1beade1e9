//! Login command handler

use anyhow::Result;

use kanboard_core::Service;

use crate::output::Output;

/// Check credentials and print the issued token
pub fn login(service: &mut Service, username: String, password: String, output: &Output) -> Result<()> {
    let token = service.auth().login(&username, &password)?;
    output.print_token(&token);
    Ok(())
}
