//! Raw API request handler

use anyhow::{bail, Result};

use kanboard_core::Service;

use crate::output::Output;

/// Run one JSON request exactly as the server would and print the envelope.
///
/// Exits non-zero when the envelope reports an error.
pub fn call(service: &mut Service, request: String, output: &Output) -> Result<()> {
    let response = service.handle_json(&request);
    output.print_response(&response);

    if !response.is_success() {
        bail!(
            "{}: {}",
            response.code.as_deref().unwrap_or("ERROR"),
            response.message
        );
    }
    Ok(())
}
