use anyhow::anyhow;
use pdfpress_api_models::HealthResponse;

use crate::client::{AppContext, CliError, CliResult, classify_problem};
use crate::output::render_health;

pub(crate) async fn handle_health(ctx: &AppContext) -> CliResult<()> {
    let url = ctx.endpoint("/health")?;
    let response = ctx
        .client
        .get(url)
        .send()
        .await
        .map_err(|err| CliError::failure(anyhow!("request to /health failed: {err}")))?;

    if !response.status().is_success() {
        return Err(classify_problem(response).await);
    }

    let health = response
        .json::<HealthResponse>()
        .await
        .map_err(|err| CliError::failure(anyhow!("failed to parse health response: {err}")))?;
    println!("{}", render_health(&health));

    if health.ghostscript_available {
        Ok(())
    } else {
        Err(CliError::Unavailable(
            "ghostscript is not available on the server".to_string(),
        ))
    }
}
