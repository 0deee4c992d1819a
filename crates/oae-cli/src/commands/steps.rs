//! Steps command implementation.

use anyhow::Result;
use oae_core::cli::{ExitCode, OutputFormat};
use oae_steps::catalog;

/// Prints the step phrases, optionally only those matching `filter`.
///
/// Returns `ExitCode::INVALID_INPUT` if a filter matches nothing.
pub async fn run(filter: Option<String>, output_format: OutputFormat) -> Result<ExitCode> {
    let steps: Vec<_> = catalog::filtered(filter.as_deref()).collect();
    tracing::debug!(filter = ?filter, matched = steps.len(), "Listing steps");

    println!("{}", crate::formatters::format_steps(&steps, output_format)?);

    Ok(if steps.is_empty() && filter.is_some() {
        ExitCode::INVALID_INPUT
    } else {
        ExitCode::SUCCESS
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_list_all() {
        let code = run(None, OutputFormat::Text).await.unwrap();
        assert_eq!(code, ExitCode::SUCCESS);
    }

    #[tokio::test]
    async fn test_filter_without_match() {
        let code = run(Some("teleport".to_string()), OutputFormat::Json)
            .await
            .unwrap();
        assert_eq!(code, ExitCode::INVALID_INPUT);
    }
}
