pub mod args;

use crate::error::Result;
pub use args::Args;

/// Execute CLI command
pub async fn execute(args: Args) -> Result<()> {
    args.execute().await
}
