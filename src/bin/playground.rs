use anyhow::Result;
use live_preview_playground::app::run;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    run().await
}
