use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    winops_cli::main_entry().await
}
