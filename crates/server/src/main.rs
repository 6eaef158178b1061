#[tokio::main]
async fn main() -> anyhow::Result<()> {
    promptplus_server::start().await
}
