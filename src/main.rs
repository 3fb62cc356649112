#[tokio::main]
async fn main() {
    teetime_backend::run().await;
}
