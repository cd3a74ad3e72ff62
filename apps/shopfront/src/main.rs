//! Binary entry point for the Cellshop shopfront service.

#[tokio::main]
async fn main() {
    if let Err(e) = cellshop_shopfront::run().await {
        eprintln!("shopfront exited with error: {e}");
        std::process::exit(1);
    }
}
