#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    smartfill_server::run().await
}
