#[actix_web::main]
async fn main() -> std::io::Result<()> {
    csv_enricher::run().await
}
