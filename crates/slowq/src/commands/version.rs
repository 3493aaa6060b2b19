pub fn run() -> anyhow::Result<()> {
    println!("slowq {}", env!("CARGO_PKG_VERSION"));
    println!("Slow query log ingestion and ranking");
    Ok(())
}
