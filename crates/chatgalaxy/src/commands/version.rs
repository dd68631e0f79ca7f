pub fn run() -> anyhow::Result<()> {
    println!("chatgalaxy {}", env!("CARGO_PKG_VERSION"));
    println!("report schema {}", chatgalaxy_core::DATA_VERSION);
    Ok(())
}
