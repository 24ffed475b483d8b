use gatehouse_core::crypto::Crypto;

pub fn run() -> anyhow::Result<()> {
    println!("{}", Crypto::generate_key());
    Ok(())
}
