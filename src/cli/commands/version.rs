/// Execute version command
pub fn execute() {
    println!("kosha {}", env!("CARGO_PKG_VERSION"));
    println!("{}", env!("CARGO_PKG_DESCRIPTION"));
    println!();
    println!("Endpoint: {}", crate::api::client::DEFAULT_ENDPOINT);
    println!("License: {}", env!("CARGO_PKG_LICENSE"));
}
