use crate::error::Result;

/// Print `wisp <version>` to stdout.
pub fn execute() -> Result<()> {
    println!("wisp {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
