//! quorumctl entry point

fn main() -> anyhow::Result<()> {
    quorum_cli::run()?;
    Ok(())
}
