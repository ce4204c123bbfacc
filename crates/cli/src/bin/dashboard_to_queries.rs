use anyhow::Result;

fn main() -> Result<()> {
    dashload_cli::extract_main()
}
