use anyhow::Result;

fn main() -> Result<()> {
    dashload_cli::generate_main()
}
