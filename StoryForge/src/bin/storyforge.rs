fn main() -> anyhow::Result<()> {
    storyforge::cli::run_cli()
}
