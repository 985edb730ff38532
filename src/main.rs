fn main() -> anyhow::Result<()> {
    undula::app::run()
}
