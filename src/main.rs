fn main() -> anyhow::Result<()> {
    tiled_creator::run()
}
