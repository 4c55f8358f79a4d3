fn main() -> anyhow::Result<()> {
    childeye_twin_lib::run()
}
