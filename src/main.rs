fn main() -> anyhow::Result<()> {
    flickrer_lib::run()
}
