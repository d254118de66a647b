fn main() -> anyhow::Result<()> {
    flow_folio::run_showcase()
}
