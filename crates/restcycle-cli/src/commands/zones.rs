use restcycle_core::ZoneCatalog;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let catalog = ZoneCatalog::builtin();
    println!("{}", serde_json::to_string_pretty(catalog.zones())?);
    Ok(())
}
