use anyhow::Result;

fn main() -> Result<()> {
    env_logger::init();

    let config = lcdboy::RunConfig::from_env()?;
    log::info!(
        "Running {} frame(s) on {:?}, LYC={}, STAT enables {:?}, {} sprite(s)",
        config.frames,
        config.model,
        config.lyc,
        config.stat,
        config.sprites
    );

    for report in lcdboy::run(&config)? {
        println!("{report}");
    }
    Ok(())
}
