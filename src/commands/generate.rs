//! Generate static files

use anyhow::Result;

use crate::generator::Generator;
use crate::Site;

/// Run the full generation pipeline
pub fn run(site: &Site) -> Result<()> {
    let start = std::time::Instant::now();

    let generator = Generator::new(site)?;
    generator.generate()?;

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(())
}
