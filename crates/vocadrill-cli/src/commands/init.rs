//! The `vocadrill init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("vocadrill.toml").exists() {
        println!("vocadrill.toml already exists, skipping.");
    } else {
        std::fs::write("vocadrill.toml", SAMPLE_CONFIG)?;
        println!("Created vocadrill.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit vocadrill.toml to point at your drill-metadata service");
    println!("  2. Run: vocadrill preview --kind context-master --challenge <refId> --drill <refId>");
    println!("  3. Run: vocadrill play --kind context-master --challenge <refId> --drill <refId>");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# vocadrill configuration

# Base URL of the drill-metadata service.
base_url = "http://localhost:4000"

# Where session reports are written after a played challenge.
output_dir = "./vocadrill-reports"
"#;
