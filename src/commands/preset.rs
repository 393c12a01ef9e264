use anyhow::Result;

use super::utils::PresetArgs;
use crate::types::OutputFormat;

/// Print the assignments a run would apply
pub async fn handle_preset(preset: PresetArgs, format: OutputFormat) -> Result<()> {
    let preset = preset.resolve()?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&preset)?),
        OutputFormat::Simple => {
            for assignment in preset.assignments() {
                println!("{}", assignment);
            }
        }
    }
    Ok(())
}
