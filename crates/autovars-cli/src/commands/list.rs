//! List command: the whole inventory with resolved variables

use crate::context::Loaded;
use crate::error::Result;

/// Run the list command
pub fn run_list(loaded: &Loaded, yaml: bool) -> Result<()> {
    print!("{}", render_listing(loaded, yaml)?);
    Ok(())
}

/// Render the listing as pretty JSON, or YAML when `yaml` is set.
pub fn render_listing(loaded: &Loaded, yaml: bool) -> Result<String> {
    let listing = loaded.registry.to_listing();
    if yaml {
        return Ok(serde_yaml::to_string(&listing)?);
    }
    let mut rendered = serde_json::to_string_pretty(&listing)?;
    rendered.push('\n');
    Ok(rendered)
}
